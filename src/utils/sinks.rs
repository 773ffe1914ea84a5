//! Diagnostic sink implementations

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::traits::DiagnosticSink;
use crate::types::{ReconError, ReconResult, RunOutcome};

/// Sink that writes one notification file per outcome into a directory.
///
/// The file is named `notice_<exit code>.txt` and holds the single
/// diagnostic line, overwriting any notification from a previous run with
/// the same outcome.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink writing into `dir` (which must already exist)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the notification for `outcome` is written to
    pub fn path_for(&self, outcome: RunOutcome) -> PathBuf {
        self.dir.join(format!("notice_{}.txt", outcome.exit_code()))
    }
}

impl DiagnosticSink for FileSink {
    fn notify(&mut self, outcome: RunOutcome, message: &str) -> ReconResult<()> {
        fs::write(self.path_for(outcome), message)
            .map_err(|e| ReconError::Sink(format!("{}: {e}", self.dir.display())))
    }
}

/// Sink that collects diagnostics in memory, for tests
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Arc<RwLock<Vec<(RunOutcome, String)>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far
    pub fn messages(&self) -> Vec<(RunOutcome, String)> {
        self.messages.read().unwrap().clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn notify(&mut self, outcome: RunOutcome, message: &str) -> ReconResult<()> {
        self.messages
            .write()
            .unwrap()
            .push((outcome, message.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailureKind;

    #[test]
    fn test_file_sink_writes_per_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path());

        let outcome = RunOutcome::Failed(FailureKind::RecordCountMismatch);
        sink.notify(outcome, "record count mismatch (15/03/2024 - 10:00:00)")
            .unwrap();

        let path = sink.path_for(outcome);
        assert!(path.ends_with("notice_2.txt"));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("record count mismatch"));
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::new();
        sink.notify(RunOutcome::Completed, "done").unwrap();
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, RunOutcome::Completed);
    }
}
