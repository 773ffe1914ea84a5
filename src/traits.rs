//! Traits for the pipeline's external collaborators
//!
//! The backing store behind the status update and the diagnostic
//! side-channel are both outside the core; these seams let the engine run
//! against any implementation (remote service, database, in-memory test
//! double).

use async_trait::async_trait;

use crate::types::{ReconResult, RunOutcome};

/// The remote status-update operation applied to each accepted record.
///
/// Calls are synchronous from the pipeline's point of view: the run blocks
/// on each update and there is no internal timeout or cancellation. A
/// failure for one record is caught and logged by the engine, never
/// propagated to abort the run.
#[async_trait]
pub trait StatusUpdater: Send + Sync {
    /// Set the status of the customer identified by `id`
    async fn update_status(&mut self, id: i64, status: &str) -> ReconResult<()>;
}

/// Sink for human-readable failure diagnostics.
///
/// Each terminal outcome produces one message, already carrying its
/// `dd/mm/yyyy - HH:mm:ss` timestamp. Reporting is a side effect of the run,
/// not part of the outcome value; sink errors are logged and swallowed by
/// the engine.
pub trait DiagnosticSink: Send {
    /// Record the diagnostic for a finished run
    fn notify(&mut self, outcome: RunOutcome, message: &str) -> ReconResult<()>;
}

/// Sink that discards all diagnostics
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn notify(&mut self, _outcome: RunOutcome, _message: &str) -> ReconResult<()> {
        Ok(())
    }
}
