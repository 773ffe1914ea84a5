//! Detail-line reading with a configurable record-separator policy
//!
//! Blank-line handling is a strategy passed into the reader rather than a
//! reader subclass: a fully blank line is not a record boundary and produces
//! no record, and a structurally malformed line is skipped with a logged
//! diagnostic while the run continues. The skip itself never changes the
//! run outcome; if nothing survives filtering, the engine's emptiness check
//! takes over.

use tracing::warn;

use crate::types::DetailRecord;

/// Predicate deciding whether a raw line forms a record
pub trait LineFilter {
    /// True if `line` should produce a [`DetailRecord`]
    fn accept(&self, line: &str) -> bool;
}

/// The standard policy: drop lines that are empty after trimming
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipBlankLines;

impl LineFilter for SkipBlankLines {
    fn accept(&self, line: &str) -> bool {
        !line.trim().is_empty()
    }
}

/// Read raw detail-file lines into records, applying the filter policy.
///
/// Lines rejected by the filter are logged with their line number and
/// skipped; everything else becomes one [`DetailRecord`] carrying the
/// trimmed line as its identifier.
pub fn read_detail_lines<'a, I, F>(lines: I, filter: &F) -> Vec<DetailRecord>
where
    I: IntoIterator<Item = &'a str>,
    F: LineFilter,
{
    let mut records = Vec::new();
    for (number, line) in lines.into_iter().enumerate() {
        if !filter.accept(line) {
            warn!(line = number + 1, input = line, "skipping detail line");
            continue;
        }
        records.push(DetailRecord::new(line.trim()));
    }
    records
}
