//! Control record parsing
//!
//! The control dataset is a small two-row table: row 0 is a header, row 1
//! carries the process date, the last-activity date, and the expected record
//! count. Column contents are not validated here; the reconciliation engine
//! parses them as part of its own checks.

use tracing::debug;

use crate::types::ControlRecord;

/// Delimiter used by the external control dataset source
pub const CONTROL_DELIMITER: char = ';';

impl ControlRecord {
    /// Extract the control record from the tabular control dataset.
    ///
    /// Returns `None` when the dataset has fewer than 2 rows or row 1 has
    /// fewer than 3 columns; both cases are the malformed-control-file
    /// condition for the caller.
    pub fn from_rows(rows: &[Vec<String>]) -> Option<ControlRecord> {
        if rows.len() < 2 {
            debug!(rows = rows.len(), "control dataset has too few rows");
            return None;
        }
        let data = &rows[1];
        if data.len() < 3 {
            debug!(columns = data.len(), "control row has too few columns");
            return None;
        }
        Some(ControlRecord {
            process_date: data[0].clone(),
            last_activity_date: data[1].clone(),
            expected_count: data[2].clone(),
        })
    }
}

/// Split raw control-file lines into rows of columns.
///
/// Helper for callers that hand over the first two lines of the
/// semicolon-delimited control file verbatim.
pub fn split_control_lines<'a, I>(lines: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(|line| {
            line.split(CONTROL_DELIMITER)
                .map(|col| col.trim().to_string())
                .collect()
        })
        .collect()
}
