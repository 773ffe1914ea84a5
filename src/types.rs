//! Core types and data structures for the reconciliation pipeline

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One customer identifier read from the detail dataset.
///
/// Carries only the raw identifier string; validation happens inside the
/// reconciliation engine. Created per input line by the external reader,
/// consumed once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Raw customer identifier as it appeared in the file
    pub identifier: String,
}

impl DetailRecord {
    /// Create a detail record from a raw identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }

    /// True if the identifier is non-empty after trimming
    pub fn has_identifier(&self) -> bool {
        !self.identifier.trim().is_empty()
    }
}

/// The single summary row of the control dataset.
///
/// All fields are kept as raw strings; the engine parses them once and the
/// record is immutable after construction. Exactly one instance exists per
/// run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRecord {
    /// Process date in `day-month-year` form
    pub process_date: String,
    /// Reference "last activity" date in `day-month-year` form
    pub last_activity_date: String,
    /// Expected number of detail records, decimal
    pub expected_count: String,
}

/// A recurring holiday: day and month, year-independent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub day: u32,
    pub month: u32,
}

impl HolidayEntry {
    /// True if `date` falls on this holiday in any year
    pub fn matches(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        date.day() == self.day && date.month() == self.month
    }
}

/// The configured set of recurring holidays, loaded once per run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySet(pub Vec<HolidayEntry>);

impl HolidaySet {
    /// An empty holiday set (weekends only)
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// True if (day, month) of `date` appears in the set
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.iter().any(|h| h.matches(date))
    }
}

/// The specific ways a run can fail.
///
/// Mutually exclusive; each maps to one process exit code. The first failing
/// check is terminal, so exactly one kind is ever surfaced per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Control dataset missing required rows/columns, or its fields
    /// could not be parsed
    EmptyOrMalformedControlFile,
    /// Detail dataset yielded no usable records
    EmptyDetailFile,
    /// A detail record lacks its required identifier field
    CorruptDetailRecord,
    /// Expected count from the control record disagrees with the actual
    /// detail record count
    RecordCountMismatch,
    /// Last-activity date does not equal the previous business day of the
    /// process date
    NotPrecedingBusinessDay,
    /// Process date in the control record is not the current date
    ProcessDateNotToday,
}

/// Terminal classification of one pipeline execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// All checks passed and the apply phase ran
    Completed,
    /// A validation check failed; no records were applied
    Failed(FailureKind),
}

/// Exit code the caller should use when the pipeline never produced a
/// report at all (e.g. it was never invoked).
pub const GENERAL_FAILURE: i32 = 1;

impl RunOutcome {
    /// Map the outcome to its fixed process exit code.
    ///
    /// The table is part of the operational contract with the scheduler;
    /// codes must not be renumbered.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed => 0,
            RunOutcome::Failed(FailureKind::RecordCountMismatch) => 2,
            RunOutcome::Failed(FailureKind::NotPrecedingBusinessDay) => 3,
            RunOutcome::Failed(FailureKind::CorruptDetailRecord) => 4,
            RunOutcome::Failed(FailureKind::EmptyDetailFile) => 5,
            RunOutcome::Failed(FailureKind::ProcessDateNotToday) => 6,
            RunOutcome::Failed(FailureKind::EmptyOrMalformedControlFile) => 7,
        }
    }

    /// True if the run completed
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Result of one pipeline run: the outcome plus diagnostics and apply-phase
/// counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Identifier of this run, for log correlation
    pub run_id: Uuid,
    /// Terminal outcome of the run
    pub outcome: RunOutcome,
    /// Human-readable diagnostic for failures, `None` on success
    pub message: Option<String>,
    /// When the run finished
    pub finished_at: NaiveDateTime,
    /// Records successfully handed to the status updater
    pub applied: usize,
    /// Per-record updates that failed and were skipped (best-effort apply)
    pub failed_updates: usize,
}

impl RunReport {
    /// Exit code for this run, per the fixed outcome table
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

/// Errors that can occur outside the validation pipeline itself
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("Holiday configuration error: {0}")]
    HolidayConfig(String),
    #[error("Status update failed: {0}")]
    Update(String),
    #[error("Diagnostic sink error: {0}")]
    Sink(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
