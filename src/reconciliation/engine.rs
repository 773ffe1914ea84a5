//! The validation-and-reconciliation state machine
//!
//! One run walks a fixed sequence of checks; the first failure is terminal
//! and becomes the run outcome. Only when every check passes does the apply
//! phase hand each record to the status updater, best-effort per record.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calendar;
use crate::traits::{DiagnosticSink, NullSink, StatusUpdater};
use crate::types::{
    ControlRecord, DetailRecord, FailureKind, HolidaySet, RunOutcome, RunReport,
};

/// Status written to the backing store for every accepted record
pub const DEFAULT_TARGET_STATUS: &str = "Acepta Tarjeta";

/// Orchestrator for one reconciliation run.
///
/// Generic over the status-update collaborator; the holiday set, target
/// status, reference date, and diagnostic sink are configured up front and
/// immutable during the run.
pub struct ReconciliationEngine<U: StatusUpdater> {
    updater: U,
    holidays: HolidaySet,
    target_status: String,
    today: NaiveDate,
    sink: Box<dyn DiagnosticSink>,
}

impl<U: StatusUpdater> ReconciliationEngine<U> {
    /// Create an engine with an empty holiday set, the default target
    /// status, the current local date, and no diagnostic sink.
    pub fn new(updater: U) -> Self {
        Self {
            updater,
            holidays: HolidaySet::empty(),
            target_status: DEFAULT_TARGET_STATUS.to_string(),
            today: Local::now().date_naive(),
            sink: Box::new(NullSink),
        }
    }

    /// Use the given holiday configuration for business-day reasoning
    pub fn with_holidays(mut self, holidays: HolidaySet) -> Self {
        self.holidays = holidays;
        self
    }

    /// Override the status value written by the apply phase
    pub fn with_target_status(mut self, status: impl Into<String>) -> Self {
        self.target_status = status.into();
        self
    }

    /// Override the reference "today" (tests and replayed runs)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Attach a diagnostic sink for failure notifications
    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Execute one run against the supplied control rows and detail records.
    ///
    /// Checks run strictly in order; the first failing check decides the
    /// outcome and nothing after it executes. Never returns an error: every
    /// pipeline condition is encoded in the report's outcome.
    pub async fn run(
        &mut self,
        control_rows: &[Vec<String>],
        details: &[DetailRecord],
    ) -> RunReport {
        let run_id = Uuid::new_v4();
        info!(%run_id, records = details.len(), "starting reconciliation run");

        // 1. Control parse
        let Some(control) = ControlRecord::from_rows(control_rows) else {
            return self.fail(
                run_id,
                FailureKind::EmptyOrMalformedControlFile,
                "control file is empty or malformed",
            );
        };

        // 2. Date derivation; unparseable fields are a malformed control file
        let Some(process_date) = calendar::parse_date(&control.process_date) else {
            return self.fail(
                run_id,
                FailureKind::EmptyOrMalformedControlFile,
                "control file process date is unreadable",
            );
        };
        let Some(last_activity) = calendar::parse_date(&control.last_activity_date) else {
            return self.fail(
                run_id,
                FailureKind::EmptyOrMalformedControlFile,
                "control file last activity date is unreadable",
            );
        };
        let previous_process_date =
            calendar::previous_business_day(process_date, &self.holidays);

        // 3. Currency: the process date must be today
        if !calendar::is_today(process_date, self.today) {
            return self.fail(
                run_id,
                FailureKind::ProcessDateNotToday,
                "process date does not match the current date",
            );
        }

        // 4. Continuity: last activity must be the preceding business day
        if last_activity != previous_process_date {
            return self.fail(
                run_id,
                FailureKind::NotPrecedingBusinessDay,
                "last activity date is not the preceding business day",
            );
        }

        // 5. Count reconciliation; the count field is first read here so an
        // unreadable count never masks a date failure
        let Ok(expected_count) = control.expected_count.trim().parse::<usize>() else {
            return self.fail(
                run_id,
                FailureKind::EmptyOrMalformedControlFile,
                "control file record count is unreadable",
            );
        };
        if expected_count != details.len() {
            return self.fail(
                run_id,
                FailureKind::RecordCountMismatch,
                "record count does not match the control record",
            );
        }

        // 6. Per-record quality: a missing identifier is file-level
        // corruption, not a per-row defect
        if details.iter().any(|r| !r.has_identifier()) {
            return self.fail(
                run_id,
                FailureKind::CorruptDetailRecord,
                "detail file is corrupt: record without identifier",
            );
        }

        // 7. Emptiness
        if details.is_empty() {
            return self.fail(
                run_id,
                FailureKind::EmptyDetailFile,
                "detail file yielded no records",
            );
        }

        // 8. Apply phase, best-effort per record
        let mut applied = 0usize;
        let mut failed_updates = 0usize;
        for record in details {
            let id: i64 = match record.identifier.trim().parse() {
                Ok(id) => id,
                Err(_) => {
                    warn!(%run_id, identifier = %record.identifier, "identifier is not numeric, skipping");
                    failed_updates += 1;
                    continue;
                }
            };
            match self.updater.update_status(id, &self.target_status).await {
                Ok(()) => applied += 1,
                Err(e) => {
                    warn!(%run_id, id, error = %e, "status update failed, continuing");
                    failed_updates += 1;
                }
            }
        }

        let finished_at = Local::now().naive_local();
        let completion = format!(
            "completed without errors ({})",
            calendar::format_timestamp(finished_at)
        );
        if let Err(e) = self.sink.notify(RunOutcome::Completed, &completion) {
            warn!(%run_id, error = %e, "diagnostic sink failed");
        }
        info!(%run_id, applied, failed_updates, "reconciliation run completed");

        RunReport {
            run_id,
            outcome: RunOutcome::Completed,
            message: None,
            finished_at,
            applied,
            failed_updates,
        }
    }

    /// Consume the engine and hand back the updater
    pub fn into_updater(self) -> U {
        self.updater
    }

    fn fail(&mut self, run_id: Uuid, kind: FailureKind, reason: &str) -> RunReport {
        let finished_at = Local::now().naive_local();
        let message = format!(
            "Error, {reason} ({})",
            calendar::format_timestamp(finished_at)
        );
        let outcome = RunOutcome::Failed(kind);

        if let Err(e) = self.sink.notify(outcome, &message) {
            warn!(%run_id, error = %e, "diagnostic sink failed");
        }
        debug!(%run_id, ?kind, exit_code = outcome.exit_code(), "run failed");

        RunReport {
            run_id,
            outcome,
            message: Some(message),
            finished_at,
            applied: 0,
            failed_updates: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryUpdater;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn control_rows(process: &str, last: &str, count: &str) -> Vec<Vec<String>> {
        vec![
            vec!["FECHA_PROCESO".into(), "FECHA_ULT_VENTA".into(), "REGISTROS".into()],
            vec![process.into(), last.into(), count.into()],
        ]
    }

    fn records(ids: &[&str]) -> Vec<DetailRecord> {
        ids.iter().map(|id| DetailRecord::new(*id)).collect()
    }

    // 2024-03-15 is a Friday; 2024-03-14 the preceding business Thursday.
    fn engine_for_friday(updater: MemoryUpdater) -> ReconciliationEngine<MemoryUpdater> {
        ReconciliationEngine::new(updater).with_today(date(2024, 3, 15))
    }

    #[tokio::test]
    async fn test_happy_path_applies_all_records() {
        let updater = MemoryUpdater::new();
        let mut engine = engine_for_friday(updater.clone());

        let report = engine
            .run(
                &control_rows("15-03-2024", "14-03-2024", "2"),
                &records(&["11111111", "22222222"]),
            )
            .await;

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.applied, 2);
        assert_eq!(report.failed_updates, 0);
        assert_eq!(
            updater.status_of(11111111).as_deref(),
            Some(DEFAULT_TARGET_STATUS)
        );
        assert_eq!(
            updater.status_of(22222222).as_deref(),
            Some(DEFAULT_TARGET_STATUS)
        );
    }

    #[tokio::test]
    async fn test_malformed_control_file() {
        let mut engine = engine_for_friday(MemoryUpdater::new());
        let report = engine.run(&[], &records(&["11111111"])).await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::EmptyOrMalformedControlFile)
        );
        assert_eq!(report.exit_code(), 7);
        assert!(report.message.is_some());
    }

    #[tokio::test]
    async fn test_unreadable_control_dates_are_malformed_control() {
        let mut engine = engine_for_friday(MemoryUpdater::new());
        let report = engine
            .run(
                &control_rows("not-a-date", "14-03-2024", "1"),
                &records(&["11111111"]),
            )
            .await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::EmptyOrMalformedControlFile)
        );
    }

    #[tokio::test]
    async fn test_process_date_not_today() {
        let mut engine = engine_for_friday(MemoryUpdater::new());
        let report = engine
            .run(
                &control_rows("14-03-2024", "13-03-2024", "1"),
                &records(&["11111111"]),
            )
            .await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::ProcessDateNotToday)
        );
        assert_eq!(report.exit_code(), 6);
    }

    #[tokio::test]
    async fn test_currency_checked_before_continuity() {
        // Both the today check and the continuity check would fail here;
        // only the today failure may surface.
        let mut engine = engine_for_friday(MemoryUpdater::new());
        let report = engine
            .run(
                &control_rows("14-03-2024", "01-01-2020", "1"),
                &records(&["11111111"]),
            )
            .await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::ProcessDateNotToday)
        );
    }

    #[tokio::test]
    async fn test_stale_date_surfaces_before_unreadable_count() {
        // The count field is only read at the count check, so a garbage
        // count never masks an earlier date failure
        let mut engine = engine_for_friday(MemoryUpdater::new());
        let report = engine
            .run(
                &control_rows("14-03-2024", "13-03-2024", "xx"),
                &records(&["11111111"]),
            )
            .await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::ProcessDateNotToday)
        );
        assert_eq!(report.exit_code(), 6);
    }

    #[tokio::test]
    async fn test_unreadable_count_after_date_checks_pass() {
        let mut engine = engine_for_friday(MemoryUpdater::new());
        let report = engine
            .run(
                &control_rows("15-03-2024", "14-03-2024", "xx"),
                &records(&["11111111"]),
            )
            .await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::EmptyOrMalformedControlFile)
        );
    }

    #[tokio::test]
    async fn test_not_preceding_business_day() {
        let mut engine = engine_for_friday(MemoryUpdater::new());
        let report = engine
            .run(
                &control_rows("15-03-2024", "13-03-2024", "1"),
                &records(&["11111111"]),
            )
            .await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::NotPrecedingBusinessDay)
        );
        assert_eq!(report.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_weekend_is_skipped_in_continuity() {
        // Monday 2024-03-18: the preceding business day is Friday the 15th
        let mut engine =
            ReconciliationEngine::new(MemoryUpdater::new()).with_today(date(2024, 3, 18));
        let report = engine
            .run(
                &control_rows("18-03-2024", "15-03-2024", "1"),
                &records(&["11111111"]),
            )
            .await;
        assert_eq!(report.outcome, RunOutcome::Completed);
    }

    #[tokio::test]
    async fn test_holiday_is_skipped_in_continuity() {
        // 2024-01-01 (Monday) configured as a holiday: from Tuesday the 2nd
        // the preceding business day is Friday 2023-12-29
        let holidays = HolidaySet::parse("01-01").unwrap();
        let mut engine = ReconciliationEngine::new(MemoryUpdater::new())
            .with_holidays(holidays)
            .with_today(date(2024, 1, 2));
        let report = engine
            .run(
                &control_rows("02-01-2024", "29-12-2023", "1"),
                &records(&["11111111"]),
            )
            .await;
        assert_eq!(report.outcome, RunOutcome::Completed);
    }

    #[tokio::test]
    async fn test_record_count_mismatch() {
        let mut engine = engine_for_friday(MemoryUpdater::new());
        let report = engine
            .run(
                &control_rows("15-03-2024", "14-03-2024", "3"),
                &records(&["11111111", "22222222"]),
            )
            .await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::RecordCountMismatch)
        );
        assert_eq!(report.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_record_aborts_whole_run() {
        let updater = MemoryUpdater::new();
        let mut engine = engine_for_friday(updater.clone());
        let report = engine
            .run(
                &control_rows("15-03-2024", "14-03-2024", "3"),
                &records(&["11111111", " ", "22222222"]),
            )
            .await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::CorruptDetailRecord)
        );
        assert_eq!(report.exit_code(), 4);
        // Nothing may have been applied
        assert!(updater.is_empty());
    }

    #[tokio::test]
    async fn test_empty_detail_file() {
        let mut engine = engine_for_friday(MemoryUpdater::new());
        let report = engine
            .run(&control_rows("15-03-2024", "14-03-2024", "0"), &[])
            .await;
        assert_eq!(
            report.outcome,
            RunOutcome::Failed(FailureKind::EmptyDetailFile)
        );
        assert_eq!(report.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_update_failure_does_not_abort() {
        let updater = MemoryUpdater::new();
        updater.fail_for(22222222);
        let mut engine = engine_for_friday(updater.clone());

        let report = engine
            .run(
                &control_rows("15-03-2024", "14-03-2024", "3"),
                &records(&["11111111", "22222222", "33333333"]),
            )
            .await;

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.applied, 2);
        assert_eq!(report.failed_updates, 1);
        assert!(updater.status_of(11111111).is_some());
        assert!(updater.status_of(22222222).is_none());
        assert!(updater.status_of(33333333).is_some());
    }

    #[tokio::test]
    async fn test_non_numeric_identifier_counts_as_failed_update() {
        let updater = MemoryUpdater::new();
        let mut engine = engine_for_friday(updater.clone());
        let report = engine
            .run(
                &control_rows("15-03-2024", "14-03-2024", "2"),
                &records(&["11111111", "12.345.678-5"]),
            )
            .await;
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.applied, 1);
        assert_eq!(report.failed_updates, 1);
    }

    #[tokio::test]
    async fn test_custom_target_status() {
        let updater = MemoryUpdater::new();
        let mut engine = engine_for_friday(updater.clone()).with_target_status("Rechaza Tarjeta");
        engine
            .run(
                &control_rows("15-03-2024", "14-03-2024", "1"),
                &records(&["11111111"]),
            )
            .await;
        assert_eq!(
            updater.status_of(11111111).as_deref(),
            Some("Rechaza Tarjeta")
        );
    }
}
