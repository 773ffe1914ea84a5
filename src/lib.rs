//! # Recon Core
//!
//! Validation-and-reconciliation pipeline for a daily batch of customer
//! identifiers: a sequence of cross-checks that decide whether an import
//! run is trustworthy enough to apply, followed by a best-effort per-record
//! status update against a backing store.
//!
//! ## Features
//!
//! - **Reconciliation engine**: ordered control-file, date, and count
//!   checks with a single typed outcome per run
//! - **Business calendar**: weekend and recurring-holiday reasoning,
//!   previous-business-day arithmetic
//! - **National-ID checksum**: modulo-11 weighted check-digit computation
//!   and validation
//! - **Collaborator seams**: trait-based status updater and diagnostic
//!   sink, with in-memory implementations for testing
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use recon_core::{DetailRecord, HolidaySet, MemoryUpdater, ReconciliationEngine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let holidays = HolidaySet::parse("01-01#25-12").unwrap();
//! let mut engine = ReconciliationEngine::new(MemoryUpdater::new())
//!     .with_holidays(holidays)
//!     // production keeps the default (the current local date)
//!     .with_today(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
//!
//! let control = vec![
//!     vec!["FECHA_PROCESO".into(), "FECHA_ULT_VENTA".into(), "REGISTROS".into()],
//!     vec!["15-03-2024".into(), "14-03-2024".into(), "1".into()],
//! ];
//! let details = vec![DetailRecord::new("11111111")];
//!
//! let report = engine.run(&control, &details).await;
//! assert_eq!(report.exit_code(), 0);
//! # }
//! ```

pub mod calendar;
pub mod checksum;
pub mod control;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use checksum::NationalId;
pub use reconciliation::{ReconciliationEngine, DEFAULT_TARGET_STATUS};
pub use traits::*;
pub use types::*;
pub use utils::{FileSink, MemorySink, MemoryUpdater, SkipBlankLines};

// Re-export the detail-line reader for convenience
pub use utils::read_detail_lines;
