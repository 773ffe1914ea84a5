//! Reconciliation engine for the daily import run
//!
//! Orchestrates the cross-checks between the control record, the current
//! date, and the detail dataset, then applies the status update to each
//! accepted record.

pub mod engine;

pub use engine::{ReconciliationEngine, DEFAULT_TARGET_STATUS};
