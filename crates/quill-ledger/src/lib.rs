//! Running cost ledger and budget reporting
//!
//! Realized spend is accumulated keyed by (day, model, task category).
//! Attribution happens exactly once per completed execution; failed
//! attempts never touch the ledger. Per-day breakdowns are derived from
//! the same entries in a single scan, so the per-model, per-task, and
//! grand totals for a day always agree.

#![allow(clippy::must_use_candidate)]

mod ledger;
mod projection;
mod report;

pub use ledger::CostLedger;
pub use projection::{NaiveDaily, SpendProjection, TrailingAverage};
pub use report::CostReport;
