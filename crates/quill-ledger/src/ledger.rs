use std::collections::BTreeMap;

use dashmap::DashMap;
use jiff::civil::Date;

use crate::projection::{SpendProjection, TrailingAverage};
use crate::report::CostReport;

/// Accumulation key: one cell per (day, model, task category)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LedgerKey {
    date: Date,
    model: String,
    category: String,
}

/// Concurrent in-memory ledger of realized spend
///
/// Recording is an unconditional addition; the ledger does not
/// deduplicate. Concurrent `record` calls on the same key are serialized
/// by the map's per-entry locking, so no update is lost.
#[derive(Debug)]
pub struct CostLedger {
    entries: DashMap<LedgerKey, f64>,
    monthly_budget_usd: f64,
    projection: Box<dyn SpendProjection>,
}

impl CostLedger {
    /// Create a ledger with the default trailing-average projection
    pub fn new(monthly_budget_usd: f64) -> Self {
        Self::with_projection(monthly_budget_usd, Box::new(TrailingAverage::default()))
    }

    /// Create a ledger with an explicit projection strategy
    pub fn with_projection(monthly_budget_usd: f64, projection: Box<dyn SpendProjection>) -> Self {
        Self {
            entries: DashMap::new(),
            monthly_budget_usd,
            projection,
        }
    }

    /// The configured monthly budget in USD
    pub const fn monthly_budget_usd(&self) -> f64 {
        self.monthly_budget_usd
    }

    /// Record realized spend for one completed execution
    pub fn record(&self, date: Date, model: &str, category: &str, cost_usd: f64) {
        let key = LedgerKey {
            date,
            model: model.to_owned(),
            category: category.to_owned(),
        };

        *self.entries.entry(key).or_insert(0.0) += cost_usd;

        tracing::debug!(
            %date,
            model,
            category,
            cost_usd,
            "recorded realized spend"
        );
    }

    /// Build the budget report for one day
    ///
    /// Breakdowns and the grand total come from a single scan over the
    /// same entries, so their sums agree by construction.
    pub fn report(&self, date: Date) -> CostReport {
        let mut total_usd = 0.0;
        let mut by_model: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_task: BTreeMap<String, f64> = BTreeMap::new();
        let mut daily_totals: BTreeMap<Date, f64> = BTreeMap::new();

        for entry in &self.entries {
            let (key, cost) = (entry.key(), *entry.value());
            *daily_totals.entry(key.date).or_insert(0.0) += cost;

            if key.date == date {
                total_usd += cost;
                *by_model.entry(key.model.clone()).or_insert(0.0) += cost;
                *by_task.entry(key.category.clone()).or_insert(0.0) += cost;
            }
        }

        let budget_remaining_usd = self.monthly_budget_usd - total_usd;
        let budget_utilization_percent = if self.monthly_budget_usd > 0.0 {
            total_usd / self.monthly_budget_usd * 100.0
        } else {
            0.0
        };
        let projected_monthly_usd = self.projection.project(date, &daily_totals);

        CostReport {
            date,
            total_usd,
            by_model,
            by_task,
            budget_remaining_usd,
            budget_utilization_percent,
            projected_monthly_usd,
        }
    }
}
