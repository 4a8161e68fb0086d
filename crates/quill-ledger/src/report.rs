use std::collections::BTreeMap;

use jiff::civil::Date;

/// Budget and utilization report for one day
///
/// This is the data a spend dashboard reads; rendering is a caller
/// concern.
#[derive(Debug, Clone)]
pub struct CostReport {
    /// Day the report covers
    pub date: Date,
    /// Grand total spend for the day in USD
    pub total_usd: f64,
    /// Spend broken down by model id
    pub by_model: BTreeMap<String, f64>,
    /// Spend broken down by task category
    pub by_task: BTreeMap<String, f64>,
    /// Monthly budget minus the day's total (negative when overspent)
    pub budget_remaining_usd: f64,
    /// Day total as a percentage of the monthly budget
    pub budget_utilization_percent: f64,
    /// Projected monthly spend from the configured projection strategy
    pub projected_monthly_usd: f64,
}
