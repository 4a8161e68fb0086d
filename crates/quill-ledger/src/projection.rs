use std::collections::BTreeMap;

use jiff::ToSpan;
use jiff::civil::Date;

/// Days assumed per month when extrapolating daily spend
const DAYS_PER_MONTH: f64 = 30.0;

/// Strategy for projecting monthly spend from recorded daily totals
///
/// Pluggable so the projection algorithm can be swapped without touching
/// the accounting core.
pub trait SpendProjection: Send + Sync + std::fmt::Debug {
    /// Projected monthly spend in USD as of `today`
    ///
    /// `daily_totals` holds the grand total for every day with recorded
    /// spend.
    fn project(&self, today: Date, daily_totals: &BTreeMap<Date, f64>) -> f64;
}

/// Mean of the trailing window's daily totals, extrapolated to a month
///
/// Only days with recorded spend count toward the mean, so a single
/// recorded day degenerates to the naive `today * 30` estimate.
#[derive(Debug, Clone, Copy)]
pub struct TrailingAverage {
    /// Window length in days, including today
    pub window_days: u16,
}

impl Default for TrailingAverage {
    fn default() -> Self {
        Self { window_days: 7 }
    }
}

impl SpendProjection for TrailingAverage {
    fn project(&self, today: Date, daily_totals: &BTreeMap<Date, f64>) -> f64 {
        let window = self.window_days.max(1);
        let cutoff = today
            .checked_sub(i64::from(window - 1).days())
            .unwrap_or(Date::MIN);

        let in_window: Vec<f64> = daily_totals
            .range(cutoff..=today)
            .map(|(_, total)| *total)
            .collect();

        if in_window.is_empty() {
            return 0.0;
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = in_window.iter().sum::<f64>() / in_window.len() as f64;
        mean * DAYS_PER_MONTH
    }
}

/// Today's total extrapolated to a month, as the source system did it
///
/// Documented approximation, not a forecast; kept for parity and for
/// callers that want the simplest possible estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveDaily;

impl SpendProjection for NaiveDaily {
    fn project(&self, today: Date, daily_totals: &BTreeMap<Date, f64>) -> f64 {
        daily_totals.get(&today).copied().unwrap_or(0.0) * DAYS_PER_MONTH
    }
}
