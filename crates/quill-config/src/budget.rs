use serde::Deserialize;

/// Monthly budget and spend-projection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    /// Monthly spend ceiling in USD
    #[serde(default = "default_monthly_usd")]
    pub monthly_usd: f64,
    /// Trailing window, in days, used for monthly spend projection
    #[serde(default = "default_projection_window_days")]
    pub projection_window_days: u16,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            monthly_usd: default_monthly_usd(),
            projection_window_days: default_projection_window_days(),
        }
    }
}

const fn default_monthly_usd() -> f64 {
    500.0
}

const fn default_projection_window_days() -> u16 {
    7
}
