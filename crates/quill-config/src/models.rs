use serde::Deserialize;

/// A single model catalog entry supplied via configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelRecordConfig {
    /// Model identifier in "provider/model" form
    pub id: String,
    /// Provider identifier
    pub provider: String,
    /// Context window in tokens
    pub context_window: u32,
    /// Maximum output tokens per completion
    pub max_output_tokens: u32,
    /// Price per million input tokens (USD)
    pub input_per_mtok: f64,
    /// Price per million output tokens (USD)
    pub output_per_mtok: f64,
    /// Composite cost tier
    pub cost_tier: CostTierConfig,
    /// Quality score, 0 to 100
    pub quality: f64,
    /// Speed score, 0 to 100
    pub speed: f64,
    /// Value score, 0 to 100
    pub value: f64,
    /// Capability tiers
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,
}

/// Composite cost tier of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostTierConfig {
    /// Cheapest tier, suited to bulk work
    Budget,
    /// Mid-range pricing
    Standard,
    /// Frontier pricing
    Premium,
}

/// Capability tiers for a model
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilitiesConfig {
    /// Reasoning capability tier
    #[serde(default)]
    pub reasoning: CapabilityTierConfig,
    /// Coding capability tier
    #[serde(default)]
    pub coding: CapabilityTierConfig,
    /// Math capability tier
    #[serde(default)]
    pub math: CapabilityTierConfig,
    /// Whether the model accepts image input
    #[serde(default)]
    pub vision: bool,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            reasoning: CapabilityTierConfig::Good,
            coding: CapabilityTierConfig::Good,
            math: CapabilityTierConfig::Good,
            vision: false,
        }
    }
}

/// Coarse capability tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTierConfig {
    /// Adequate for simple tasks
    Basic,
    /// Solid general capability
    #[default]
    Good,
    /// Near-frontier capability
    Strong,
    /// Frontier capability
    Frontier,
}
