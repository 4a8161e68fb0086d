use serde::Deserialize;

/// Routing policy for one task category supplied via configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPolicyConfig {
    /// Minimum acceptable quality score, 0 to 100
    pub min_quality_score: f64,
    /// Models tried first, in order
    pub priority_models: Vec<String>,
    /// Models tried with a relaxed quality floor when no priority model fits
    #[serde(default)]
    pub fallback_models: Vec<String>,
    /// Maximum estimated cost per 1000 tokens (USD)
    pub cost_ceiling_per_1k_tokens: f64,
}
