//! Cost-optimized routing resolver
//!
//! Pure decision function from (task category, optional overrides) to a
//! chosen model plus justification. Deliberately synchronous: no I/O, no
//! randomness, no mutable state, so it is trivially unit-testable and may
//! be called from any number of tasks without coordination. Only the
//! execution engine performs I/O.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod resolver;

pub use resolver::Resolver;

/// Caller-supplied constraint overrides for a single routing call
///
/// Unset fields fall back to the task category's policy values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteOverrides {
    /// Override for the policy's quality floor
    pub min_quality: Option<f64>,
    /// Override for the policy's cost ceiling per 1000 tokens
    pub max_cost_per_1k: Option<f64>,
}

/// Output of the resolver
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    /// Chosen model id
    pub model_id: String,
    /// Human-readable reason the model was chosen
    pub justification: String,
    /// Estimated cost per 1000 tokens, pre-call filter value only
    pub estimated_cost_per_1k: f64,
    /// The chosen model's catalog quality score
    pub quality_score: f64,
    /// Whether a fallback model (rather than a priority model) was chosen
    pub used_fallback: bool,
}
