//! Configuration for the Quill task router
//!
//! Configuration is TOML with `{{ env.VAR }}` placeholder expansion, so
//! credentials stay out of checked-in files. The catalog and policy
//! sections are optional; when omitted the built-in defaults in
//! `quill-catalog` are used.

#![allow(clippy::must_use_candidate)]

mod budget;
mod env;
mod loader;
mod models;
mod policies;
mod router;

use serde::Deserialize;

pub use budget::BudgetConfig;
pub use models::{CapabilitiesConfig, CapabilityTierConfig, CostTierConfig, ModelRecordConfig};
pub use policies::TaskPolicyConfig;
pub use router::RouterConfig;

/// Top-level Quill configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider transport and retry configuration
    pub router: RouterConfig,
    /// Monthly budget and projection configuration
    #[serde(default)]
    pub budget: BudgetConfig,
    /// Model catalog overrides (empty means use the built-in catalog)
    #[serde(default)]
    pub catalog: Vec<ModelRecordConfig>,
    /// Task policy overrides keyed by category (empty means built-in table)
    #[serde(default)]
    pub policies: indexmap::IndexMap<String, TaskPolicyConfig>,
}
