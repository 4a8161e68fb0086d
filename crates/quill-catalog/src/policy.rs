use indexmap::IndexMap;
use quill_config::TaskPolicyConfig;

use crate::catalog::Catalog;
use crate::error::CatalogError;

/// Routing policy for one task category
#[derive(Debug, Clone)]
pub struct TaskPolicy {
    /// Minimum acceptable quality score, 0 to 100
    pub min_quality_score: f64,
    /// Models tried first, in order
    pub priority_models: Vec<String>,
    /// Models tried with a relaxed quality floor when no priority model fits
    pub fallback_models: Vec<String>,
    /// Maximum estimated cost per 1000 tokens (USD)
    pub cost_ceiling_per_1k_tokens: f64,
}

/// Mapping from task category to [`TaskPolicy`]
///
/// Every model reference is validated against the catalog at construction,
/// so a misconfigured policy fails at startup rather than at task time.
#[derive(Debug)]
pub struct PolicyTable {
    policies: IndexMap<String, TaskPolicy>,
}

impl PolicyTable {
    /// Build a table from explicit policies, validating against the catalog
    ///
    /// # Errors
    ///
    /// Returns an error when a policy has no priority models or references
    /// a model id the catalog does not contain
    pub fn new(
        policies: IndexMap<String, TaskPolicy>,
        catalog: &Catalog,
    ) -> Result<Self, CatalogError> {
        for (category, policy) in &policies {
            if policy.priority_models.is_empty() {
                return Err(CatalogError::EmptyPriorityList {
                    category: category.clone(),
                });
            }
            for model in policy.priority_models.iter().chain(&policy.fallback_models) {
                if !catalog.contains(model) {
                    return Err(CatalogError::DanglingModelReference {
                        category: category.clone(),
                        model: model.clone(),
                    });
                }
            }
        }

        Ok(Self { policies })
    }

    /// Build a table from configuration entries
    ///
    /// # Errors
    ///
    /// Returns an error when validation against the catalog fails
    pub fn from_config(
        configs: &IndexMap<String, TaskPolicyConfig>,
        catalog: &Catalog,
    ) -> Result<Self, CatalogError> {
        let policies = configs
            .iter()
            .map(|(category, c)| {
                let policy = TaskPolicy {
                    min_quality_score: c.min_quality_score,
                    priority_models: c.priority_models.clone(),
                    fallback_models: c.fallback_models.clone(),
                    cost_ceiling_per_1k_tokens: c.cost_ceiling_per_1k_tokens,
                };
                (category.clone(), policy)
            })
            .collect();

        Self::new(policies, catalog)
    }

    /// The built-in policy table for the content pipeline's categories
    ///
    /// # Errors
    ///
    /// Returns an error when the given catalog lacks a referenced model,
    /// which can only happen with a custom catalog
    pub fn builtin(catalog: &Catalog) -> Result<Self, CatalogError> {
        let policy = |min_quality_score: f64,
                      priority: &[&str],
                      fallback: &[&str],
                      ceiling: f64| TaskPolicy {
            min_quality_score,
            priority_models: priority.iter().map(|&m| m.to_owned()).collect(),
            fallback_models: fallback.iter().map(|&m| m.to_owned()).collect(),
            cost_ceiling_per_1k_tokens: ceiling,
        };

        let mut policies = IndexMap::new();
        policies.insert(
            "bulk_content".to_owned(),
            policy(
                80.0,
                &[
                    "deepseek/deepseek-chat",
                    "google/gemini-2.0-flash",
                    "openai/gpt-4o-mini",
                ],
                &["meta-llama/llama-3.3-70b-instruct"],
                0.002,
            ),
        );
        policies.insert(
            "deep_reasoning".to_owned(),
            policy(
                92.0,
                &["anthropic/claude-opus-4", "anthropic/claude-sonnet-4"],
                &["openai/gpt-4o", "deepseek/deepseek-chat"],
                0.05,
            ),
        );
        policies.insert(
            "code_generation".to_owned(),
            policy(
                88.0,
                &["anthropic/claude-sonnet-4", "deepseek/deepseek-chat"],
                &["openai/gpt-4o"],
                0.012,
            ),
        );
        policies.insert(
            "summarization".to_owned(),
            policy(
                75.0,
                &["google/gemini-2.0-flash", "openai/gpt-4o-mini"],
                &["meta-llama/llama-3.3-70b-instruct"],
                0.001,
            ),
        );
        policies.insert(
            "chat".to_owned(),
            policy(
                78.0,
                &["openai/gpt-4o-mini", "google/gemini-2.0-flash"],
                &["deepseek/deepseek-chat"],
                0.001,
            ),
        );

        Self::new(policies, catalog)
    }

    /// Look up the policy for a task category
    pub fn policy_for(&self, category: &str) -> Result<&TaskPolicy, CatalogError> {
        self.policies
            .get(category)
            .ok_or_else(|| CatalogError::UnknownTaskCategory {
                category: category.to_owned(),
            })
    }

    /// Registered categories in declaration order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }
}
