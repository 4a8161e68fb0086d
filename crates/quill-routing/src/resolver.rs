use std::sync::Arc;

use quill_catalog::{Catalog, CatalogError, ModelRecord, PolicyTable, TaskPolicy};

use crate::{RouteOverrides, RoutingDecision};

/// Multiplier applied to the quality floor when scanning fallback models
const FALLBACK_QUALITY_RELAXATION: f64 = 0.9;

/// Pure routing resolver over a catalog and policy table
#[derive(Debug, Clone)]
pub struct Resolver {
    catalog: Arc<Catalog>,
    policies: Arc<PolicyTable>,
}

impl Resolver {
    /// Create a resolver over shared catalog and policy table
    pub fn new(catalog: Arc<Catalog>, policies: Arc<PolicyTable>) -> Self {
        Self { catalog, policies }
    }

    /// Resolve a task category to a model
    ///
    /// Scans the policy's priority models in order for the first that
    /// meets the quality floor within the cost ceiling, then the fallback
    /// models with the floor relaxed by 10%, and finally returns the
    /// catalog's best-value model unconditionally. For a registered
    /// category this never fails.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTaskCategory`] for an unregistered
    /// category; startup validation makes this unreachable for configured
    /// callers
    pub fn route(
        &self,
        category: &str,
        overrides: Option<&RouteOverrides>,
    ) -> Result<RoutingDecision, CatalogError> {
        let policy = self.policies.policy_for(category)?;

        let min_quality = overrides
            .and_then(|o| o.min_quality)
            .unwrap_or(policy.min_quality_score);
        let max_cost_per_1k = overrides
            .and_then(|o| o.max_cost_per_1k)
            .unwrap_or(policy.cost_ceiling_per_1k_tokens);

        let decision = self.decide(category, policy, min_quality, max_cost_per_1k);

        tracing::info!(
            category,
            model = %decision.model_id,
            used_fallback = decision.used_fallback,
            estimated_cost_per_1k = decision.estimated_cost_per_1k,
            "routing decision made"
        );

        Ok(decision)
    }

    fn decide(
        &self,
        category: &str,
        policy: &TaskPolicy,
        min_quality: f64,
        max_cost_per_1k: f64,
    ) -> RoutingDecision {
        if let Some(record) = self.first_qualifying(&policy.priority_models, min_quality, max_cost_per_1k) {
            return decision_for(
                record,
                false,
                format!(
                    "priority model for '{category}': quality {:.0} meets floor {min_quality:.1} at \
                     ${:.6}/1k within ceiling ${max_cost_per_1k:.6}",
                    record.quality,
                    record.estimated_cost_per_1k(),
                ),
            );
        }

        // Fallback scan keeps the cost ceiling but relaxes the floor
        let relaxed_floor = min_quality * FALLBACK_QUALITY_RELAXATION;
        if let Some(record) = self.first_qualifying(&policy.fallback_models, relaxed_floor, max_cost_per_1k) {
            return decision_for(
                record,
                true,
                format!(
                    "fallback model for '{category}': quality {:.0} meets relaxed floor \
                     {relaxed_floor:.1} at ${:.6}/1k within ceiling ${max_cost_per_1k:.6}",
                    record.quality,
                    record.estimated_cost_per_1k(),
                ),
            );
        }

        // Guaranteed default keeps routing a total function
        let best = self.catalog.best_value();
        tracing::warn!(
            category,
            model = %best.id,
            "no candidate met constraints, using best global value model"
        );
        decision_for(
            best,
            true,
            format!(
                "no candidate for '{category}' met quality floor {min_quality:.1} within ceiling \
                 ${max_cost_per_1k:.6}; defaulting to best global value model"
            ),
        )
    }

    /// First model in `candidates` meeting the floor within the ceiling
    fn first_qualifying(
        &self,
        candidates: &[String],
        min_quality: f64,
        max_cost_per_1k: f64,
    ) -> Option<&ModelRecord> {
        candidates
            .iter()
            .filter_map(|id| self.catalog.lookup(id).ok())
            .find(|record| {
                record.quality >= min_quality && record.estimated_cost_per_1k() <= max_cost_per_1k
            })
    }
}

fn decision_for(record: &ModelRecord, used_fallback: bool, justification: String) -> RoutingDecision {
    RoutingDecision {
        model_id: record.id.clone(),
        justification,
        estimated_cost_per_1k: record.estimated_cost_per_1k(),
        quality_score: record.quality,
        used_fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use quill_catalog::TaskPolicy;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::builtin())
    }

    fn table(catalog: &Catalog, policies: Vec<(&str, TaskPolicy)>) -> Arc<PolicyTable> {
        let map: IndexMap<String, TaskPolicy> = policies
            .into_iter()
            .map(|(c, p)| (c.to_owned(), p))
            .collect();
        Arc::new(PolicyTable::new(map, catalog).unwrap())
    }

    fn policy(
        min_quality: f64,
        priority: &[&str],
        fallback: &[&str],
        ceiling: f64,
    ) -> TaskPolicy {
        TaskPolicy {
            min_quality_score: min_quality,
            priority_models: priority.iter().map(|&m| m.to_owned()).collect(),
            fallback_models: fallback.iter().map(|&m| m.to_owned()).collect(),
            cost_ceiling_per_1k_tokens: ceiling,
        }
    }

    #[test]
    fn qualifying_priority_model_selected() {
        // claude-opus-4: quality 98, est (15 + 75)/2/1000 = 0.045
        let catalog = catalog();
        let policies = table(
            &catalog,
            vec![("reasoning", policy(90.0, &["anthropic/claude-opus-4"], &[], 0.1))],
        );
        let resolver = Resolver::new(catalog, policies);

        let decision = resolver.route("reasoning", None).unwrap();
        assert_eq!(decision.model_id, "anthropic/claude-opus-4");
        assert!(!decision.used_fallback);
        assert!((decision.estimated_cost_per_1k - 0.045).abs() < 1e-12);
        assert!((decision.quality_score - 98.0).abs() < f64::EPSILON);
    }

    #[test]
    fn first_qualifying_priority_model_wins() {
        // deepseek-chat (92, est 0.000685) precedes gpt-4o (90, est 0.00625);
        // both qualify, the first listed is taken.
        let catalog = catalog();
        let policies = table(
            &catalog,
            vec![(
                "bulk",
                policy(80.0, &["deepseek/deepseek-chat", "openai/gpt-4o"], &[], 0.02),
            )],
        );
        let resolver = Resolver::new(catalog, policies);

        let decision = resolver.route("bulk", None).unwrap();
        assert_eq!(decision.model_id, "deepseek/deepseek-chat");
        assert!(!decision.used_fallback);
    }

    #[test]
    fn fallback_uses_relaxed_quality_floor() {
        // Floor 95: llama (78) fails outright; deepseek (92) fails the
        // strict floor but passes the relaxed one (95 * 0.9 = 85.5).
        let catalog = catalog();
        let policies = table(
            &catalog,
            vec![(
                "strict",
                policy(
                    95.0,
                    &["meta-llama/llama-3.3-70b-instruct"],
                    &["deepseek/deepseek-chat"],
                    0.001,
                ),
            )],
        );
        let resolver = Resolver::new(catalog, policies);

        let decision = resolver.route("strict", None).unwrap();
        assert_eq!(decision.model_id, "deepseek/deepseek-chat");
        assert!(decision.used_fallback);
    }

    #[test]
    fn exhausted_candidates_fall_back_to_best_value() {
        // Ceiling far below every candidate's estimate
        let catalog = catalog();
        let policies = table(
            &catalog,
            vec![(
                "impossible",
                policy(99.0, &["anthropic/claude-opus-4"], &["openai/gpt-4o"], 0.000_001),
            )],
        );
        let resolver = Resolver::new(Arc::clone(&catalog), policies);

        let decision = resolver.route("impossible", None).unwrap();
        assert_eq!(decision.model_id, catalog.best_value().id);
        assert!(decision.used_fallback);
        assert!(decision.justification.contains("best global value"));
    }

    #[test]
    fn overrides_replace_policy_constraints() {
        // Policy would accept opus; the override ceiling excludes it and
        // the override floor lets sonnet through instead.
        let catalog = catalog();
        let policies = table(
            &catalog,
            vec![(
                "reasoning",
                policy(
                    92.0,
                    &["anthropic/claude-opus-4", "anthropic/claude-sonnet-4"],
                    &[],
                    0.1,
                ),
            )],
        );
        let resolver = Resolver::new(catalog, policies);

        let overrides = RouteOverrides {
            min_quality: Some(90.0),
            max_cost_per_1k: Some(0.01),
        };
        let decision = resolver.route("reasoning", Some(&overrides)).unwrap();
        assert_eq!(decision.model_id, "anthropic/claude-sonnet-4");
        assert!(!decision.used_fallback);
    }

    #[test]
    fn routing_is_deterministic() {
        let catalog = catalog();
        let policies = Arc::new(PolicyTable::builtin(&catalog).unwrap());
        let resolver = Resolver::new(catalog, policies);

        let first = resolver.route("bulk_content", None).unwrap();
        for _ in 0..20 {
            let again = resolver.route("bulk_content", None).unwrap();
            assert_eq!(again.model_id, first.model_id);
            assert_eq!(again.used_fallback, first.used_fallback);
            assert_eq!(again.justification, first.justification);
        }
    }

    #[test]
    fn routing_is_total_for_registered_categories() {
        let catalog = catalog();
        let policies = Arc::new(PolicyTable::builtin(&catalog).unwrap());
        let categories: Vec<String> = policies.categories().map(str::to_owned).collect();
        let resolver = Resolver::new(catalog, policies);

        // Even with impossible overrides every category resolves
        let overrides = RouteOverrides {
            min_quality: Some(100.0),
            max_cost_per_1k: Some(0.0),
        };
        for category in categories {
            assert!(resolver.route(&category, Some(&overrides)).is_ok());
        }
    }

    #[test]
    fn unknown_category_errors() {
        let catalog = catalog();
        let policies = Arc::new(PolicyTable::builtin(&catalog).unwrap());
        let resolver = Resolver::new(catalog, policies);

        let err = resolver.route("video_scripts", None).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownTaskCategory { .. }));
    }
}
