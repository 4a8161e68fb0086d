//! Quill: cost-optimized multi-provider task router and execution engine
//!
//! Given a unit of work and a task category, Quill selects the backend
//! model under a quality floor and cost ceiling, executes the call with
//! bounded retry/backoff, computes realized cost from returned usage,
//! and maintains a running cost ledger with budget reporting.
//!
//! [`TaskRunner`] wires the pieces together; every collaborator is
//! explicitly constructed and owned, so tests run with fresh state.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

use std::sync::Arc;

use jiff::Zoned;
use jiff::civil::Date;
use quill_config::RouterConfig;
use tokio::task::JoinHandle;

pub use quill_catalog::{Catalog, CatalogError, ModelRecord, PolicyTable, TaskPolicy};
pub use quill_config::Config;
pub use quill_engine::{
    Engine, EngineError, ExecutionOutcome, OpenRouterTransport, ProviderTransport, TaskRequest,
    TokenUsage,
};
pub use quill_ledger::{CostLedger, CostReport, NaiveDaily, SpendProjection, TrailingAverage};
pub use quill_routing::{Resolver, RouteOverrides, RoutingDecision};
pub use tokio_util::sync::CancellationToken;

/// The assembled routing, execution, and accounting stack
pub struct TaskRunner {
    resolver: Resolver,
    engine: Engine,
    ledger: Arc<CostLedger>,
    catalog: Arc<Catalog>,
    router_config: RouterConfig,
}

impl TaskRunner {
    /// Build a runner from configuration with the HTTP transport
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog or policy table fails validation
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = Arc::new(OpenRouterTransport::new(&config.router));
        Self::with_transport(config, transport)
    }

    /// Build a runner with an injected transport
    ///
    /// The seam used by tests and by alternative provider backends.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog or policy table fails validation
    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn ProviderTransport>,
    ) -> anyhow::Result<Self> {
        let catalog = if config.catalog.is_empty() {
            Catalog::builtin()
        } else {
            Catalog::from_config(&config.catalog)?
        };
        let catalog = Arc::new(catalog);

        let policies = if config.policies.is_empty() {
            PolicyTable::builtin(&catalog)?
        } else {
            PolicyTable::from_config(&config.policies, &catalog)?
        };
        let policies = Arc::new(policies);

        let ledger = Arc::new(CostLedger::with_projection(
            config.budget.monthly_usd,
            Box::new(TrailingAverage {
                window_days: config.budget.projection_window_days,
            }),
        ));

        let resolver = Resolver::new(Arc::clone(&catalog), policies);
        let engine = Engine::new(
            resolver.clone(),
            transport,
            Arc::clone(&catalog),
            Arc::clone(&ledger),
            &config.router,
        );

        Ok(Self {
            resolver,
            engine,
            ledger,
            catalog,
            router_config: config.router.clone(),
        })
    }

    /// Execute a task end to end: route, call, account
    pub async fn run(&self, task: &TaskRequest) -> Result<ExecutionOutcome, EngineError> {
        self.engine.execute(task).await
    }

    /// Execute a task, aborting promptly when `cancel` fires
    pub async fn run_with_cancellation(
        &self,
        task: &TaskRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, EngineError> {
        self.engine.execute_with_cancellation(task, cancel).await
    }

    /// Resolve a category without executing anything
    ///
    /// Useful for cost estimation and for surfacing routing decisions in
    /// tooling.
    pub fn route_preview(
        &self,
        category: &str,
        overrides: Option<&RouteOverrides>,
    ) -> Result<RoutingDecision, CatalogError> {
        self.resolver.route(category, overrides)
    }

    /// Budget report for an arbitrary day
    pub fn cost_report(&self, date: Date) -> CostReport {
        self.ledger.report(date)
    }

    /// Budget report for today
    pub fn cost_report_today(&self) -> CostReport {
        self.cost_report(Zoned::now().date())
    }

    /// Spawn the background advertised-pricing cross-check
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_price_watch(&self) -> JoinHandle<()> {
        quill_engine::start_price_watch(self.router_config.clone(), Arc::clone(&self.catalog))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use quill_engine::protocol::{AssistantMessage, ChatChoice, ChatRequest, ChatResponse, Usage};

    use super::*;

    fn config() -> Config {
        Config::from_toml(
            r#"
                [router]
                api_key = "sk-or-test"
                backoff_base_ms = 1

                [budget]
                monthly_usd = 200.0
            "#,
        )
        .unwrap()
    }

    struct CannedTransport;

    #[async_trait]
    impl ProviderTransport for CannedTransport {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, EngineError> {
            Ok(ChatResponse {
                choices: vec![ChatChoice {
                    message: AssistantMessage {
                        content: Some("ten ways to improve onboarding".to_owned()),
                    },
                }],
                usage: Some(Usage {
                    prompt_tokens: 200,
                    completion_tokens: 800,
                    total_tokens: 1000,
                }),
            })
        }
    }

    #[test]
    fn builds_from_minimal_config() {
        let runner = TaskRunner::from_config(&config()).unwrap();
        let report = runner.cost_report_today();
        assert!(report.total_usd.abs() < f64::EPSILON);
        assert!((report.budget_remaining_usd - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn route_preview_uses_builtin_policies() {
        let runner = TaskRunner::from_config(&config()).unwrap();
        let decision = runner.route_preview("bulk_content", None).unwrap();
        assert_eq!(decision.model_id, "deepseek/deepseek-chat");
        assert!(!decision.used_fallback);
    }

    #[tokio::test]
    async fn run_executes_and_accounts() {
        let runner = TaskRunner::with_transport(&config(), Arc::new(CannedTransport)).unwrap();

        let outcome = runner
            .run(&TaskRequest::new("bulk_content", "draft a listicle"))
            .await
            .unwrap();

        // deepseek-chat: 200/1M * 0.27 + 800/1M * 1.1 = 0.000934
        assert_eq!(outcome.model_id, "deepseek/deepseek-chat");
        assert!((outcome.cost_usd - 0.000_934).abs() < 1e-9);

        let report = runner.cost_report_today();
        assert!((report.total_usd - 0.000_934).abs() < 1e-9);
        assert!((report.by_task["bulk_content"] - 0.000_934).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unknown_category_surfaces_routing_error() {
        let runner = TaskRunner::with_transport(&config(), Arc::new(CannedTransport)).unwrap();
        let err = runner
            .run(&TaskRequest::new("video_scripts", "storyboard"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Routing(_)));
    }
}
