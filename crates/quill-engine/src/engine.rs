//! Task execution: route once, attempt with bounded backoff, account cost

use std::sync::Arc;
use std::time::Duration;

use jiff::Zoned;
use quill_catalog::Catalog;
use quill_config::RouterConfig;
use quill_ledger::CostLedger;
use quill_routing::{Resolver, RouteOverrides};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::EngineError;
use crate::protocol::{ChatMessage, ChatRequest, Usage};
use crate::provider::ProviderTransport;

/// One unit of work to execute
#[derive(Debug, Clone)]
pub struct TaskRequest {
    /// Task category, must be registered in the policy table
    pub category: String,
    /// Task content sent as the user message
    pub content: String,
    /// Optional system message sent ahead of the content
    pub system_prompt: Option<String>,
    /// Optional routing constraint overrides
    pub overrides: Option<RouteOverrides>,
    /// Sampling temperature forwarded to the provider
    pub temperature: Option<f64>,
    /// Output token cap forwarded to the provider
    pub max_tokens: Option<u32>,
}

impl TaskRequest {
    /// A task with no system prompt, overrides, or sampling options
    pub fn new(category: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            content: content.into(),
            system_prompt: None,
            overrides: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Token usage for a completed execution
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub input_tokens: u32,
    /// Tokens generated in the completion
    pub output_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

impl From<Usage> for TokenUsage {
    fn from(usage: Usage) -> Self {
        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

/// Result of a successfully executed task
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Model that served the task
    pub model_id: String,
    /// Provider's response text
    pub content: String,
    /// Provider-reported token usage
    pub usage: TokenUsage,
    /// Realized cost in USD from actual usage and catalog pricing
    pub cost_usd: f64,
    /// Wall-clock latency across all attempts
    pub latency: Duration,
    /// The routing justification for the chosen model
    pub justification: String,
    /// Attempts consumed, 1 when the first try succeeded
    pub attempts_used: u32,
    /// Whether the final allowed attempt was the one that succeeded
    pub retry_budget_exhausted: bool,
    /// Whether a fallback model (not a priority model) was chosen
    pub used_fallback_model: bool,
}

/// Executes tasks against a provider with bounded retry and cost accounting
///
/// The resolver is consulted once per task; retries stay on the chosen
/// model so the quoted price and quality hold for the task's lifetime.
pub struct Engine {
    resolver: Resolver,
    transport: Arc<dyn ProviderTransport>,
    catalog: Arc<Catalog>,
    ledger: Arc<CostLedger>,
    max_attempts: u32,
    backoff_base: Duration,
    request_timeout: Duration,
}

impl Engine {
    /// Assemble an engine from its collaborators
    pub fn new(
        resolver: Resolver,
        transport: Arc<dyn ProviderTransport>,
        catalog: Arc<Catalog>,
        ledger: Arc<CostLedger>,
        config: &RouterConfig,
    ) -> Self {
        Self {
            resolver,
            transport,
            catalog,
            ledger,
            max_attempts: config.max_attempts.max(1),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Execute a task to completion
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RetryBudgetExhausted`] once all attempts
    /// fail, [`EngineError::MalformedResponse`] immediately on an
    /// unparseable payload, or [`EngineError::Routing`] for an
    /// unregistered category
    pub async fn execute(&self, task: &TaskRequest) -> Result<ExecutionOutcome, EngineError> {
        self.execute_with_cancellation(task, &CancellationToken::new())
            .await
    }

    /// Execute a task, aborting promptly when `cancel` fires
    ///
    /// Cancellation interrupts both in-flight provider calls and backoff
    /// sleeps, so an abandoned task stops consuming retry budget and
    /// provider quota.
    ///
    /// # Errors
    ///
    /// As [`Engine::execute`], plus [`EngineError::Cancelled`]
    pub async fn execute_with_cancellation(
        &self,
        task: &TaskRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, EngineError> {
        let decision = self.resolver.route(&task.category, task.overrides.as_ref())?;
        let record = self.catalog.lookup(&decision.model_id)?;

        let request = build_request(task, &decision.model_id);
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let mut last_error = EngineError::Transport("no attempts were made".to_owned());

        for attempt in 1..=self.max_attempts {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            match self.attempt(&request, cancel).await {
                Ok(response) => {
                    let usage: TokenUsage = response.usage.unwrap_or_else(|| {
                        tracing::warn!(
                            %request_id,
                            model = %decision.model_id,
                            "provider omitted usage, recording zero cost"
                        );
                        Usage::default()
                    }).into();

                    let content = response
                        .choices
                        .first()
                        .and_then(|c| c.message.content.clone())
                        .ok_or_else(|| {
                            EngineError::MalformedResponse("response contained no message content".to_owned())
                        })?;

                    let cost_usd = record.realized_cost(usage.input_tokens, usage.output_tokens);
                    let today = Zoned::now().date();
                    self.ledger.record(today, &decision.model_id, &task.category, cost_usd);

                    tracing::info!(
                        %request_id,
                        category = %task.category,
                        model = %decision.model_id,
                        attempt,
                        cost_usd,
                        "task executed"
                    );

                    return Ok(ExecutionOutcome {
                        model_id: decision.model_id,
                        content,
                        usage,
                        cost_usd,
                        latency: started.elapsed(),
                        justification: decision.justification,
                        attempts_used: attempt,
                        retry_budget_exhausted: attempt == self.max_attempts,
                        used_fallback_model: decision.used_fallback,
                    });
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        %request_id,
                        model = %decision.model_id,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "attempt failed, backing off"
                    );
                    last_error = e;

                    // The source system sleeps after every failure, the
                    // final one included, before surfacing exhaustion.
                    tokio::select! {
                        () = cancel.cancelled() => return Err(EngineError::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        Err(EngineError::RetryBudgetExhausted {
            attempts: self.max_attempts,
            last_error: Box::new(last_error),
        })
    }

    /// One provider call under the per-call deadline
    async fn attempt(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<crate::protocol::ChatResponse, EngineError> {
        let call = tokio::time::timeout(self.request_timeout, self.transport.complete(request));

        tokio::select! {
            () = cancel.cancelled() => Err(EngineError::Cancelled),
            result = call => match result {
                Ok(inner) => inner,
                Err(_) => Err(EngineError::Transport(format!(
                    "provider call exceeded deadline of {:?}",
                    self.request_timeout
                ))),
            },
        }
    }

    /// Backoff slept after failed attempt `n`: `base * 2^n`
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt)
    }
}

/// Assemble the wire request for a task
fn build_request(task: &TaskRequest, model_id: &str) -> ChatRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &task.system_prompt {
        messages.push(ChatMessage::system(system.clone()));
    }
    messages.push(ChatMessage::user(task.content.clone()));

    ChatRequest {
        model: model_id.to_owned(),
        messages,
        temperature: task.temperature,
        max_tokens: task.max_tokens,
    }
}
