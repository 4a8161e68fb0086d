use quill_catalog::CatalogError;
use thiserror::Error;

/// Errors that can occur during task execution
#[derive(Debug, Error)]
pub enum EngineError {
    /// Transient transport or provider failure; drives the backoff loop
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider returned a payload that could not be interpreted
    ///
    /// Deterministic, so never retried; retrying a parse failure only
    /// burns retry budget.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// All attempts failed; carries the last underlying error
    #[error("retry budget exhausted after {attempts} attempts")]
    RetryBudgetExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The error from the final attempt
        #[source]
        last_error: Box<EngineError>,
    },

    /// The caller abandoned the task
    #[error("execution cancelled")]
    Cancelled,

    /// Routing or catalog lookup failed (configuration error)
    #[error(transparent)]
    Routing(#[from] CatalogError),
}

impl EngineError {
    /// Whether another attempt against the same model may succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
