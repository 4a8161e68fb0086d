//! Provider transport seam
//!
//! The engine talks to backends through this trait so tests and
//! alternative providers can be injected without touching the retry or
//! accounting logic.

pub mod openrouter;

use async_trait::async_trait;

use crate::error::EngineError;
use crate::protocol::{ChatRequest, ChatResponse};

/// One chat-completion backend
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    /// Provider name, used in logs
    fn name(&self) -> &str;

    /// Send a single completion request
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Transport`] for network failures and non-2xx
    /// responses, [`EngineError::MalformedResponse`] for unparseable
    /// payloads
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, EngineError>;
}
