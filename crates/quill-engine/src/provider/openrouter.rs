//! OpenRouter-compatible HTTP transport

use async_trait::async_trait;
use quill_config::RouterConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::ProviderTransport;
use crate::error::EngineError;
use crate::protocol::{ChatRequest, ChatResponse};

/// HTTP transport for an OpenRouter-compatible chat-completion endpoint
///
/// Sends bearer authentication plus the `HTTP-Referer` and `X-Title`
/// attribution headers the provider expects.
pub struct OpenRouterTransport {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    site_url: String,
    app_name: String,
}

impl OpenRouterTransport {
    /// Create a transport from configuration
    pub fn new(config: &RouterConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            site_url: config.site_url.clone(),
            app_name: config.app_name.clone(),
        }
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl ProviderTransport for OpenRouterTransport {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, EngineError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.app_name)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(model = %request.model, error = %e, "provider request failed");
                EngineError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(model = %request.model, %status, "provider returned error");
            return Err(EngineError::Transport(format!("provider returned {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::MalformedResponse(e.to_string()))
    }
}
