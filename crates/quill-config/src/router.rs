use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Provider transport and retry configuration
///
/// The API key and identification strings are expected to arrive via
/// `{{ env.VAR }}` placeholders rather than literal values.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// API key for the provider endpoint
    pub api_key: SecretString,
    /// Base URL of the chat-completion API
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Site URL sent as the `HTTP-Referer` attribution header
    #[serde(default = "default_site_url")]
    pub site_url: String,
    /// Application name sent as the `X-Title` attribution header
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Maximum execution attempts per task (includes the first attempt)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds; attempt `n` waits `base * 2^n`
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Per-call deadline in seconds, independent of backoff delays
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Interval in seconds between advertised-pricing cross-checks
    #[serde(default = "default_price_watch_interval_secs")]
    pub price_watch_interval_secs: u64,
}

fn default_base_url() -> Url {
    Url::parse("https://openrouter.ai/api/v1").expect("must be a valid URL")
}

fn default_site_url() -> String {
    "https://quill.dev".to_owned()
}

fn default_app_name() -> String {
    "Quill".to_owned()
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_backoff_base_ms() -> u64 {
    1000
}

const fn default_request_timeout_secs() -> u64 {
    120
}

const fn default_price_watch_interval_secs() -> u64 {
    3600
}
