//! Advertised-pricing cross-check
//!
//! The provider's model listing advertises per-token prices. The routing
//! catalog is static, so a background task periodically compares the two
//! and warns when they drift. Routing never depends on this endpoint.

use std::sync::Arc;
use std::time::Duration;

use quill_catalog::Catalog;
use quill_config::RouterConfig;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::error::EngineError;

/// Relative tolerance before a price difference counts as drift
const DRIFT_TOLERANCE: f64 = 0.001;

/// A catalog price that no longer matches the provider's advertised price
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDrift {
    /// Model id
    pub model: String,
    /// Catalog price per million input tokens
    pub catalog_input_per_mtok: f64,
    /// Advertised price per million input tokens
    pub advertised_input_per_mtok: f64,
    /// Catalog price per million output tokens
    pub catalog_output_per_mtok: f64,
    /// Advertised price per million output tokens
    pub advertised_output_per_mtok: f64,
}

/// Model listing wire format
#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ListedModel>,
}

/// One advertised model
#[derive(Debug, Deserialize)]
struct ListedModel {
    id: String,
    pricing: ListedPricing,
}

/// Advertised per-token prices, USD, as decimal strings
#[derive(Debug, Deserialize)]
struct ListedPricing {
    prompt: String,
    completion: String,
}

/// Start the background price watch task
///
/// Checks immediately, then on the configured interval. The task runs
/// for the process lifetime; drop the returned handle to detach it.
pub fn start_price_watch(config: RouterConfig, catalog: Arc<Catalog>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let client = Client::new();
        let mut interval =
            tokio::time::interval(Duration::from_secs(config.price_watch_interval_secs.max(1)));

        loop {
            interval.tick().await;

            match check_prices(&client, &config, &catalog).await {
                Ok(drifts) => {
                    for drift in drifts {
                        tracing::warn!(
                            model = %drift.model,
                            catalog_input = drift.catalog_input_per_mtok,
                            advertised_input = drift.advertised_input_per_mtok,
                            catalog_output = drift.catalog_output_per_mtok,
                            advertised_output = drift.advertised_output_per_mtok,
                            "catalog pricing drifted from advertised pricing"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "price check failed");
                }
            }
        }
    })
}

/// Fetch the provider's model listing and compare against the catalog
///
/// Models absent from the catalog are ignored; models with unparseable
/// advertised prices are skipped with a warning.
///
/// # Errors
///
/// Returns [`EngineError::Transport`] when the listing request fails and
/// [`EngineError::MalformedResponse`] when its payload cannot be parsed
pub async fn check_prices(
    client: &Client,
    config: &RouterConfig,
    catalog: &Catalog,
) -> Result<Vec<PriceDrift>, EngineError> {
    let base = config.base_url.as_str().trim_end_matches('/');
    let url = format!("{base}/models");

    let response = client
        .get(&url)
        .bearer_auth(config.api_key.expose_secret())
        .send()
        .await
        .map_err(|e| EngineError::Transport(e.to_string()))?;

    if !response.status().is_success() {
        return Err(EngineError::Transport(format!(
            "model listing returned {}",
            response.status()
        )));
    }

    let listing: ModelList = response
        .json()
        .await
        .map_err(|e| EngineError::MalformedResponse(e.to_string()))?;

    let mut drifts = Vec::new();

    for listed in listing.data {
        let Ok(record) = catalog.lookup(&listed.id) else {
            continue;
        };

        let (Ok(prompt_per_token), Ok(completion_per_token)) = (
            listed.pricing.prompt.parse::<f64>(),
            listed.pricing.completion.parse::<f64>(),
        ) else {
            tracing::warn!(model = %listed.id, "unparseable advertised pricing, skipping");
            continue;
        };

        // Advertised prices are per token; the catalog is per million
        let advertised_input = prompt_per_token * 1_000_000.0;
        let advertised_output = completion_per_token * 1_000_000.0;

        if drifted(record.pricing.input_per_mtok, advertised_input)
            || drifted(record.pricing.output_per_mtok, advertised_output)
        {
            drifts.push(PriceDrift {
                model: listed.id,
                catalog_input_per_mtok: record.pricing.input_per_mtok,
                advertised_input_per_mtok: advertised_input,
                catalog_output_per_mtok: record.pricing.output_per_mtok,
                advertised_output_per_mtok: advertised_output,
            });
        }
    }

    Ok(drifts)
}

/// Whether two prices differ beyond the relative tolerance
fn drifted(cataloged: f64, advertised: f64) -> bool {
    (cataloged - advertised).abs() > cataloged.abs() * DRIFT_TOLERANCE + f64::EPSILON
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_config(base_url: &str) -> RouterConfig {
        let toml = format!(
            r#"
                api_key = "sk-or-test"
                base_url = "{base_url}"
            "#
        );
        toml::from_str(&toml).unwrap()
    }

    fn listing_body(entries: &[(&str, f64, f64)]) -> serde_json::Value {
        let data: Vec<serde_json::Value> = entries
            .iter()
            .map(|(id, prompt_per_mtok, completion_per_mtok)| {
                serde_json::json!({
                    "id": id,
                    "pricing": {
                        "prompt": format!("{}", prompt_per_mtok / 1_000_000.0),
                        "completion": format!("{}", completion_per_mtok / 1_000_000.0),
                    }
                })
            })
            .collect();
        serde_json::json!({ "data": data })
    }

    #[tokio::test]
    async fn matching_prices_report_no_drift() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(bearer_token("sk-or-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(&[
                ("deepseek/deepseek-chat", 0.27, 1.1),
                ("openai/gpt-4o", 2.5, 10.0),
            ])))
            .mount(&server)
            .await;

        let catalog = Catalog::builtin();
        let drifts = check_prices(&Client::new(), &test_config(&server.uri()), &catalog)
            .await
            .unwrap();

        assert!(drifts.is_empty());
    }

    #[tokio::test]
    async fn drifted_price_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(&[
                // Catalog says 0.27 in / 1.1 out
                ("deepseek/deepseek-chat", 0.55, 2.19),
            ])))
            .mount(&server)
            .await;

        let catalog = Catalog::builtin();
        let drifts = check_prices(&Client::new(), &test_config(&server.uri()), &catalog)
            .await
            .unwrap();

        assert_eq!(drifts.len(), 1);
        assert_eq!(drifts[0].model, "deepseek/deepseek-chat");
        assert!((drifts[0].advertised_input_per_mtok - 0.55).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unknown_models_are_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(&[
                ("experimental/new-model", 42.0, 99.0),
            ])))
            .mount(&server)
            .await;

        let catalog = Catalog::builtin();
        let drifts = check_prices(&Client::new(), &test_config(&server.uri()), &catalog)
            .await
            .unwrap();

        assert!(drifts.is_empty());
    }

    #[tokio::test]
    async fn listing_failure_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let catalog = Catalog::builtin();
        let err = check_prices(&Client::new(), &test_config(&server.uri()), &catalog)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Transport(_)));
    }
}
