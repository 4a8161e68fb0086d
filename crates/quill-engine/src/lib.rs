//! Task execution engine
//!
//! Takes a routing decision, executes the provider call with bounded
//! retry and exponential backoff, computes realized cost from actual
//! reported usage, and records spend into the cost ledger. All
//! collaborators (transport, catalog, ledger, resolver) are injected.

#![allow(clippy::must_use_candidate)]

mod engine;
mod error;
pub mod pricing;
pub mod protocol;
pub mod provider;

pub use engine::{Engine, ExecutionOutcome, TaskRequest, TokenUsage};
pub use error::EngineError;
pub use pricing::{PriceDrift, check_prices, start_price_watch};
pub use provider::ProviderTransport;
pub use provider::openrouter::OpenRouterTransport;
