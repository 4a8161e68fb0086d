//! Static model catalog and task policy table
//!
//! The catalog describes every available backend model: capabilities,
//! pricing, and quality/speed/value scores. The policy table maps a task
//! category to a quality floor, ordered candidate lists, and a cost
//! ceiling. Both are loaded once at startup and never mutated.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod catalog;
mod error;
mod policy;

pub use catalog::{Capabilities, CapabilityTier, Catalog, CostTier, ModelRecord, Pricing};
pub use error::CatalogError;
pub use policy::{PolicyTable, TaskPolicy};
