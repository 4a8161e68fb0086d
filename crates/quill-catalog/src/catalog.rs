use indexmap::IndexMap;
use quill_config::{CapabilityTierConfig, CostTierConfig, ModelRecordConfig};

use crate::error::CatalogError;

/// Per-token pricing for a model, USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    /// Price per million input tokens
    pub input_per_mtok: f64,
    /// Price per million output tokens
    pub output_per_mtok: f64,
}

/// Coarse capability tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CapabilityTier {
    /// Adequate for simple tasks
    Basic,
    /// Solid general capability
    Good,
    /// Near-frontier capability
    Strong,
    /// Frontier capability
    Frontier,
}

impl From<CapabilityTierConfig> for CapabilityTier {
    fn from(tier: CapabilityTierConfig) -> Self {
        match tier {
            CapabilityTierConfig::Basic => Self::Basic,
            CapabilityTierConfig::Good => Self::Good,
            CapabilityTierConfig::Strong => Self::Strong,
            CapabilityTierConfig::Frontier => Self::Frontier,
        }
    }
}

/// Capability vector for a model
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Reasoning capability tier
    pub reasoning: CapabilityTier,
    /// Coding capability tier
    pub coding: CapabilityTier,
    /// Math capability tier
    pub math: CapabilityTier,
    /// Whether the model accepts image input
    pub vision: bool,
    /// Context window in tokens
    pub context_window: u32,
    /// Maximum output tokens per completion
    pub max_output_tokens: u32,
}

/// Composite cost tier of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostTier {
    /// Cheapest tier, suited to bulk work
    Budget,
    /// Mid-range pricing
    Standard,
    /// Frontier pricing
    Premium,
}

impl From<CostTierConfig> for CostTier {
    fn from(tier: CostTierConfig) -> Self {
        match tier {
            CostTierConfig::Budget => Self::Budget,
            CostTierConfig::Standard => Self::Standard,
            CostTierConfig::Premium => Self::Premium,
        }
    }
}

/// Immutable description of one backend model
#[derive(Debug, Clone)]
pub struct ModelRecord {
    /// Model identifier in "provider/model" form
    pub id: String,
    /// Provider identifier
    pub provider: String,
    /// Capability vector
    pub capabilities: Capabilities,
    /// Per-token pricing
    pub pricing: Pricing,
    /// Composite cost tier
    pub cost_tier: CostTier,
    /// Quality score, 0 to 100
    pub quality: f64,
    /// Speed score, 0 to 100
    pub speed: f64,
    /// Value score, 0 to 100
    pub value: f64,
}

impl ModelRecord {
    /// Estimated cost per 1000 tokens assuming an even input/output split
    ///
    /// A pre-call filter only; realized spend always comes from
    /// [`ModelRecord::realized_cost`] over actual reported usage.
    pub fn estimated_cost_per_1k(&self) -> f64 {
        (self.pricing.input_per_mtok + self.pricing.output_per_mtok) / 2.0 / 1000.0
    }

    /// Realized cost in USD for actual reported token usage
    pub fn realized_cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        let input_cost = f64::from(input_tokens) / 1_000_000.0 * self.pricing.input_per_mtok;
        let output_cost = f64::from(output_tokens) / 1_000_000.0 * self.pricing.output_per_mtok;
        input_cost + output_cost
    }
}

/// Fixed mapping from model id to [`ModelRecord`]
///
/// Immutable for the process lifetime.
#[derive(Debug)]
pub struct Catalog {
    models: IndexMap<String, ModelRecord>,
}

impl Catalog {
    /// Build a catalog from configuration records
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyCatalog`] when no records are given
    pub fn from_config(configs: &[ModelRecordConfig]) -> Result<Self, CatalogError> {
        if configs.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let models = configs
            .iter()
            .map(|c| {
                let record = ModelRecord {
                    id: c.id.clone(),
                    provider: c.provider.clone(),
                    capabilities: Capabilities {
                        reasoning: c.capabilities.reasoning.into(),
                        coding: c.capabilities.coding.into(),
                        math: c.capabilities.math.into(),
                        vision: c.capabilities.vision,
                        context_window: c.context_window,
                        max_output_tokens: c.max_output_tokens,
                    },
                    pricing: Pricing {
                        input_per_mtok: c.input_per_mtok,
                        output_per_mtok: c.output_per_mtok,
                    },
                    cost_tier: c.cost_tier.into(),
                    quality: c.quality,
                    speed: c.speed,
                    value: c.value,
                };
                (c.id.clone(), record)
            })
            .collect();

        Ok(Self { models })
    }

    /// The built-in default catalog
    pub fn builtin() -> Self {
        let records = builtin_records();
        let models = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self { models }
    }

    /// Look up a model by id
    pub fn lookup(&self, model_id: &str) -> Result<&ModelRecord, CatalogError> {
        self.models.get(model_id).ok_or_else(|| CatalogError::ModelNotFound {
            model: model_id.to_owned(),
        })
    }

    /// Whether the catalog contains the given model id
    pub fn contains(&self, model_id: &str) -> bool {
        self.models.contains_key(model_id)
    }

    /// The model with the highest value score
    ///
    /// Used as the guaranteed routing default, so routing is a total
    /// function. The catalog is never empty, so this always resolves.
    ///
    /// # Panics
    ///
    /// Panics if the catalog holds no models, which construction rejects
    pub fn best_value(&self) -> &ModelRecord {
        self.models
            .values()
            .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(std::cmp::Ordering::Equal))
            .expect("catalog construction rejects the empty case")
    }

    /// Iterate all records in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ModelRecord> {
        self.models.values()
    }

    /// Number of models in the catalog
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the catalog is empty (never true for constructed catalogs)
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// The built-in model set
///
/// Pricing mirrors the provider's published per-Mtok rates at the time of
/// writing; the price watch in `quill-engine` warns when these drift.
fn builtin_records() -> Vec<ModelRecord> {
    let record = |id: &str,
                  provider: &str,
                  context_window: u32,
                  max_output_tokens: u32,
                  input: f64,
                  output: f64,
                  cost_tier: CostTier,
                  quality: f64,
                  speed: f64,
                  value: f64,
                  reasoning: CapabilityTier,
                  coding: CapabilityTier,
                  math: CapabilityTier,
                  vision: bool| ModelRecord {
        id: id.to_owned(),
        provider: provider.to_owned(),
        capabilities: Capabilities {
            reasoning,
            coding,
            math,
            vision,
            context_window,
            max_output_tokens,
        },
        pricing: Pricing {
            input_per_mtok: input,
            output_per_mtok: output,
        },
        cost_tier,
        quality,
        speed,
        value,
    };

    vec![
        record(
            "anthropic/claude-opus-4",
            "anthropic",
            200_000,
            32_000,
            15.0,
            75.0,
            CostTier::Premium,
            98.0,
            50.0,
            60.0,
            CapabilityTier::Frontier,
            CapabilityTier::Frontier,
            CapabilityTier::Frontier,
            true,
        ),
        record(
            "anthropic/claude-sonnet-4",
            "anthropic",
            200_000,
            64_000,
            3.0,
            15.0,
            CostTier::Standard,
            94.0,
            70.0,
            82.0,
            CapabilityTier::Frontier,
            CapabilityTier::Frontier,
            CapabilityTier::Strong,
            true,
        ),
        record(
            "openai/gpt-4o",
            "openai",
            128_000,
            16_384,
            2.5,
            10.0,
            CostTier::Standard,
            90.0,
            75.0,
            78.0,
            CapabilityTier::Strong,
            CapabilityTier::Strong,
            CapabilityTier::Strong,
            true,
        ),
        record(
            "openai/gpt-4o-mini",
            "openai",
            128_000,
            16_384,
            0.15,
            0.6,
            CostTier::Budget,
            80.0,
            90.0,
            92.0,
            CapabilityTier::Good,
            CapabilityTier::Good,
            CapabilityTier::Good,
            true,
        ),
        record(
            "deepseek/deepseek-chat",
            "deepseek",
            64_000,
            8_192,
            0.27,
            1.1,
            CostTier::Budget,
            92.0,
            80.0,
            96.0,
            CapabilityTier::Strong,
            CapabilityTier::Strong,
            CapabilityTier::Strong,
            false,
        ),
        record(
            "google/gemini-2.0-flash",
            "google",
            1_000_000,
            8_192,
            0.1,
            0.4,
            CostTier::Budget,
            84.0,
            95.0,
            94.0,
            CapabilityTier::Good,
            CapabilityTier::Good,
            CapabilityTier::Good,
            true,
        ),
        record(
            "meta-llama/llama-3.3-70b-instruct",
            "meta-llama",
            131_072,
            8_192,
            0.12,
            0.3,
            CostTier::Budget,
            78.0,
            85.0,
            90.0,
            CapabilityTier::Good,
            CapabilityTier::Good,
            CapabilityTier::Basic,
            false,
        ),
    ]
}
