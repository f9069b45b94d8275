// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static catalog of routable models and the pure helpers over it.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use switchyard_core::SwitchyardError;

/// Ordered capability class of a model.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    Low,
    Mid,
    High,
}

/// Capability and price profile of one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Model {
    pub id: &'static str,
    pub name: &'static str,
    pub tier: ModelTier,
    pub provider: &'static str,
    /// USD per million input tokens.
    pub input_per_mtok: f64,
    /// USD per million output tokens.
    pub output_per_mtok: f64,
    pub max_context_tokens: u32,
    pub avg_latency_ms: u32,
}

pub const CLAUDE_HAIKU: Model = Model {
    id: "claude-haiku-4-5-20251001",
    name: "Claude Haiku 4.5",
    tier: ModelTier::Low,
    provider: "anthropic",
    input_per_mtok: 0.80,
    output_per_mtok: 4.00,
    max_context_tokens: 200_000,
    avg_latency_ms: 600,
};

pub const CLAUDE_SONNET: Model = Model {
    id: "claude-sonnet-4-6",
    name: "Claude Sonnet 4.6",
    tier: ModelTier::Mid,
    provider: "anthropic",
    input_per_mtok: 3.00,
    output_per_mtok: 15.00,
    max_context_tokens: 200_000,
    avg_latency_ms: 1200,
};

pub const CLAUDE_OPUS: Model = Model {
    id: "claude-opus-4-6",
    name: "Claude Opus 4.6",
    tier: ModelTier::High,
    provider: "anthropic",
    input_per_mtok: 15.00,
    output_per_mtok: 75.00,
    max_context_tokens: 200_000,
    avg_latency_ms: 2500,
};

/// The built-in catalog, cheapest first. Update prices here when the
/// provider changes rates.
pub const BUILTIN_MODELS: &[Model] = &[CLAUDE_HAIKU, CLAUDE_SONNET, CLAUDE_OPUS];

/// Caller-supplied bounds applied before scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingConstraints {
    /// Ceiling on the reference-size call cost, in USD.
    #[serde(default)]
    pub max_cost: Option<f64>,
    #[serde(default)]
    pub max_latency_ms: Option<u32>,
    #[serde(default)]
    pub min_context_window: Option<u32>,
    /// Capability floor that holds regardless of computed complexity.
    #[serde(default)]
    pub min_tier: Option<ModelTier>,
}

impl RoutingConstraints {
    /// Whether `model` survives every bound. `reference_cost` is the model's
    /// estimated cost for a reference-size call.
    fn admits(&self, model: &Model, reference_cost: f64) -> bool {
        self.max_cost.is_none_or(|max| reference_cost <= max)
            && self.max_latency_ms.is_none_or(|max| model.avg_latency_ms <= max)
            && self
                .min_context_window
                .is_none_or(|min| model.max_context_tokens >= min)
            && self.min_tier.is_none_or(|min| model.tier >= min)
    }
}

/// An immutable, non-empty set of models.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Cow<'static, [Model]>,
    top: Model,
}

impl ModelRegistry {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            models: Cow::Borrowed(BUILTIN_MODELS),
            top: CLAUDE_OPUS,
        }
    }

    /// A custom catalog. Rejects an empty list, duplicate ids, and
    /// negative or non-finite prices.
    pub fn new(models: Vec<Model>) -> Result<Self, SwitchyardError> {
        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.id) {
                return Err(SwitchyardError::Config(format!(
                    "duplicate model id `{}` in registry",
                    model.id
                )));
            }
            let prices = [model.input_per_mtok, model.output_per_mtok];
            if prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
                return Err(SwitchyardError::Config(format!(
                    "model `{}` has an invalid price",
                    model.id
                )));
            }
        }

        // First model of the highest tier, in registry order.
        let top = models
            .iter()
            .fold(None::<&Model>, |best, m| match best {
                Some(b) if b.tier >= m.tier => Some(b),
                _ => Some(m),
            })
            .copied()
            .ok_or_else(|| SwitchyardError::Config("model registry is empty".to_string()))?;

        Ok(Self {
            models: Cow::Owned(models),
            top,
        })
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn get(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn by_tier(&self, tier: ModelTier) -> impl Iterator<Item = &Model> {
        self.models.iter().filter(move |m| m.tier == tier)
    }

    /// The model escalations go to.
    pub fn top_tier(&self) -> &Model {
        &self.top
    }

    /// Models that satisfy `constraints`, in registry order. The cost bound
    /// is checked against a call of `reference_input` / `reference_output`
    /// tokens.
    pub fn filter(
        &self,
        constraints: &RoutingConstraints,
        reference_input: u32,
        reference_output: u32,
    ) -> Vec<Model> {
        self.models
            .iter()
            .filter(|m| {
                constraints.admits(m, estimate_query_cost(m, reference_input, reference_output))
            })
            .copied()
            .collect()
    }

    /// Safety default when constraints eliminate every candidate.
    ///
    /// Prefers the first mid-tier model. A `min_tier` above mid moves the
    /// preference up to that tier, so the floor is never violated; with no
    /// model at the preferred tier, the lowest tier satisfying the floor is
    /// used.
    pub fn fallback_for(&self, min_tier: Option<ModelTier>) -> Model {
        let floor = min_tier.unwrap_or(ModelTier::Low);
        let preferred = floor.max(ModelTier::Mid);

        self.by_tier(preferred)
            .next()
            .or_else(|| {
                self.models
                    .iter()
                    .filter(|m| m.tier >= floor)
                    .min_by_key(|m| m.tier)
            })
            .copied()
            .unwrap_or(self.top)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Token estimate for `text`: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count();
    u32::try_from(chars.div_ceil(4)).unwrap_or(u32::MAX)
}

/// Estimated USD cost of a call with the given token counts.
pub fn estimate_query_cost(model: &Model, input_tokens: u32, output_tokens: u32) -> f64 {
    f64::from(input_tokens) / 1_000_000.0 * model.input_per_mtok
        + f64::from(output_tokens) / 1_000_000.0 * model.output_per_mtok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &'static str, tier: ModelTier, price: f64) -> Model {
        Model {
            id,
            name: id,
            tier,
            provider: "test",
            input_per_mtok: price,
            output_per_mtok: price * 5.0,
            max_context_tokens: 100_000,
            avg_latency_ms: 1000,
        }
    }

    #[test]
    fn builtin_catalog_is_ordered_by_tier() {
        let registry = ModelRegistry::builtin();
        let tiers: Vec<ModelTier> = registry.models().iter().map(|m| m.tier).collect();
        assert_eq!(tiers, vec![ModelTier::Low, ModelTier::Mid, ModelTier::High]);
        assert_eq!(registry.top_tier().id, "claude-opus-4-6");
    }

    #[test]
    fn lookup_by_id_and_tier() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.get("claude-sonnet-4-6").unwrap().tier, ModelTier::Mid);
        assert!(registry.get("gpt-4").is_none());
        assert_eq!(registry.by_tier(ModelTier::Low).count(), 1);
    }

    #[test]
    fn tier_ordering() {
        assert!(ModelTier::Low < ModelTier::Mid);
        assert!(ModelTier::Mid < ModelTier::High);
        assert_eq!(ModelTier::High.to_string(), "high");
    }

    #[test]
    fn estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn reference_call_costs() {
        let cost = estimate_query_cost(&CLAUDE_HAIKU, 1000, 500);
        assert!((cost - 0.0028).abs() < 1e-12);
        let cost = estimate_query_cost(&CLAUDE_OPUS, 1000, 500);
        assert!((cost - 0.0525).abs() < 1e-12);
    }

    #[test]
    fn filter_applies_each_bound() {
        let registry = ModelRegistry::builtin();

        let cheap = RoutingConstraints {
            max_cost: Some(0.011),
            ..Default::default()
        };
        let ids: Vec<&str> = registry.filter(&cheap, 1000, 500).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["claude-haiku-4-5-20251001", "claude-sonnet-4-6"]);

        let fast = RoutingConstraints {
            max_latency_ms: Some(1000),
            ..Default::default()
        };
        assert_eq!(registry.filter(&fast, 1000, 500).len(), 1);

        let floor = RoutingConstraints {
            min_tier: Some(ModelTier::Mid),
            ..Default::default()
        };
        assert!(registry
            .filter(&floor, 1000, 500)
            .iter()
            .all(|m| m.tier >= ModelTier::Mid));

        let huge = RoutingConstraints {
            min_context_window: Some(1_000_000),
            ..Default::default()
        };
        assert!(registry.filter(&huge, 1000, 500).is_empty());
    }

    #[test]
    fn fallback_prefers_mid_tier() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.fallback_for(None).tier, ModelTier::Mid);
        assert_eq!(registry.fallback_for(Some(ModelTier::Low)).tier, ModelTier::Mid);
    }

    #[test]
    fn fallback_respects_tier_floor() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.fallback_for(Some(ModelTier::High)).tier, ModelTier::High);
    }

    #[test]
    fn fallback_without_mid_tier_uses_lowest_admissible() {
        let registry = ModelRegistry::new(vec![
            model("small", ModelTier::Low, 1.0),
            model("large", ModelTier::High, 10.0),
        ])
        .unwrap();
        assert_eq!(registry.fallback_for(None).id, "small");
    }

    #[test]
    fn custom_registry_validation() {
        assert!(ModelRegistry::new(vec![]).is_err());
        assert!(ModelRegistry::new(vec![
            model("a", ModelTier::Low, 1.0),
            model("a", ModelTier::Mid, 2.0),
        ])
        .is_err());
        assert!(ModelRegistry::new(vec![model("neg", ModelTier::Low, -1.0)]).is_err());
    }

    #[test]
    fn top_tier_is_first_of_highest() {
        let registry = ModelRegistry::new(vec![
            model("mid", ModelTier::Mid, 3.0),
            model("high-a", ModelTier::High, 15.0),
            model("high-b", ModelTier::High, 12.0),
        ])
        .unwrap();
        assert_eq!(registry.top_tier().id, "high-a");
    }
}
