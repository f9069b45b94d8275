// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-model pricing and cost calculation.
//!
//! Prices come from the model registry. A model id the registry does not
//! know is priced as the registry's mid-tier fallback, so spend is never
//! silently recorded as zero.

use switchyard_core::TokenUsage;
use switchyard_router::{Model, ModelRegistry};
use tracing::debug;

/// USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

impl From<&Model> for ModelPricing {
    fn from(model: &Model) -> Self {
        Self {
            input_per_mtok: model.input_per_mtok,
            output_per_mtok: model.output_per_mtok,
        }
    }
}

/// Pricing for `model_id`, falling back to mid-tier pricing when unknown.
pub fn get_pricing(registry: &ModelRegistry, model_id: &str) -> ModelPricing {
    match registry.get(model_id) {
        Some(model) => model.into(),
        None => {
            let fallback = registry.fallback_for(None);
            debug!(model_id, fallback = fallback.id, "unknown model, using fallback pricing");
            (&fallback).into()
        }
    }
}

/// Cost in USD of `usage` at `pricing`.
pub fn calculate_cost(usage: &TokenUsage, pricing: &ModelPricing) -> f64 {
    let input = f64::from(usage.input_tokens) / 1_000_000.0 * pricing.input_per_mtok;
    let output = f64::from(usage.output_tokens) / 1_000_000.0 * pricing.output_per_mtok;
    input + output
}
