// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-energy model selection.
//!
//! Each admissible model is scored as `uncertainty × normalized cost` and
//! the lowest score wins. Aleatoric uncertainty grows with complexity, which
//! inflates every candidate's score on hard queries; a model with a track
//! record in the domain (lower epistemic uncertainty) can then beat a cheaper
//! one that has none.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use switchyard_config::model::RoutingConfig;
use tracing::debug;

use crate::classifier::{QueryClassification, QueryComplexity, QueryDomain};
use crate::registry::{
    Model, ModelRegistry, RoutingConstraints, estimate_query_cost, estimate_tokens,
};

/// Free energy reported for a fallback pick, which is never scored.
const FALLBACK_FREE_ENERGY: f64 = 0.5;

/// How the orchestrator should use the chosen model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    /// One call, result taken as-is.
    Direct,
    /// Cheap call first, structural check, escalate to the top tier on failure.
    Cascade,
}

/// A past observation of a model's quality on a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub model_id: String,
    pub domain: QueryDomain,
    pub complexity: QueryComplexity,
    /// In `[0, 1]`.
    pub quality_score: f64,
    pub actual_cost_usd: f64,
    pub actual_latency_ms: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostPrediction {
    pub estimated_input_tokens: u32,
    pub estimated_output_tokens: u32,
    pub estimated_cost_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UncertaintyMetrics {
    pub epistemic: f64,
    pub aleatoric: f64,
    /// `sqrt(epistemic² + aleatoric²)`, clamped to 1 for reporting.
    pub total: f64,
}

/// The router's decision for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterOutput {
    pub model: Model,
    pub strategy: RoutingStrategy,
    /// One-line justification for logs. Not meant to be parsed.
    pub reasoning: String,
    pub free_energy: f64,
    pub cost_prediction: CostPrediction,
    pub uncertainty: UncertaintyMetrics,
}

/// Router calibration, taken from `[routing]` config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterSettings {
    pub cost_ceiling_usd: f64,
    pub epistemic_prior_no_history: f64,
    pub epistemic_prior_unmatched: f64,
    pub history_saturation_samples: u32,
    pub reference_input_tokens: u32,
    pub reference_output_tokens: u32,
}

impl From<&RoutingConfig> for RouterSettings {
    fn from(config: &RoutingConfig) -> Self {
        Self {
            cost_ceiling_usd: config.cost_ceiling_usd,
            epistemic_prior_no_history: config.epistemic_prior_no_history,
            epistemic_prior_unmatched: config.epistemic_prior_unmatched,
            history_saturation_samples: config.history_saturation_samples,
            reference_input_tokens: config.reference_input_tokens,
            reference_output_tokens: config.reference_output_tokens,
        }
    }
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self::from(&RoutingConfig::default())
    }
}

/// Picks a model per request. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct ModelRouter {
    registry: ModelRegistry,
    settings: RouterSettings,
}

impl ModelRouter {
    /// Router over the built-in catalog.
    pub fn new(config: &RoutingConfig) -> Self {
        Self::with_registry(ModelRegistry::builtin(), RouterSettings::from(config))
    }

    pub fn with_registry(registry: ModelRegistry, settings: RouterSettings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Choose a model for `query`.
    ///
    /// Never fails: when `constraints` eliminate every candidate, the
    /// registry's fallback model is returned with the direct strategy.
    pub fn route(
        &self,
        query: &str,
        classification: &QueryClassification,
        constraints: Option<&RoutingConstraints>,
        history: &[ModelPerformance],
    ) -> RouterOutput {
        let constraints = constraints.copied().unwrap_or_default();
        let input_tokens = estimate_tokens(query);
        let output_tokens = estimated_output_tokens(input_tokens, classification.complexity);

        let candidates = self.registry.filter(
            &constraints,
            self.settings.reference_input_tokens,
            self.settings.reference_output_tokens,
        );

        let scored = candidates.iter().map(|model| {
            let uncertainty = self.uncertainty(model, classification, history);
            let cost = estimate_query_cost(model, input_tokens, output_tokens);
            let free_energy = uncertainty.raw * self.normalized_cost(cost);
            (model, free_energy)
        });

        // Iterator::min_by keeps the first of equal minima: ties go to the
        // earlier (cheaper) registry entry.
        let Some((winner, free_energy)) = scored.min_by(|a, b| a.1.total_cmp(&b.1)) else {
            let fallback = self.registry.fallback_for(constraints.min_tier);
            debug!(
                model = fallback.id,
                "constraints eliminated every candidate, using fallback"
            );
            return self.package(
                fallback,
                RoutingStrategy::Direct,
                FALLBACK_FREE_ENERGY,
                classification,
                history,
                (input_tokens, output_tokens),
                Some("No model satisfied the routing constraints; using the fallback model."),
            );
        };

        let strategy = if winner.tier < self.registry.top_tier().tier
            && classification.complexity >= QueryComplexity::Complex
        {
            RoutingStrategy::Cascade
        } else {
            RoutingStrategy::Direct
        };

        let output = self.package(
            *winner,
            strategy,
            free_energy,
            classification,
            history,
            (input_tokens, output_tokens),
            None,
        );
        debug!(
            model = output.model.id,
            strategy = %output.strategy,
            free_energy = output.free_energy,
            candidates = candidates.len(),
            "model routed"
        );
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn package(
        &self,
        model: Model,
        strategy: RoutingStrategy,
        free_energy: f64,
        classification: &QueryClassification,
        history: &[ModelPerformance],
        (input_tokens, output_tokens): (u32, u32),
        note: Option<&str>,
    ) -> RouterOutput {
        let uncertainty = self.uncertainty(&model, classification, history);

        let mut reasoning = format!(
            "Routed to {} (free energy: {:.3}). Query: {} complexity, {} intent, {} domain. ",
            model.name,
            free_energy,
            classification.complexity,
            classification.intent,
            classification.domain,
        );
        reasoning.push_str(match strategy {
            RoutingStrategy::Cascade => "Cascade strategy: escalates to the top tier if the response fails the structural check.",
            RoutingStrategy::Direct => "Direct strategy: single model call.",
        });
        if let Some(note) = note {
            reasoning.push(' ');
            reasoning.push_str(note);
        }

        RouterOutput {
            model,
            strategy,
            reasoning,
            free_energy,
            cost_prediction: CostPrediction {
                estimated_input_tokens: input_tokens,
                estimated_output_tokens: output_tokens,
                estimated_cost_usd: estimate_query_cost(&model, input_tokens, output_tokens),
            },
            uncertainty: UncertaintyMetrics {
                epistemic: uncertainty.epistemic,
                aleatoric: uncertainty.aleatoric,
                total: uncertainty.raw.min(1.0),
            },
        }
    }

    fn normalized_cost(&self, cost_usd: f64) -> f64 {
        (cost_usd / self.settings.cost_ceiling_usd).min(1.0)
    }

    fn uncertainty(
        &self,
        model: &Model,
        classification: &QueryClassification,
        history: &[ModelPerformance],
    ) -> Uncertainty {
        let epistemic = self.epistemic(model, classification.domain, history);
        let aleatoric = aleatoric(classification.complexity);
        Uncertainty {
            epistemic,
            aleatoric,
            raw: epistemic.hypot(aleatoric),
        }
    }

    /// Lack of track record for `model` on `domain`.
    fn epistemic(&self, model: &Model, domain: QueryDomain, history: &[ModelPerformance]) -> f64 {
        if history.is_empty() {
            return self.settings.epistemic_prior_no_history;
        }

        let scores: Vec<f64> = history
            .iter()
            .filter(|p| p.model_id == model.id && p.domain == domain)
            .map(|p| p.quality_score)
            .collect();
        if scores.is_empty() {
            return self.settings.epistemic_prior_unmatched;
        }

        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        let variance_uncertainty = variance.sqrt().min(1.0);
        let sample_uncertainty =
            1.0 - (n / f64::from(self.settings.history_saturation_samples)).min(1.0);

        variance_uncertainty * 0.7 + sample_uncertainty * 0.3
    }
}

struct Uncertainty {
    epistemic: f64,
    aleatoric: f64,
    raw: f64,
}

/// Irreducible difficulty by complexity bucket.
pub fn aleatoric(complexity: QueryComplexity) -> f64 {
    match complexity {
        QueryComplexity::Simple => 0.1,
        QueryComplexity::Moderate => 0.3,
        QueryComplexity::Complex => 0.5,
        QueryComplexity::VeryComplex => 0.7,
    }
}

/// Output tokens expected for `input_tokens` at the given complexity.
pub fn estimated_output_tokens(input_tokens: u32, complexity: QueryComplexity) -> u32 {
    let multiplier = match complexity {
        QueryComplexity::Simple => 0.5,
        QueryComplexity::Moderate => 0.8,
        QueryComplexity::Complex => 1.2,
        QueryComplexity::VeryComplex => 1.8,
    };
    (f64::from(input_tokens) * multiplier).ceil() as u32
}
