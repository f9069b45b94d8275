// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The one I/O-performing entry point: classify, route, assemble, call,
//! maybe escalate, record.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use serde::Serialize;
use switchyard_config::model::RoutingConfig;
use switchyard_core::{
    Feature, FeatureContext, ProviderAdapter, ProviderRequest, ProviderResponse, SwitchyardError,
};
use switchyard_cost::{CostLedger, CostRecord, calculate_cost, get_pricing};
use switchyard_prompt::PromptAssembler;
use switchyard_router::{
    Model, ModelPerformance, ModelRegistry, ModelRouter, QueryClassifier, RouterSettings,
    RoutingConstraints, RoutingStrategy, estimate_query_cost,
};
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::escalation::should_escalate;

/// Orchestrator tuning, taken from `[routing]` config.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    pub router: RouterSettings,
    pub escalation_min_chars: usize,
    pub max_tokens_overrides: BTreeMap<Feature, u32>,
}

impl From<&RoutingConfig> for OrchestratorSettings {
    fn from(config: &RoutingConfig) -> Self {
        let max_tokens_overrides = config
            .max_tokens_overrides
            .iter()
            .filter_map(|(name, &tokens)| match Feature::from_str(name) {
                Ok(feature) => Some((feature, tokens)),
                Err(_) => {
                    warn!(feature = %name, "ignoring max_tokens override for unknown feature");
                    None
                }
            })
            .collect();

        Self {
            router: RouterSettings::from(config),
            escalation_min_chars: config.escalation_min_chars,
            max_tokens_overrides,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from(&RoutingConfig::default())
    }
}

/// One call from an application feature.
#[derive(Debug, Clone)]
pub struct AiRequest {
    /// The user prompt. Also the text that gets classified.
    pub prompt: String,
    pub context: FeatureContext,
    pub constraints: Option<RoutingConstraints>,
    pub max_tokens: Option<u32>,
    pub performance_history: Vec<ModelPerformance>,
}

impl AiRequest {
    pub fn new(prompt: impl Into<String>, context: FeatureContext) -> Self {
        Self {
            prompt: prompt.into(),
            context,
            constraints: None,
            max_tokens: None,
            performance_history: Vec::new(),
        }
    }

    pub fn with_constraints(mut self, constraints: RoutingConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_history(mut self, history: Vec<ModelPerformance>) -> Self {
        self.performance_history = history;
        self
    }
}

/// A successful generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiResponse {
    pub content: String,
    /// The model that produced `content`: the top tier when escalated.
    pub model_used: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_usd: f64,
    /// Wall time from the first model call to the final answer.
    pub latency_ms: u64,
    pub was_escalated: bool,
    pub strategy: RoutingStrategy,
}

pub struct Orchestrator {
    provider: Arc<dyn ProviderAdapter>,
    ledger: Option<Arc<CostLedger>>,
    classifier: QueryClassifier,
    router: ModelRouter,
    assembler: PromptAssembler,
    settings: OrchestratorSettings,
    /// Tracker for cost writes issued since the last flush.
    cost_writes: Mutex<TaskTracker>,
}

impl Orchestrator {
    /// An orchestrator over the built-in model registry. Without a ledger,
    /// nothing is recorded.
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        ledger: Option<Arc<CostLedger>>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            provider,
            ledger,
            classifier: QueryClassifier::new(),
            router: ModelRouter::with_registry(ModelRegistry::builtin(), settings.router),
            assembler: PromptAssembler::default(),
            settings,
            cost_writes: Mutex::new(TaskTracker::new()),
        }
    }

    pub fn with_registry(mut self, registry: ModelRegistry) -> Self {
        self.router = ModelRouter::with_registry(registry, self.settings.router);
        self
    }

    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        self.router.registry()
    }

    /// Run one feature call end to end.
    ///
    /// Backend failures come back as [`SwitchyardError::Provider`] and are
    /// never retried here. The cost record is written in the background; a
    /// ledger failure is logged and does not affect the result.
    pub async fn call_ai(&self, request: AiRequest) -> Result<AiResponse, SwitchyardError> {
        let AiRequest {
            prompt,
            context,
            constraints,
            max_tokens,
            performance_history,
        } = request;

        if context.tenant_id.trim().is_empty() {
            return Err(SwitchyardError::InvalidRequest(
                "tenant_id must not be empty".to_string(),
            ));
        }
        let feature = context.feature;

        let classification = self.classifier.classify(&prompt);
        let route = self.router.route(
            &prompt,
            &classification,
            constraints.as_ref(),
            &performance_history,
        );
        debug!(
            feature = %feature,
            tenant_id = %context.tenant_id,
            model = route.model.id,
            strategy = %route.strategy,
            reasoning = %route.reasoning,
            "routing decision"
        );

        let system_prompt = self.assembler.build_system_prompt(&context);
        let max_tokens = self.resolve_max_tokens(feature, max_tokens);

        let started = Instant::now();
        let mut model = route.model;
        let mut response = self
            .complete(&model, &system_prompt, &prompt, max_tokens, feature)
            .await?;

        let top = *self.router.registry().top_tier();
        let mut was_escalated = false;
        if route.strategy == RoutingStrategy::Cascade
            && model.id != top.id
            && should_escalate(
                &response.content,
                feature.output_shape(),
                self.settings.escalation_min_chars,
            )
        {
            info!(
                feature = %feature,
                from = model.id,
                to = top.id,
                response_chars = response.content.chars().count(),
                "escalating to top tier"
            );
            response = self
                .complete(&top, &system_prompt, &prompt, max_tokens, feature)
                .await?;
            model = top;
            was_escalated = true;
        }
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let usage = response.usage;
        let cost_usd = calculate_cost(&usage, &get_pricing(self.router.registry(), model.id));
        let estimated_cost_usd = estimate_query_cost(
            &model,
            route.cost_prediction.estimated_input_tokens,
            route.cost_prediction.estimated_output_tokens,
        );

        self.spawn_cost_write(
            CostRecord::new(feature, &context.tenant_id, model.id, &usage, cost_usd, latency_ms)
                .with_estimate(estimated_cost_usd),
        );

        Ok(AiResponse {
            content: response.content,
            model_used: model.id.to_string(),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cost_usd,
            latency_ms,
            was_escalated,
            strategy: route.strategy,
        })
    }

    /// Wait for every cost write issued so far. Call before shutdown.
    ///
    /// Safe to call from several tasks at once: each flush closes the current
    /// window and starts a new one that itself waits on the closed window, so
    /// a later flush also covers writes an earlier flush is still draining.
    pub async fn flush_cost_writes(&self) {
        let closed = {
            let mut current = self.cost_writes.lock().unwrap_or_else(PoisonError::into_inner);
            let closed = std::mem::replace(&mut *current, TaskTracker::new());
            closed.close();
            let pending = closed.clone();
            current.spawn(async move { pending.wait().await });
            closed
        };
        closed.wait().await;
    }

    fn resolve_max_tokens(&self, feature: Feature, requested: Option<u32>) -> u32 {
        requested
            .or_else(|| self.settings.max_tokens_overrides.get(&feature).copied())
            .unwrap_or_else(|| feature.default_max_tokens())
    }

    async fn complete(
        &self,
        model: &Model,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        feature: Feature,
    ) -> Result<ProviderResponse, SwitchyardError> {
        let request = ProviderRequest {
            model: model.id.to_string(),
            system_prompt: Some(system_prompt.to_string()),
            user_prompt: user_prompt.to_string(),
            max_tokens,
        };
        self.provider.complete(request).await.inspect_err(|e| {
            error!(error = %e, model = model.id, feature = %feature, "model call failed");
        })
    }

    fn spawn_cost_write(&self, record: CostRecord) {
        let Some(ledger) = self.ledger.clone() else {
            debug!(feature = %record.feature, "no cost ledger configured, skipping record");
            return;
        };
        let tracker = self
            .cost_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        tracker.spawn(async move {
            ledger.record_best_effort(&record).await;
        });
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("ledger", &self.ledger.is_some())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
