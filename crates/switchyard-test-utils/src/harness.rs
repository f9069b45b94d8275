// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end harness: an [`Orchestrator`] wired to a [`MockProvider`] and a
//! migrated in-memory ledger.

use std::sync::Arc;

use switchyard_config::model::RoutingConfig;
use switchyard_core::{Feature, FeatureContext, SwitchyardError};
use switchyard_cost::CostLedger;
use switchyard_orchestrator::{AiRequest, AiResponse, Orchestrator, OrchestratorSettings};
use switchyard_storage::Database;

use crate::mock_provider::MockProvider;

pub struct TestHarnessBuilder {
    responses: Vec<String>,
    usage: Option<(u32, u32)>,
    routing: RoutingConfig,
    with_ledger: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            usage: None,
            routing: RoutingConfig::default(),
            with_ledger: true,
        }
    }

    pub fn with_mock_responses<I, S>(mut self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_usage(mut self, input_tokens: u32, output_tokens: u32) -> Self {
        self.usage = Some((input_tokens, output_tokens));
        self
    }

    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    /// Build without a cost ledger.
    pub fn without_ledger(mut self) -> Self {
        self.with_ledger = false;
        self
    }

    pub async fn build(self) -> Result<TestHarness, SwitchyardError> {
        let mut provider = MockProvider::with_responses(self.responses);
        if let Some((input, output)) = self.usage {
            provider = provider.with_usage(input, output);
        }
        let provider = Arc::new(provider);

        let database = Database::open_in_memory().await?;
        let ledger = Arc::new(CostLedger::from_database(&database));

        let orchestrator = Orchestrator::new(
            provider.clone(),
            self.with_ledger.then(|| ledger.clone()),
            OrchestratorSettings::from(&self.routing),
        );

        Ok(TestHarness {
            orchestrator,
            provider,
            ledger,
            database,
        })
    }
}

pub struct TestHarness {
    pub orchestrator: Orchestrator,
    pub provider: Arc<MockProvider>,
    /// Reads the same database the orchestrator writes to.
    pub ledger: Arc<CostLedger>,
    pub database: Database,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// `call_ai` with a bare context for `tenant_id`, then wait for the
    /// cost write.
    pub async fn call(
        &self,
        feature: Feature,
        tenant_id: &str,
        prompt: &str,
    ) -> Result<AiResponse, SwitchyardError> {
        let context = FeatureContext::new(feature, tenant_id, "Test Client");
        self.call_with(AiRequest::new(prompt, context)).await
    }

    pub async fn call_with(&self, request: AiRequest) -> Result<AiResponse, SwitchyardError> {
        let result = self.orchestrator.call_ai(request).await;
        self.orchestrator.flush_cost_writes().await;
        result
    }
}
