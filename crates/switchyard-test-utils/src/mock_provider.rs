// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted provider for deterministic tests.
//!
//! Replies are popped from a FIFO queue; an empty queue yields a default
//! text. Every request is logged so tests can assert which models were
//! called and with what prompts.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use switchyard_core::{
    AdapterType, HealthStatus, PluginAdapter, ProviderAdapter, ProviderRequest, ProviderResponse,
    SwitchyardError, TokenUsage,
};
use tokio::sync::Mutex;

/// Text returned when the queue is empty. Long enough to clear the
/// escalation length floor.
pub const DEFAULT_REPLY: &str =
    "This is a scripted mock reply that is long enough to pass the length check.";

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure(String),
}

#[derive(Default)]
struct State {
    replies: VecDeque<Reply>,
    requests: Vec<ProviderRequest>,
}

pub struct MockProvider {
    state: Arc<Mutex<State>>,
    usage: TokenUsage,
}

impl MockProvider {
    /// Empty queue, usage of 10 input and 20 output tokens per call.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        }
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = State {
            replies: responses.into_iter().map(|r| Reply::Text(r.into())).collect(),
            requests: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            ..Self::new()
        }
    }

    /// Token usage reported on every reply.
    pub fn with_usage(mut self, input_tokens: u32, output_tokens: u32) -> Self {
        self.usage = TokenUsage {
            input_tokens,
            output_tokens,
        };
        self
    }

    pub async fn push_response(&self, text: impl Into<String>) {
        self.state.lock().await.replies.push_back(Reply::Text(text.into()));
    }

    /// Queue a failure: the next call returns a provider error with `message`.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.state
            .lock()
            .await
            .replies
            .push_back(Reply::Failure(message.into()));
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Model ids of every request received so far.
    pub async fn models_called(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .requests
            .iter()
            .map(|r| r.model.clone())
            .collect()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, SwitchyardError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SwitchyardError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, SwitchyardError> {
        let mut state = self.state.lock().await;
        state.requests.push(request.clone());
        let reply = state
            .replies
            .pop_front()
            .unwrap_or_else(|| Reply::Text(DEFAULT_REPLY.to_string()));
        drop(state);

        match reply {
            Reply::Text(content) => Ok(ProviderResponse {
                id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
                content,
                model: request.model,
                stop_reason: Some("end_turn".to_string()),
                usage: self.usage,
            }),
            Reply::Failure(message) => Err(SwitchyardError::provider(message)),
        }
    }
}
