// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic provider adapter for Switchyard.
//!
//! Implements [`ProviderAdapter`] over the Messages API for single-turn text
//! calls. The reqwest client owns the timeout; nothing here retries.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use switchyard_config::model::AnthropicConfig;
use switchyard_core::{
    AdapterType, HealthStatus, PluginAdapter, ProviderAdapter, ProviderRequest, ProviderResponse,
    SwitchyardError, TokenUsage,
};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest};

/// Environment variable consulted when the config has no API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    /// Build a provider from `[anthropic]` config.
    ///
    /// The API key comes from `config.api_key`, then `ANTHROPIC_API_KEY`.
    pub fn new(config: &AnthropicConfig) -> Result<Self, SwitchyardError> {
        let env_key = std::env::var(API_KEY_ENV).ok();
        let api_key = resolve_api_key(config.api_key.as_deref(), env_key.as_deref())?;
        let client = AnthropicClient::new(
            &api_key,
            &config.api_version,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(
            api_version = %config.api_version,
            timeout_secs = config.timeout_secs,
            "Anthropic provider initialized"
        );
        Ok(Self { client })
    }

    pub fn from_client(client: AnthropicClient) -> Self {
        Self { client }
    }

    fn to_message_request(request: &ProviderRequest) -> MessageRequest {
        MessageRequest {
            model: request.model.clone(),
            messages: vec![ApiMessage::user(request.user_prompt.clone())],
            system: request.system_prompt.clone().filter(|s| !s.is_empty()),
            max_tokens: request.max_tokens,
        }
    }
}

/// First non-empty of the configured key and the environment key.
fn resolve_api_key(
    config_key: Option<&str>,
    env_key: Option<&str>,
) -> Result<String, SwitchyardError> {
    config_key
        .filter(|k| !k.is_empty())
        .or(env_key.filter(|k| !k.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            SwitchyardError::Config(format!(
                "Anthropic API key not found. Set anthropic.api_key in config or {API_KEY_ENV}."
            ))
        })
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    /// Reports healthy without calling the API, which would spend tokens.
    async fn health_check(&self) -> Result<HealthStatus, SwitchyardError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SwitchyardError> {
        debug!("Anthropic provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, SwitchyardError> {
        let api_request = Self::to_message_request(&request);
        let response = self.client.complete_message(&api_request).await?;
        let content = response.text();

        Ok(ProviderResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason: response.stop_reason,
            usage: TokenUsage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
        })
    }
}
