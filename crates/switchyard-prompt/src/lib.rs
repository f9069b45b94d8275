// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt assembly.
//!
//! A system prompt is up to three sections separated by a blank line:
//! - **Base**: platform, tenant, and the operating constraints every call shares
//! - **Protocol**: the task rules for the feature being served
//! - **Contract**: the exact response shape the caller will parse
//!
//! Empty sections are dropped, never rendered as blank lines. Assembly is
//! pure: the same [`FeatureContext`] always yields the same prompt.

pub mod contracts;
pub mod protocols;

use switchyard_config::model::PromptConfig;
use switchyard_core::FeatureContext;
use tracing::trace;

pub use contracts::{has_json_contract, output_contract};
pub use protocols::feature_protocol;

/// Builds system prompts for a named platform.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    platform_name: String,
}

impl PromptAssembler {
    pub fn new(platform_name: impl Into<String>) -> Self {
        Self {
            platform_name: platform_name.into(),
        }
    }

    pub fn from_config(config: &PromptConfig) -> Self {
        Self::new(config.platform_name.clone())
    }

    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    /// The full system prompt for `ctx`.
    pub fn build_system_prompt(&self, ctx: &FeatureContext) -> String {
        let base = self.base_section(ctx);
        let protocol = feature_protocol(ctx);
        let contract = output_contract(ctx.feature);

        trace!(
            feature = %ctx.feature,
            base_len = base.len(),
            protocol_len = protocol.len(),
            contract_len = contract.len(),
            "assembled system prompt"
        );

        join_sections([base.as_str(), protocol.as_str(), contract])
    }

    fn base_section(&self, ctx: &FeatureContext) -> String {
        let mut tenant = vec![
            format!("- Client name: {}", ctx.client_name),
            format!("- Tenant ID: {}", ctx.tenant_id),
        ];
        if let Some(industry) = ctx.industry.as_deref().filter(|s| !s.is_empty()) {
            tenant.push(format!("- Industry: {industry}"));
        }
        if let Some(voice) = ctx.voice_profile.as_deref().filter(|s| !s.is_empty()) {
            tenant.push(format!("- Voice profile: {voice}"));
        }

        format!(
            "You are an AI assistant working inside {platform}.\n\n\
             TENANT:\n{tenant}\n\n\
             OPERATING CONSTRAINTS:\n\
             - Never fabricate statistics, citations, quotes, or competitor facts.\n\
             - Copy must be original and specific to this client. Generic filler is a failure.\n\
             - Reply in exactly the output format given at the end of this prompt.",
            platform = self.platform_name,
            tenant = tenant.join("\n"),
        )
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::from_config(&PromptConfig::default())
    }
}

/// Joins non-empty sections with a blank line.
pub(crate) fn join_sections<'a>(sections: impl IntoIterator<Item = &'a str>) -> String {
    sections
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
