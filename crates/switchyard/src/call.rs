// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard call`: one live feature call through the orchestrator.

use std::sync::Arc;

use switchyard_anthropic::AnthropicProvider;
use switchyard_config::model::SwitchyardConfig;
use switchyard_core::{FeatureContext, PluginAdapter, SwitchyardError};
use switchyard_cost::CostLedger;
use switchyard_orchestrator::{AiRequest, AiResponse, Orchestrator, OrchestratorSettings};
use switchyard_prompt::PromptAssembler;
use switchyard_router::RoutingConstraints;
use switchyard_storage::Database;
use tracing::warn;

use crate::inspect::print_json;

pub struct CallOptions {
    pub context: FeatureContext,
    pub constraints: RoutingConstraints,
    pub max_tokens: Option<u32>,
    pub json: bool,
}

pub async fn run_call(
    config: &SwitchyardConfig,
    options: CallOptions,
    prompt: String,
) -> Result<(), SwitchyardError> {
    let provider = Arc::new(AnthropicProvider::new(&config.anthropic)?);
    let database = Database::from_config(&config.storage).await?;
    let ledger = Arc::new(CostLedger::from_database(&database));

    let orchestrator = Orchestrator::new(
        provider,
        Some(ledger),
        OrchestratorSettings::from(&config.routing),
    )
    .with_assembler(PromptAssembler::from_config(&config.prompt));

    let mut request = AiRequest::new(prompt, options.context).with_constraints(options.constraints);
    if let Some(max_tokens) = options.max_tokens {
        request = request.with_max_tokens(max_tokens);
    }

    let result = orchestrator.call_ai(request).await;
    orchestrator.flush_cost_writes().await;
    if let Err(e) = database.shutdown().await {
        warn!(error = %e, "database checkpoint on exit failed");
    }

    let response = result?;
    if options.json {
        print_json(&response)
    } else {
        println!("{}", response.content);
        eprintln!("{}", summary_line(&response));
        Ok(())
    }
}

fn summary_line(response: &AiResponse) -> String {
    let escalated = if response.was_escalated {
        ", escalated"
    } else {
        ""
    };
    format!(
        "[{} via {}{escalated}] {} in / {} out tokens, ${:.6}, {} ms",
        response.model_used,
        response.strategy,
        response.input_tokens,
        response.output_tokens,
        response.cost_usd,
        response.latency_ms,
    )
}

#[cfg(test)]
mod tests {
    use switchyard_router::RoutingStrategy;

    use super::*;

    fn response(was_escalated: bool) -> AiResponse {
        AiResponse {
            content: "text".to_string(),
            model_used: "claude-opus-4-6".to_string(),
            input_tokens: 120,
            output_tokens: 480,
            cost_usd: 0.0378,
            latency_ms: 2210,
            was_escalated,
            strategy: RoutingStrategy::Cascade,
        }
    }

    #[test]
    fn summary_mentions_escalation() {
        assert_eq!(
            summary_line(&response(true)),
            "[claude-opus-4-6 via cascade, escalated] 120 in / 480 out tokens, $0.037800, 2210 ms"
        );
        assert!(!summary_line(&response(false)).contains("escalated"));
    }
}
