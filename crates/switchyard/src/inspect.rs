// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `classify`, `route`, and `prompt`: the pure stages, run offline.

use serde::Serialize;
use switchyard_config::model::SwitchyardConfig;
use switchyard_core::{FeatureContext, SwitchyardError};
use switchyard_prompt::PromptAssembler;
use switchyard_router::{
    ComplexityAnalysis, ModelRouter, QueryClassification, QueryClassifier, RouterOutput,
    RoutingConstraints,
};

#[derive(Debug, Serialize)]
struct ClassifyOutput {
    classification: QueryClassification,
    analysis: ComplexityAnalysis,
}

#[derive(Debug, Serialize)]
struct RouteOutput {
    classification: QueryClassification,
    route: RouterOutput,
}

pub fn run_classify(text: &str) -> Result<(), SwitchyardError> {
    print_json(&classify(text))
}

pub fn run_route(
    config: &SwitchyardConfig,
    text: &str,
    constraints: &RoutingConstraints,
) -> Result<(), SwitchyardError> {
    print_json(&route(config, text, constraints))
}

pub fn run_prompt(config: &SwitchyardConfig, ctx: &FeatureContext) -> Result<(), SwitchyardError> {
    println!(
        "{}",
        PromptAssembler::from_config(&config.prompt).build_system_prompt(ctx)
    );
    Ok(())
}

fn classify(text: &str) -> ClassifyOutput {
    let classifier = QueryClassifier::new();
    let classification = classifier.classify(text);
    let analysis = classifier.analyze_complexity(text, Some(classification.domain));
    ClassifyOutput {
        classification,
        analysis,
    }
}

fn route(config: &SwitchyardConfig, text: &str, constraints: &RoutingConstraints) -> RouteOutput {
    let classification = QueryClassifier::new().classify(text);
    let route = ModelRouter::new(&config.routing).route(text, &classification, Some(constraints), &[]);
    RouteOutput {
        classification,
        route,
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), SwitchyardError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| SwitchyardError::Internal(format!("failed to render JSON: {e}")))?;
    println!("{rendered}");
    Ok(())
}
