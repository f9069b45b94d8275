// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for `call_ai` over the mock provider and an in-memory
//! ledger.

use std::sync::Arc;
use std::time::Duration;

use switchyard_config::model::RoutingConfig;
use switchyard_core::{Feature, FeatureContext, SwitchyardError};
use switchyard_cost::CostLedger;
use switchyard_orchestrator::{AiRequest, Orchestrator, OrchestratorSettings};
use switchyard_router::{ModelTier, RoutingConstraints, RoutingStrategy};
use switchyard_test_utils::{DEFAULT_REPLY, MockProvider, TestHarness};

const HAIKU: &str = "claude-haiku-4-5-20251001";
const OPUS: &str = "claude-opus-4-6";

/// Classifies as complex and routes to the low tier under cascade.
const COMPLEX_PROMPT: &str = "Create a comparison of two plumbing companies' service offerings, \
    explaining why the pricing differs and if the value justifies the premium";

const VALID_BRIEF: &str = r#"{"title": "Spring drain maintenance for homeowners", "sections": []}"#;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[tokio::test]
async fn simple_call_goes_direct_and_is_recorded() {
    let h = TestHarness::builder().build().await.unwrap();

    let resp = h.call(Feature::GbpPost, "tenant-a", "Hi there").await.unwrap();

    assert_eq!(resp.content, DEFAULT_REPLY);
    assert_eq!(resp.model_used, HAIKU);
    assert_eq!(resp.strategy, RoutingStrategy::Direct);
    assert!(!resp.was_escalated);
    assert_eq!((resp.input_tokens, resp.output_tokens), (10, 20));
    // 10 * 0.80 + 20 * 4.00 per million
    assert!(approx(resp.cost_usd, 0.000088));

    assert_eq!(h.provider.models_called().await, vec![HAIKU]);

    let summary = h.ledger.totals_by_tenant("tenant-a", 30).await.unwrap();
    assert_eq!(summary.call_count, 1);
    assert!(approx(summary.total_usd, resp.cost_usd));
    assert!(summary.by_feature.contains_key(&Feature::GbpPost));
}

#[tokio::test]
async fn short_cascade_reply_escalates_to_top_tier() {
    let h = TestHarness::builder()
        .with_mock_responses(["too short", VALID_BRIEF])
        .build()
        .await
        .unwrap();

    let resp = h
        .call(Feature::ContentBrief, "tenant-a", COMPLEX_PROMPT)
        .await
        .unwrap();

    assert!(resp.was_escalated);
    assert_eq!(resp.strategy, RoutingStrategy::Cascade);
    assert_eq!(resp.model_used, OPUS);
    assert_eq!(resp.content, VALID_BRIEF);
    // Only the final call is billed: 10 * 15 + 20 * 75 per million.
    assert!(approx(resp.cost_usd, 0.00165));
    assert_eq!(h.provider.models_called().await, vec![HAIKU, OPUS]);

    let requests = h.provider.requests().await;
    assert_eq!(requests[0].system_prompt, requests[1].system_prompt);
    assert_eq!(requests[1].user_prompt, COMPLEX_PROMPT);

    let summary = h.ledger.totals_by_tenant("tenant-a", 30).await.unwrap();
    assert_eq!(summary.call_count, 1);
    assert!(approx(summary.total_usd, 0.00165));
}

#[tokio::test]
async fn valid_json_on_cascade_is_kept() {
    let h = TestHarness::builder()
        .with_mock_responses([format!("```json\n{VALID_BRIEF}\n```")])
        .build()
        .await
        .unwrap();

    let resp = h
        .call(Feature::ContentBrief, "tenant-a", COMPLEX_PROMPT)
        .await
        .unwrap();

    assert!(!resp.was_escalated);
    assert_eq!(resp.strategy, RoutingStrategy::Cascade);
    assert_eq!(resp.model_used, HAIKU);
    assert_eq!(h.provider.models_called().await.len(), 1);
}

#[tokio::test]
async fn malformed_json_on_cascade_escalates() {
    let h = TestHarness::builder()
        .with_mock_responses([
            "Here is your brief: title is spring drains, sections to follow shortly.",
            VALID_BRIEF,
        ])
        .build()
        .await
        .unwrap();

    let resp = h
        .call(Feature::ContentBrief, "tenant-a", COMPLEX_PROMPT)
        .await
        .unwrap();

    assert!(resp.was_escalated);
    assert_eq!(resp.model_used, OPUS);
}

#[tokio::test]
async fn plain_text_cascade_only_checks_length() {
    let h = TestHarness::builder().build().await.unwrap();

    let resp = h
        .call(Feature::ReportNarrative, "tenant-a", COMPLEX_PROMPT)
        .await
        .unwrap();

    assert_eq!(resp.strategy, RoutingStrategy::Cascade);
    assert!(!resp.was_escalated);
}

#[tokio::test]
async fn html_cascade_without_structure_escalates() {
    let h = TestHarness::builder()
        .with_mock_responses([
            "A long answer about drains that has no headings and no paragraph tags at all.",
            "<h2>Drains</h2><p>Keep them clear all year.</p>",
        ])
        .build()
        .await
        .unwrap();

    let resp = h
        .call(Feature::BlogPost, "tenant-a", COMPLEX_PROMPT)
        .await
        .unwrap();

    assert!(resp.was_escalated);
    assert!(resp.content.starts_with("<h2>"));
}

#[tokio::test]
async fn provider_failure_is_returned_and_not_recorded() {
    let h = TestHarness::builder().build().await.unwrap();
    h.provider.push_failure("overloaded").await;

    let err = h
        .call(Feature::GbpPost, "tenant-a", "Hi there")
        .await
        .unwrap_err();

    assert!(matches!(err, SwitchyardError::Provider { .. }));
    assert!(err.to_string().contains("overloaded"));
    let summary = h.ledger.window_summary(30).await.unwrap();
    assert_eq!(summary.call_count, 0);
}

#[tokio::test]
async fn failed_escalation_returns_the_error() {
    let h = TestHarness::builder()
        .with_mock_responses(["nope"])
        .build()
        .await
        .unwrap();
    h.provider.push_failure("top tier unavailable").await;

    let result = h.call(Feature::ContentBrief, "tenant-a", COMPLEX_PROMPT).await;

    assert!(matches!(result, Err(SwitchyardError::Provider { .. })));
    assert_eq!(h.provider.models_called().await, vec![HAIKU, OPUS]);
    assert_eq!(h.ledger.window_summary(30).await.unwrap().call_count, 0);
}

#[tokio::test]
async fn blank_tenant_is_rejected_before_any_call() {
    let h = TestHarness::builder().build().await.unwrap();

    let err = h.call(Feature::GbpPost, "   ", "Hi there").await.unwrap_err();

    assert!(matches!(err, SwitchyardError::InvalidRequest(_)));
    assert!(h.provider.requests().await.is_empty());
}

#[tokio::test]
async fn max_tokens_resolution_order() {
    let mut routing = RoutingConfig::default();
    routing.max_tokens_overrides.insert("gbp_post".into(), 700);
    let h = TestHarness::builder()
        .with_routing(routing)
        .build()
        .await
        .unwrap();

    let ctx = |feature| FeatureContext::new(feature, "tenant-a", "Client");
    h.call_with(AiRequest::new("Hi there", ctx(Feature::GbpPost)).with_max_tokens(123))
        .await
        .unwrap();
    h.call_with(AiRequest::new("Hi there", ctx(Feature::GbpPost)))
        .await
        .unwrap();
    h.call_with(AiRequest::new("Hi there", ctx(Feature::MetaDescription)))
        .await
        .unwrap();

    let max_tokens: Vec<u32> = h
        .provider
        .requests()
        .await
        .iter()
        .map(|r| r.max_tokens)
        .collect();
    assert_eq!(max_tokens, vec![123, 700, Feature::MetaDescription.default_max_tokens()]);
}

#[tokio::test]
async fn tier_floor_is_honored() {
    let h = TestHarness::builder().build().await.unwrap();
    let request = AiRequest::new(
        "Hi there",
        FeatureContext::new(Feature::GbpPost, "tenant-a", "Client"),
    )
    .with_constraints(RoutingConstraints {
        min_tier: Some(ModelTier::High),
        ..Default::default()
    });

    let resp = h.call_with(request).await.unwrap();

    assert_eq!(resp.model_used, OPUS);
    assert_eq!(resp.strategy, RoutingStrategy::Direct);
}

#[tokio::test]
async fn system_prompt_carries_tenant_and_contract() {
    let h = TestHarness::builder()
        .with_mock_responses([VALID_BRIEF])
        .build()
        .await
        .unwrap();

    h.call(Feature::ContentBrief, "tenant-xyz", "Hi there")
        .await
        .unwrap();

    let requests = h.provider.requests().await;
    let system = requests[0].system_prompt.as_deref().unwrap();
    assert!(system.contains("tenant-xyz"));
    assert!(system.contains("Test Client"));
    assert!(system.contains("Schema:"));
}

#[tokio::test]
async fn estimate_is_recorded_with_the_actual_cost() {
    let h = TestHarness::builder().build().await.unwrap();

    h.call(Feature::GbpPost, "tenant-a", "Hi there").await.unwrap();

    let accuracy = h.ledger.estimate_accuracy(30).await.unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[tokio::test]
async fn ledger_failure_does_not_fail_the_call() {
    // No migrations: every insert fails.
    let conn = tokio_rusqlite::Connection::open_in_memory().await.unwrap();
    let ledger = Arc::new(CostLedger::from_connection(conn));
    let provider = Arc::new(MockProvider::new());
    let orchestrator = Orchestrator::new(
        provider.clone(),
        Some(ledger.clone()),
        OrchestratorSettings::default(),
    );

    let resp = orchestrator
        .call_ai(AiRequest::new(
            "Hi there",
            FeatureContext::new(Feature::GbpPost, "tenant-a", "Client"),
        ))
        .await
        .unwrap();
    orchestrator.flush_cost_writes().await;

    assert_eq!(resp.content, DEFAULT_REPLY);
    assert!(ledger.window_summary(30).await.is_err());
}

#[tokio::test]
async fn no_ledger_still_answers() {
    let h = TestHarness::builder().without_ledger().build().await.unwrap();

    let resp = h.call(Feature::GbpPost, "tenant-a", "Hi there").await.unwrap();

    assert_eq!(resp.model_used, HAIKU);
    assert_eq!(h.ledger.window_summary(30).await.unwrap().call_count, 0);
}

#[tokio::test]
async fn concurrent_flushes_cover_every_write() {
    let h = TestHarness::builder().build().await.unwrap();
    let ctx = FeatureContext::new(Feature::GbpPost, "tenant-a", "Client");
    for _ in 0..3 {
        h.orchestrator
            .call_ai(AiRequest::new("Hi there", ctx.clone()))
            .await
            .unwrap();
    }

    let flushes = async {
        tokio::join!(
            h.orchestrator.flush_cost_writes(),
            h.orchestrator.flush_cost_writes()
        )
    };
    tokio::time::timeout(Duration::from_secs(10), flushes)
        .await
        .expect("both flushes return");
    assert_eq!(h.ledger.window_summary(30).await.unwrap().call_count, 3);

    // Writes after a flush land in the next window.
    h.call(Feature::GbpPost, "tenant-a", "Hi there").await.unwrap();
    assert_eq!(h.ledger.window_summary(30).await.unwrap().call_count, 4);
}
