// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Switchyard configuration.
///
/// Every section is optional and defaults to the values below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Anthropic Messages API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Cost ledger database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Router calibration constants.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Cost reporting windows.
    #[serde(default)]
    pub cost: CostConfig,

    /// Prompt assembly settings.
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Name reported in logs.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "switchyard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// API key. `None` defers to the `ANTHROPIC_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Value sent in the `anthropic-version` header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Whole-request timeout enforced by the HTTP transport.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Cost ledger storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("switchyard").join("ledger.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("ledger.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Calibration constants for free-energy routing and cascade escalation.
///
/// None of these values have a derivation; they are starting points meant to
/// be retuned against `estimate_accuracy` and observed escalation rates.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Estimated cost (USD) at which normalized cost saturates at 1.0.
    #[serde(default = "default_cost_ceiling_usd")]
    pub cost_ceiling_usd: f64,

    /// Epistemic uncertainty for a model when no performance history exists.
    #[serde(default = "default_epistemic_prior_no_history")]
    pub epistemic_prior_no_history: f64,

    /// Epistemic uncertainty when history exists but none matches model and domain.
    #[serde(default = "default_epistemic_prior_unmatched")]
    pub epistemic_prior_unmatched: f64,

    /// Matching samples at which sample-size uncertainty reaches zero.
    #[serde(default = "default_history_saturation_samples")]
    pub history_saturation_samples: u32,

    /// Input tokens assumed when checking a `max_cost` constraint.
    #[serde(default = "default_reference_input_tokens")]
    pub reference_input_tokens: u32,

    /// Output tokens assumed when checking a `max_cost` constraint.
    #[serde(default = "default_reference_output_tokens")]
    pub reference_output_tokens: u32,

    /// Responses shorter than this (after trimming) always escalate under cascade.
    #[serde(default = "default_escalation_min_chars")]
    pub escalation_min_chars: usize,

    /// Per-feature max output tokens, keyed by feature name. Overrides the
    /// catalog default but not a value passed with the request.
    #[serde(default)]
    pub max_tokens_overrides: BTreeMap<String, u32>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cost_ceiling_usd: default_cost_ceiling_usd(),
            epistemic_prior_no_history: default_epistemic_prior_no_history(),
            epistemic_prior_unmatched: default_epistemic_prior_unmatched(),
            history_saturation_samples: default_history_saturation_samples(),
            reference_input_tokens: default_reference_input_tokens(),
            reference_output_tokens: default_reference_output_tokens(),
            escalation_min_chars: default_escalation_min_chars(),
            max_tokens_overrides: BTreeMap::new(),
        }
    }
}

fn default_cost_ceiling_usd() -> f64 {
    0.10
}

fn default_epistemic_prior_no_history() -> f64 {
    0.8
}

fn default_epistemic_prior_unmatched() -> f64 {
    0.6
}

fn default_history_saturation_samples() -> u32 {
    10
}

fn default_reference_input_tokens() -> u32 {
    1000
}

fn default_reference_output_tokens() -> u32 {
    500
}

fn default_escalation_min_chars() -> usize {
    50
}

/// Cost reporting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CostConfig {
    /// Window used by ledger reads when the caller does not give one.
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,

    /// Number of days covered by the daily spend trend.
    #[serde(default = "default_trend_days")]
    pub trend_days: u32,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            default_window_days: default_window_days(),
            trend_days: default_trend_days(),
        }
    }
}

fn default_window_days() -> u32 {
    30
}

fn default_trend_days() -> u32 {
    7
}

/// Prompt assembly configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// Product name the base prompt says the assistant is embedded in.
    #[serde(default = "default_platform_name")]
    pub platform_name: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            platform_name: default_platform_name(),
        }
    }
}

fn default_platform_name() -> String {
    "the agency marketing dashboard, an SEO services platform".to_string()
}
