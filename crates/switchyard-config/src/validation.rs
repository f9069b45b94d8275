// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: probability ranges,
//! positive ceilings, and feature names in override tables.

use std::str::FromStr;

use switchyard_core::Feature;

use crate::diagnostic::ConfigError;
use crate::model::SwitchyardConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &SwitchyardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` is not one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.anthropic.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "anthropic.timeout_secs must be at least 1".to_string(),
        });
    }

    let routing = &config.routing;
    if !(routing.cost_ceiling_usd.is_finite() && routing.cost_ceiling_usd > 0.0) {
        errors.push(ConfigError::Validation {
            message: format!(
                "routing.cost_ceiling_usd must be positive, got {}",
                routing.cost_ceiling_usd
            ),
        });
    }

    for (key, value) in [
        ("epistemic_prior_no_history", routing.epistemic_prior_no_history),
        ("epistemic_prior_unmatched", routing.epistemic_prior_unmatched),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("routing.{key} must be within [0, 1], got {value}"),
            });
        }
    }

    for (key, value) in [
        ("history_saturation_samples", routing.history_saturation_samples),
        ("reference_input_tokens", routing.reference_input_tokens),
        ("reference_output_tokens", routing.reference_output_tokens),
    ] {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("routing.{key} must be at least 1"),
            });
        }
    }

    for (name, tokens) in &routing.max_tokens_overrides {
        if Feature::from_str(name).is_err() {
            errors.push(ConfigError::Validation {
                message: format!("routing.max_tokens_overrides has unknown feature `{name}`"),
            });
        }
        if *tokens == 0 {
            errors.push(ConfigError::Validation {
                message: format!("routing.max_tokens_overrides.{name} must be at least 1"),
            });
        }
    }

    if config.cost.default_window_days == 0 {
        errors.push(ConfigError::Validation {
            message: "cost.default_window_days must be at least 1".to_string(),
        });
    }

    if config.cost.trend_days == 0 {
        errors.push(ConfigError::Validation {
            message: "cost.trend_days must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
