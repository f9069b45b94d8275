// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Switchyard model router.
//!
//! Provides the shared error type, the provider adapter traits, the request
//! and response types exchanged with model backends, and the feature catalog.

pub mod error;
pub mod feature;
pub mod traits;
pub mod types;

pub use error::SwitchyardError;
pub use feature::{Feature, FeatureContext, OutputShape, PageContext, PropertyTier, TaskContext};
pub use traits::{PluginAdapter, ProviderAdapter};
pub use types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_render_their_message() {
        let config = SwitchyardError::Config("bad ceiling".into());
        assert_eq!(config.to_string(), "configuration error: bad ceiling");

        let storage = SwitchyardError::Storage {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert_eq!(storage.to_string(), "storage error: disk full");

        let provider = SwitchyardError::provider("rate limited");
        assert_eq!(provider.to_string(), "provider error: rate limited");

        let invalid = SwitchyardError::InvalidRequest("missing tenant".into());
        assert_eq!(invalid.to_string(), "invalid request: missing tenant");

        let internal = SwitchyardError::Internal("oops".into());
        assert_eq!(internal.to_string(), "internal error: oops");
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Provider, AdapterType::Storage] {
            let parsed = AdapterType::from_str(&variant.to_string()).unwrap();
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn provider_traits_are_object_safe() {
        fn _assert_dyn(_: &dyn ProviderAdapter) {}
        fn _assert_plugin<T: PluginAdapter>() {}
    }
}
