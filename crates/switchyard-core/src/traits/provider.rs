// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for model backends.

use async_trait::async_trait;

use crate::error::SwitchyardError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// A remote text-completion backend.
///
/// Implementations perform exactly one request per call. Retry policy belongs
/// to the caller; timeouts belong to the transport.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response, including
    /// the token counts used for cost accounting.
    async fn complete(&self, request: ProviderRequest)
    -> Result<ProviderResponse, SwitchyardError>;
}
