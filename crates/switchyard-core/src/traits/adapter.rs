// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait.

use async_trait::async_trait;

use crate::error::SwitchyardError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, lifecycle, and health reporting shared by every adapter.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, SwitchyardError>;

    /// Releases any held resources.
    async fn shutdown(&self) -> Result<(), SwitchyardError>;
}
