// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits for pluggable backends.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so they can be held as trait objects.

pub mod adapter;
pub mod provider;

pub use adapter::PluginAdapter;
pub use provider::ProviderAdapter;
