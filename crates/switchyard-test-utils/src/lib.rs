// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Switchyard integration tests.
//!
//! - [`MockProvider`]: scripted provider with a request log
//! - [`TestHarness`]: orchestrator over the mock and an in-memory ledger

pub mod harness;
pub mod mock_provider;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::{DEFAULT_REPLY, MockProvider};
