// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request orchestration for Switchyard.
//!
//! [`Orchestrator::call_ai`] ties the pure components together for one
//! feature call:
//! 1. classify the prompt
//! 2. route to a model
//! 3. assemble the system prompt
//! 4. call the model, escalating once to the top tier under cascade
//! 5. record the cost without waiting for the write

pub mod escalation;
pub mod orchestrator;

pub use escalation::should_escalate;
pub use orchestrator::{AiRequest, AiResponse, Orchestrator, OrchestratorSettings};
