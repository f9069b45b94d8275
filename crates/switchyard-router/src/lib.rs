// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model registry, query classification, and model routing.
//!
//! - [`ModelRegistry`]: the immutable catalog of routable models
//! - [`QueryClassifier`]: zero-cost intent, complexity, and domain heuristics
//! - [`ModelRouter`]: free-energy selection with direct or cascade strategy
//!
//! All three are pure and synchronous; share them freely across tasks.

pub mod classifier;
pub mod registry;
pub mod router;

pub use classifier::{
    ComplexityAnalysis, Confidence, QueryClassification, QueryClassifier, QueryComplexity,
    QueryDomain, QueryIntent,
};
pub use registry::{
    Model, ModelRegistry, ModelTier, RoutingConstraints, estimate_query_cost, estimate_tokens,
};
pub use router::{
    CostPrediction, ModelPerformance, ModelRouter, RouterOutput, RouterSettings, RoutingStrategy,
    UncertaintyMetrics,
};
