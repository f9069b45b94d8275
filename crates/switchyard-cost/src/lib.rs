// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost accounting for Switchyard: registry-backed pricing and the
//! append-only SQLite cost ledger with its tenant, feature, accuracy, and
//! report queries.

pub mod ledger;
pub mod pricing;

pub use ledger::{
    CostLedger, CostRecord, DailySpend, FeatureCostSummary, FeatureSpend, TenantCostSummary,
    WindowSummary, format_timestamp,
};
pub use pricing::{ModelPricing, calculate_cost, get_pricing};
