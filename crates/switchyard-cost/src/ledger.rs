// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only ledger of completed model calls.
//!
//! One row per call that actually happened, written once and never updated
//! or deleted. Reads aggregate over a trailing window of whole days measured
//! back from now. Timestamps are fixed-width UTC strings, so window filters
//! compare them lexicographically.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use switchyard_core::{Feature, SwitchyardError, TokenUsage};
use switchyard_storage::{Database, map_tr_err};
use tracing::{info, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Format `at` the way `created_at` is stored.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// One completed model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    /// UUID v4.
    pub id: String,
    pub created_at: String,
    pub feature: Feature,
    pub tenant_id: String,
    /// The model that produced the final answer.
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_usd: f64,
    pub latency_ms: u64,
    /// Filled in by an external quality signal, if one ever arrives.
    pub quality_score: Option<f64>,
    /// The router's prediction, for [`CostLedger::estimate_accuracy`].
    pub estimated_cost_usd: Option<f64>,
}

impl CostRecord {
    /// A record stamped now with a fresh id.
    pub fn new(
        feature: Feature,
        tenant_id: impl Into<String>,
        model: impl Into<String>,
        usage: &TokenUsage,
        cost_usd: f64,
        latency_ms: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: format_timestamp(Utc::now()),
            feature,
            tenant_id: tenant_id.into(),
            model: model.into(),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cost_usd,
            latency_ms,
            quality_score: None,
            estimated_cost_usd: None,
        }
    }

    pub fn with_estimate(mut self, estimated_cost_usd: f64) -> Self {
        self.estimated_cost_usd = Some(estimated_cost_usd);
        self
    }
}

/// Spend for one tenant over a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TenantCostSummary {
    pub total_usd: f64,
    pub call_count: u64,
    pub by_feature: BTreeMap<Feature, f64>,
}

/// Spend for one feature over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FeatureCostSummary {
    pub total_usd: f64,
    pub call_count: u64,
    pub avg_cost_per_call: f64,
}

/// Spend across all tenants over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WindowSummary {
    pub total_usd: f64,
    pub call_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSpend {
    pub feature: Feature,
    pub total_usd: f64,
    pub call_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySpend {
    /// `YYYY-MM-DD`, UTC.
    pub day: String,
    pub total_usd: f64,
    pub call_count: u64,
}

/// The ledger, backed by the `cost_ledger` table.
#[derive(Clone)]
pub struct CostLedger {
    conn: tokio_rusqlite::Connection,
}

impl std::fmt::Debug for CostLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostLedger").finish_non_exhaustive()
    }
}

impl CostLedger {
    /// Open the ledger database at `path`, applying migrations.
    pub async fn open(path: &str) -> Result<Self, SwitchyardError> {
        let db = Database::open(path).await?;
        Ok(Self::from_database(&db))
    }

    pub fn from_database(db: &Database) -> Self {
        Self::from_connection(db.connection().clone())
    }

    /// Wrap an existing connection. The `cost_ledger` table must exist.
    pub fn from_connection(conn: tokio_rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Append `record`.
    pub async fn record(&self, record: &CostRecord) -> Result<(), SwitchyardError> {
        let row = record.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO cost_ledger (id, created_at, feature, tenant_id, model, \
                     input_tokens, output_tokens, cost_usd, latency_ms, quality_score, \
                     estimated_cost_usd) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    rusqlite::params![
                        row.id,
                        row.created_at,
                        row.feature.as_str(),
                        row.tenant_id,
                        row.model,
                        row.input_tokens,
                        row.output_tokens,
                        row.cost_usd,
                        // SQLite integers are signed 64-bit
                        i64::try_from(row.latency_ms).unwrap_or(i64::MAX),
                        row.quality_score,
                        row.estimated_cost_usd,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        info!(
            tenant_id = %record.tenant_id,
            feature = %record.feature,
            model = %record.model,
            input_tokens = record.input_tokens,
            output_tokens = record.output_tokens,
            cost_usd = record.cost_usd,
            "cost recorded"
        );
        Ok(())
    }

    /// Append `record`, logging instead of returning a failure.
    pub async fn record_best_effort(&self, record: &CostRecord) {
        if let Err(e) = self.record(record).await {
            warn!(
                error = %e,
                tenant_id = %record.tenant_id,
                feature = %record.feature,
                cost_usd = record.cost_usd,
                "failed to record cost"
            );
        }
    }

    /// Spend for `tenant_id` over the last `days` days, split by feature.
    pub async fn totals_by_tenant(
        &self,
        tenant_id: &str,
        days: u32,
    ) -> Result<TenantCostSummary, SwitchyardError> {
        let tenant_id = tenant_id.to_string();
        let since = window_start(days);
        let rows: Vec<(String, f64, u64)> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT feature, SUM(cost_usd), COUNT(*) FROM cost_ledger \
                     WHERE tenant_id = ?1 AND created_at >= ?2 GROUP BY feature",
                )?;
                let rows = stmt.query_map(rusqlite::params![tenant_id, since], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)?;

        let mut summary = TenantCostSummary::default();
        for (feature, total, count) in rows {
            summary.total_usd += total;
            summary.call_count += count;
            if let Some(feature) = parse_feature(&feature) {
                *summary.by_feature.entry(feature).or_default() += total;
            }
        }
        Ok(summary)
    }

    /// Spend on `feature` across all tenants over the last `days` days.
    pub async fn totals_by_feature(
        &self,
        feature: Feature,
        days: u32,
    ) -> Result<FeatureCostSummary, SwitchyardError> {
        let since = window_start(days);
        let (total_usd, call_count): (f64, u64) = self
            .conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT COALESCE(SUM(cost_usd), 0.0), COUNT(*) FROM cost_ledger \
                     WHERE feature = ?1 AND created_at >= ?2",
                    rusqlite::params![feature.as_str(), since],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
            })
            .await
            .map_err(map_tr_err)?;

        let avg_cost_per_call = if call_count == 0 {
            0.0
        } else {
            total_usd / call_count as f64
        };
        Ok(FeatureCostSummary {
            total_usd,
            call_count,
            avg_cost_per_call,
        })
    }

    /// Mean estimate accuracy over records that carried an estimate.
    ///
    /// Each record scores `max(0, 1 - |actual - estimated| / estimated)`; an
    /// estimate of zero scores 0. Returns 0.0 when no record qualifies.
    pub async fn estimate_accuracy(&self, days: u32) -> Result<f64, SwitchyardError> {
        let since = window_start(days);
        let pairs: Vec<(f64, f64)> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT cost_usd, estimated_cost_usd FROM cost_ledger \
                     WHERE estimated_cost_usd IS NOT NULL AND created_at >= ?1",
                )?;
                let rows =
                    stmt.query_map(rusqlite::params![since], |row| Ok((row.get(0)?, row.get(1)?)))?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)?;

        if pairs.is_empty() {
            return Ok(0.0);
        }
        let sum: f64 = pairs
            .iter()
            .map(|&(actual, estimated)| accuracy(actual, estimated))
            .sum();
        Ok(sum / pairs.len() as f64)
    }

    /// Total spend and call count across all tenants.
    pub async fn window_summary(&self, days: u32) -> Result<WindowSummary, SwitchyardError> {
        self.summary_since(window_start(days)).await
    }

    /// Spend since 00:00 UTC on the first of the current month.
    pub async fn month_to_date_total(&self) -> Result<f64, SwitchyardError> {
        let now = Utc::now();
        let start = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now);
        Ok(self.summary_since(format_timestamp(start)).await?.total_usd)
    }

    /// Per-feature spend, highest first.
    pub async fn feature_breakdown(&self, days: u32) -> Result<Vec<FeatureSpend>, SwitchyardError> {
        let since = window_start(days);
        let rows: Vec<(String, f64, u64)> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT feature, SUM(cost_usd) AS total, COUNT(*) FROM cost_ledger \
                     WHERE created_at >= ?1 GROUP BY feature ORDER BY total DESC, feature ASC",
                )?;
                let rows = stmt.query_map(rusqlite::params![since], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(feature, total_usd, call_count)| {
                Some(FeatureSpend {
                    feature: parse_feature(&feature)?,
                    total_usd,
                    call_count,
                })
            })
            .collect())
    }

    /// Spend per UTC day over the last `days` days, oldest first. Days with
    /// no calls are absent.
    pub async fn daily_trend(&self, days: u32) -> Result<Vec<DailySpend>, SwitchyardError> {
        let since = window_start(days);
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT substr(created_at, 1, 10) AS day, SUM(cost_usd), COUNT(*) \
                     FROM cost_ledger WHERE created_at >= ?1 GROUP BY day ORDER BY day ASC",
                )?;
                let rows = stmt.query_map(rusqlite::params![since], |row| {
                    Ok(DailySpend {
                        day: row.get(0)?,
                        total_usd: row.get(1)?,
                        call_count: row.get(2)?,
                    })
                })?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn summary_since(&self, since: String) -> Result<WindowSummary, SwitchyardError> {
        self.conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT COALESCE(SUM(cost_usd), 0.0), COUNT(*) FROM cost_ledger \
                     WHERE created_at >= ?1",
                    rusqlite::params![since],
                    |row| {
                        Ok(WindowSummary {
                            total_usd: row.get(0)?,
                            call_count: row.get(1)?,
                        })
                    },
                )
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Lower bound of a `days`-day window ending now. A window reaching before
/// year 1 has no lower bound: the empty string sorts before every timestamp.
fn window_start(days: u32) -> String {
    Duration::try_days(i64::from(days))
        .and_then(|span| Utc::now().checked_sub_signed(span))
        .filter(|start| start.year() >= 1)
        .map(format_timestamp)
        .unwrap_or_default()
}

fn accuracy(actual: f64, estimated: f64) -> f64 {
    if estimated <= 0.0 {
        return 0.0;
    }
    (1.0 - (actual - estimated).abs() / estimated).max(0.0)
}

fn parse_feature(name: &str) -> Option<Feature> {
    match Feature::from_str(name) {
        Ok(feature) => Some(feature),
        Err(_) => {
            warn!(feature = name, "ledger row has an unregistered feature");
            None
        }
    }
}
