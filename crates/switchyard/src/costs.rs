// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `switchyard costs`: ledger reads and the admin cost report.

use std::fmt::Write as _;
use std::io::IsTerminal;

use serde::Serialize;
use switchyard_config::model::{CostConfig, SwitchyardConfig};
use switchyard_core::SwitchyardError;
use switchyard_cost::{
    CostLedger, DailySpend, FeatureCostSummary, FeatureSpend, TenantCostSummary, WindowSummary,
};
use switchyard_storage::Database;

use crate::CostsCommand;
use crate::inspect::print_json;

/// Everything `costs report` shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub window_days: u32,
    pub window: WindowSummary,
    pub month_to_date_usd: f64,
    pub by_feature: Vec<FeatureSpend>,
    pub trend_days: u32,
    pub daily: Vec<DailySpend>,
    pub estimate_accuracy: f64,
}

#[derive(Debug, Serialize)]
struct AccuracyOutput {
    days: u32,
    accuracy: f64,
}

pub async fn run_costs(
    config: &SwitchyardConfig,
    command: CostsCommand,
    json: bool,
    plain: bool,
) -> Result<(), SwitchyardError> {
    let database = Database::from_config(&config.storage).await?;
    let ledger = CostLedger::from_database(&database);
    let use_color = !plain && std::io::stdout().is_terminal();
    let default_days = config.cost.default_window_days;

    match command {
        CostsCommand::Tenant { tenant_id, days } => {
            let days = days.unwrap_or(default_days);
            let summary = ledger.totals_by_tenant(&tenant_id, days).await?;
            if json {
                print_json(&summary)?;
            } else {
                print!("{}", render_tenant(&tenant_id, days, &summary, use_color));
            }
        }
        CostsCommand::Feature { feature, days } => {
            let days = days.unwrap_or(default_days);
            let summary = ledger.totals_by_feature(feature, days).await?;
            if json {
                print_json(&summary)?;
            } else {
                print!(
                    "{}",
                    render_feature(feature.as_str(), days, &summary, use_color)
                );
            }
        }
        CostsCommand::Accuracy { days } => {
            let days = days.unwrap_or(default_days);
            let accuracy = ledger.estimate_accuracy(days).await?;
            if json {
                print_json(&AccuracyOutput { days, accuracy })?;
            } else {
                println!("estimate accuracy over {days} days: {:.1}%", accuracy * 100.0);
            }
        }
        CostsCommand::Report => {
            let report = build_report(&ledger, &config.cost).await?;
            if json {
                print_json(&report)?;
            } else {
                print!("{}", render_report(&report, use_color));
            }
        }
    }
    Ok(())
}

pub async fn build_report(
    ledger: &CostLedger,
    config: &CostConfig,
) -> Result<CostReport, SwitchyardError> {
    Ok(CostReport {
        window_days: config.default_window_days,
        window: ledger.window_summary(config.default_window_days).await?,
        month_to_date_usd: ledger.month_to_date_total().await?,
        by_feature: ledger.feature_breakdown(config.default_window_days).await?,
        trend_days: config.trend_days,
        daily: ledger.daily_trend(config.trend_days).await?,
        estimate_accuracy: ledger.estimate_accuracy(config.default_window_days).await?,
    })
}

fn heading(title: &str, use_color: bool) -> String {
    let mut out = String::from("\n");
    if use_color {
        use colored::Colorize;
        let _ = writeln!(out, "  {}", title.bold());
    } else {
        let _ = writeln!(out, "  {title}");
    }
    let _ = writeln!(out, "  {}", "-".repeat(44));
    out
}

fn render_tenant(
    tenant_id: &str,
    days: u32,
    summary: &TenantCostSummary,
    use_color: bool,
) -> String {
    let mut out = heading(&format!("tenant {tenant_id}, last {days} days"), use_color);
    let _ = writeln!(
        out,
        "    Total:    ${:.4} over {} calls",
        summary.total_usd, summary.call_count
    );
    for (feature, total) in &summary.by_feature {
        let _ = writeln!(out, "    {:<20} ${total:.4}", feature.as_str());
    }
    out.push('\n');
    out
}

fn render_feature(
    feature: &str,
    days: u32,
    summary: &FeatureCostSummary,
    use_color: bool,
) -> String {
    let mut out = heading(&format!("feature {feature}, last {days} days"), use_color);
    let _ = writeln!(
        out,
        "    Total:    ${:.4} over {} calls",
        summary.total_usd, summary.call_count
    );
    let _ = writeln!(out, "    Average:  ${:.6} per call", summary.avg_cost_per_call);
    out.push('\n');
    out
}

pub fn render_report(report: &CostReport, use_color: bool) -> String {
    let mut out = heading("switchyard cost report", use_color);
    let _ = writeln!(
        out,
        "    Last {} days: ${:.4} over {} calls",
        report.window_days, report.window.total_usd, report.window.call_count
    );
    let _ = writeln!(out, "    Month to date: ${:.4}", report.month_to_date_usd);
    let _ = writeln!(
        out,
        "    Estimate accuracy: {:.1}%",
        report.estimate_accuracy * 100.0
    );

    out.push_str(&heading("by feature", use_color));
    if report.by_feature.is_empty() {
        let _ = writeln!(out, "    (no calls)");
    }
    for spend in &report.by_feature {
        let _ = writeln!(
            out,
            "    {:<20} ${:>10.4}  {:>6} calls",
            spend.feature.as_str(),
            spend.total_usd,
            spend.call_count
        );
    }

    out.push_str(&heading(
        &format!("daily, last {} days", report.trend_days),
        use_color,
    ));
    if report.daily.is_empty() {
        let _ = writeln!(out, "    (no calls)");
    }
    for day in &report.daily {
        let _ = writeln!(
            out,
            "    {}  ${:>10.4}  {:>6} calls",
            day.day, day.total_usd, day.call_count
        );
    }
    out.push('\n');
    out
}
