// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchyard - route LLM calls to the cheapest adequate model.
//!
//! Binary entry point: inspection commands that run the pure pipeline stages,
//! a live `call` through the orchestrator, and ledger reports.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod call;
mod costs;
mod inspect;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use switchyard_config::model::SwitchyardConfig;
use switchyard_core::{Feature, FeatureContext, SwitchyardError};
use switchyard_router::{ModelTier, RoutingConstraints};
use tracing::error;

/// Switchyard - route LLM calls to the cheapest adequate model.
#[derive(Parser, Debug)]
#[command(name = "switchyard", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the standard search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a query and print the result as JSON.
    Classify { text: String },
    /// Pick a model for a query and print the decision as JSON.
    Route {
        text: String,
        #[command(flatten)]
        constraints: ConstraintArgs,
    },
    /// Print the system prompt assembled for a feature.
    Prompt {
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Run one feature call against the Anthropic API and record its cost.
    Call {
        #[command(flatten)]
        context: ContextArgs,
        #[command(flatten)]
        constraints: ConstraintArgs,
        /// Output token cap; defaults to the feature's configured cap.
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Print the full response as JSON instead of the generated text.
        #[arg(long)]
        json: bool,
        prompt: String,
    },
    /// Read the cost ledger.
    Costs {
        #[command(subcommand)]
        command: CostsCommand,
        /// Output JSON instead of text.
        #[arg(long, global = true)]
        json: bool,
        /// Disable colored output.
        #[arg(long, global = true)]
        plain: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CostsCommand {
    /// Spend for one tenant, split by feature.
    Tenant {
        tenant_id: String,
        #[arg(long)]
        days: Option<u32>,
    },
    /// Spend on one feature across all tenants.
    Feature {
        feature: Feature,
        #[arg(long)]
        days: Option<u32>,
    },
    /// How close routing estimates came to actual costs.
    Accuracy {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Window total, month to date, per-feature breakdown, and daily trend.
    Report,
}

#[derive(Args, Debug, Default)]
struct ConstraintArgs {
    /// Lowest model tier allowed (low, mid, high).
    #[arg(long)]
    min_tier: Option<ModelTier>,
    /// Ceiling on the reference-size call cost, in USD.
    #[arg(long)]
    max_cost: Option<f64>,
    /// Ceiling on average model latency, in milliseconds.
    #[arg(long)]
    max_latency: Option<u32>,
    /// Minimum context window, in tokens.
    #[arg(long)]
    min_context: Option<u32>,
}

impl From<ConstraintArgs> for RoutingConstraints {
    fn from(args: ConstraintArgs) -> Self {
        Self {
            max_cost: args.max_cost,
            max_latency_ms: args.max_latency,
            min_context_window: args.min_context,
            min_tier: args.min_tier,
        }
    }
}

#[derive(Args, Debug)]
struct ContextArgs {
    #[arg(long)]
    feature: Feature,
    #[arg(long)]
    tenant: String,
    #[arg(long)]
    client_name: String,
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    voice_profile: Option<String>,
    /// Known competitor; repeat for several.
    #[arg(long = "competitor")]
    competitors: Vec<String>,
}

impl From<ContextArgs> for FeatureContext {
    fn from(args: ContextArgs) -> Self {
        let mut ctx = FeatureContext::new(args.feature, args.tenant, args.client_name);
        ctx.industry = args.industry;
        ctx.voice_profile = args.voice_profile;
        ctx.competitors = args.competitors;
        ctx
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => switchyard_config::load_and_validate_path(path),
        None => switchyard_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            switchyard_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    if let Err(e) = run(cli.command, &config).await {
        error!(error = %e, "command failed");
        eprintln!("switchyard: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &SwitchyardConfig) -> Result<(), SwitchyardError> {
    match command {
        Commands::Classify { text } => inspect::run_classify(&text),
        Commands::Route { text, constraints } => {
            inspect::run_route(config, &text, &constraints.into())
        }
        Commands::Prompt { context } => inspect::run_prompt(config, &context.into()),
        Commands::Call {
            context,
            constraints,
            max_tokens,
            json,
            prompt,
        } => {
            call::run_call(
                config,
                call::CallOptions {
                    context: context.into(),
                    constraints: constraints.into(),
                    max_tokens,
                    json,
                },
                prompt,
            )
            .await
        }
        Commands::Costs {
            command,
            json,
            plain,
        } => costs::run_costs(config, command, json, plain).await,
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchyard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn route_flags_become_constraints() {
        let cli = Cli::try_parse_from([
            "switchyard",
            "route",
            "compare two plans",
            "--min-tier",
            "mid",
            "--max-cost",
            "0.05",
            "--min-context",
            "100000",
        ])
        .unwrap();
        let Commands::Route { text, constraints } = cli.command else {
            panic!("expected route");
        };
        assert_eq!(text, "compare two plans");
        let constraints = RoutingConstraints::from(constraints);
        assert_eq!(constraints.min_tier, Some(ModelTier::Mid));
        assert_eq!(constraints.max_cost, Some(0.05));
        assert_eq!(constraints.max_latency_ms, None);
        assert_eq!(constraints.min_context_window, Some(100_000));
    }

    #[test]
    fn context_flags_become_feature_context() {
        let cli = Cli::try_parse_from([
            "switchyard",
            "prompt",
            "--feature",
            "competitive_scan",
            "--tenant",
            "t-1",
            "--client-name",
            "Acme Plumbing",
            "--competitor",
            "RotoFast",
            "--competitor",
            "DrainCo",
        ])
        .unwrap();
        let Commands::Prompt { context } = cli.command else {
            panic!("expected prompt");
        };
        let ctx = FeatureContext::from(context);
        assert_eq!(ctx.feature, Feature::CompetitiveScan);
        assert_eq!(ctx.client_name, "Acme Plumbing");
        assert_eq!(ctx.competitors, vec!["RotoFast", "DrainCo"]);
        assert!(ctx.industry.is_none());
    }

    #[test]
    fn unknown_feature_is_rejected() {
        let result = Cli::try_parse_from([
            "switchyard",
            "costs",
            "feature",
            "not_a_feature",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn costs_flags_are_global() {
        let cli =
            Cli::try_parse_from(["switchyard", "costs", "tenant", "t-1", "--days", "7", "--json"])
                .unwrap();
        let Commands::Costs { command, json, .. } = cli.command else {
            panic!("expected costs");
        };
        assert!(json);
        assert!(matches!(command, CostsCommand::Tenant { days: Some(7), .. }));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = switchyard_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.app.name, "switchyard");
    }
}
