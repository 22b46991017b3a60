//! safeguard: deployment policy checks for compiled plans
//!
//! Evaluates a compiled deployment plan against the safeguards listed in a
//! TOML configuration and reports which policies approved or failed.
//!
//! Usage:
//!   cargo run -p safeguard-cli -- check --config safeguards.toml --plan plan.json
//!   cargo run -p safeguard-cli -- check --config safeguards.toml --plan plan.json --format json
//!   cargo run -p safeguard-cli -- list
//!
//! Exit codes: 0 when the deployment may proceed, 1 when an error-level
//! policy failed, 2 when the engine itself could not run.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use safeguard_contracts::{
    error::{SafeguardError, SafeguardResult},
    policy::{EnforcementLevel, PolicyReport, Verdict},
};
use safeguard_core::{PolicyRegistry, PolicyRunner};
use safeguard_policy::{builtin_registry, config::load_plan, SafeguardConfig};

// ── CLI definition ────────────────────────────────────────────────────────────

/// safeguard: policy checks for compiled deployment plans.
#[derive(Parser)]
#[command(
    name = "safeguard",
    about = "Check a compiled deployment plan against configured safeguards",
    long_about = "Evaluates the policies listed in a safeguard TOML file against a compiled\n\
                  deployment plan and exits non-zero when an error-level policy fails."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a plan against the configured policies.
    Check {
        /// Safeguard configuration (TOML).
        #[arg(long, short = 'c')]
        config: PathBuf,

        /// Compiled deployment plan (JSON).
        #[arg(long, short = 'p')]
        plan: PathBuf,

        /// Override the stage from the configuration.
        #[arg(long)]
        stage: Option<String>,

        /// Override the region from the configuration.
        #[arg(long)]
        region: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List the built-in policies and their documentation links.
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check {
            config,
            plan,
            stage,
            region,
            format,
        } => check(&config, &plan, stage, region, format),
        Command::List => {
            list(&builtin_registry());
            Ok(false)
        }
    };

    match result {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            eprintln!("safeguard could not evaluate the deployment: {}", e);
            if let SafeguardError::UnknownPolicy { .. } = e {
                eprintln!("run `safeguard list` to see the available policies");
            }
            ExitCode::from(2)
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Run the configured policies. Returns `true` when the deployment is blocked.
fn check(
    config_path: &std::path::Path,
    plan_path: &std::path::Path,
    stage: Option<String>,
    region: Option<String>,
    format: Format,
) -> SafeguardResult<bool> {
    let mut config = SafeguardConfig::from_file(config_path)?;
    if let Some(stage) = stage {
        config.service.stage = stage;
    }
    if let Some(region) = region {
        config.service.region = region;
    }

    let plan = load_plan(plan_path)?;
    debug!(resources = plan.len(), path = %plan_path.display(), "loaded deployment plan");

    let runner = PolicyRunner::new(builtin_registry());
    let report = runner.run(&config.deployment(plan), &config.policies)?;

    match format {
        Format::Text => print_report(&report),
        Format::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(|e| SafeguardError::ConfigError {
                reason: format!("failed to serialize report: {e}"),
            })?;
            println!("{json}");
        }
    }

    Ok(report.blocks_deployment())
}

fn list(registry: &PolicyRegistry) {
    for policy in registry.iter() {
        println!("{:<24} {}", policy.id(), policy.description());
        println!("{:<24} {}", "", policy.docs_url());
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn print_report(report: &PolicyReport) {
    println!();
    println!("Safeguard results:");
    println!();

    for entry in &report.entries {
        match &entry.verdict {
            Verdict::Approved => println!("   passed - {}", entry.policy_id),
            Verdict::Failed(messages) => {
                let label = match entry.enforcement_level {
                    EnforcementLevel::Error => "failed",
                    EnforcementLevel::Warning => "warned",
                };
                println!("   {} - {}", label, entry.policy_id);
                for message in messages {
                    println!("     {}", message);
                }
                println!("     Details: {}", entry.docs_url);
            }
        }
    }

    println!();
    if report.blocks_deployment() {
        println!("Deployment blocked: one or more error-level safeguards failed.");
    } else if report.is_approved() {
        println!("All safeguards passed.");
    } else {
        println!("Safeguards reported warnings; deployment may proceed.");
    }
}
