// crates/mycel-cli/src/main.rs
//
// Binary entrypoint for mycel.
//
// Parses CLI arguments, loads and validates configuration, initializes
// tracing, evaluates the organization's collaboration history, and prints
// the proposed membership changes. Exits 0 when the roster is clean, 1 when
// changes are required, and 2 when the run itself failed.

mod config;
mod output;

use std::path::Path;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;

use config::{CliOverrides, MycelConfig};
use mycel_github::GitHubClient;
use mycel_policy::{evaluate, RunOutcome};
use mycel_reputation::OpenRank;
use output::OutputFormat;

const DEFAULT_CONFIG_PATH: &str = "~/.mycel/config.toml";

/// Mycel: propose organization membership changes from collaboration signals.
#[derive(Parser, Debug)]
#[command(
    name = "mycel",
    version,
    about = "Propose organization membership changes from code-review and merge signals"
)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<String>,

    /// Organization to evaluate (overrides the config file).
    #[arg(long)]
    org: Option<String>,

    /// Seed identity (overrides the config file).
    #[arg(long)]
    pioneer: Option<String>,

    /// Scan at most this many repositories.
    #[arg(long)]
    max_repos: Option<usize>,

    /// Report format.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut file_config = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    // Initialize tracing subscriber for structured logging. Logs go to
    // stderr so the report on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&file_config.log_level)),
        )
        .init();

    // CLI flags override the config file values.
    file_config.apply_overrides(CliOverrides {
        org: args.org,
        pioneer: args.pioneer,
        max_repos: args.max_repos,
        output: args.format,
    });

    let resolved = match file_config.resolve(std::env::var("GITHUB_TOKEN").ok()) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(2);
        }
    };

    tracing::info!("mycel v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Organization: {}", resolved.github.org);
    tracing::info!("Pioneer: {}", resolved.policy.pioneer);
    tracing::info!(
        "Policy: trust >= {}, min {} members, inactive after {} months, {} blocklisted",
        resolved.policy.trust_threshold,
        resolved.policy.min_member_count,
        resolved.policy.inactive_after_months,
        resolved.policy.blocklist.len()
    );

    let client = match GitHubClient::new(resolved.github.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(2);
        }
    };
    let oracle = OpenRank::default();

    let evaluation = match evaluate(
        &client,
        &oracle,
        &resolved.policy,
        &resolved.ingest,
        Utc::now(),
    )
    .await
    {
        Ok(evaluation) => evaluation,
        Err(e) => {
            tracing::error!("Evaluation failed: {}", e);
            return ExitCode::from(2);
        }
    };

    println!("{}", output::render(&evaluation, resolved.output));

    match evaluation.outcome() {
        RunOutcome::Clean => {
            tracing::info!("Roster is {}", RunOutcome::Clean);
            ExitCode::SUCCESS
        }
        outcome @ RunOutcome::ChangesRequired { .. } => {
            tracing::warn!("{}", outcome);
            ExitCode::from(1)
        }
    }
}

/// Load the config named on the command line, or the default file when it
/// exists, or built-in defaults.
fn load_config(explicit: Option<&str>) -> Result<MycelConfig, mycel_core::MycelError> {
    if let Some(path) = explicit {
        return MycelConfig::load(&expand_tilde(path));
    }
    let default_path = expand_tilde(DEFAULT_CONFIG_PATH);
    if Path::new(&default_path).exists() {
        MycelConfig::load(&default_path)
    } else {
        Ok(MycelConfig::default())
    }
}

/// Expand `~` at the start of a path to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
