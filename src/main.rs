//! Command-line front end for the DarkForest blocker.
//!
//! Validates policy files and evaluates individual requests against them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use darkforest_blocker::{load_config, presets, PolicyConfig, PolicyEngine, PresetCategory};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "darkforest-blocker")]
#[command(author, version, about = "User-Agent blocking policy engine")]
struct Args {
    /// Path to policy configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a single request and print the decision as JSON
    Check {
        /// User-Agent header value
        #[arg(short, long, default_value = "")]
        user_agent: String,

        /// Request path
        #[arg(short, long, default_value = "/")]
        path: String,

        /// Include the pattern that decided the request
        #[arg(long)]
        explain: bool,
    },

    /// Load and compile the policy, reporting any configuration error
    Validate,

    /// List preset categories and their patterns
    Presets {
        /// Only show these categories
        #[arg(long)]
        category: Vec<String>,
    },
}

fn init_logging(json: bool, level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout carries command output, so logs go to stderr
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_engine(config_path: Option<&PathBuf>) -> Result<PolicyEngine> {
    let path = config_path.context("--config is required for this command")?;
    let config: PolicyConfig =
        load_config(path).with_context(|| format!("loading {}", path.display()))?;
    let engine = PolicyEngine::new(config).context("invalid policy")?;
    Ok(engine)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs, &args.log_level);

    match args.command {
        Command::Check {
            user_agent,
            path,
            explain,
        } => {
            let engine = build_engine(args.config.as_ref())?;
            let output = if explain {
                serde_json::to_string_pretty(&engine.explain(&user_agent, &path))?
            } else {
                serde_json::to_string_pretty(&engine.decide(&user_agent, &path))?
            };
            println!("{}", output);
        }
        Command::Validate => {
            let engine = build_engine(args.config.as_ref())?;
            let policy = engine.policy();
            info!("Policy is valid");
            println!(
                "ok: {} block patterns, {} exempt patterns",
                policy.block_patterns().count(),
                policy.exempt_patterns().count()
            );
        }
        Command::Presets { category } => {
            let names: Vec<&str> = if category.is_empty() {
                PresetCategory::ALL.iter().map(PresetCategory::as_str).collect()
            } else {
                category.iter().map(String::as_str).collect()
            };

            for name in names {
                let patterns = presets::resolve_names(&[name])?;
                println!("{}:", name);
                for pattern in patterns {
                    println!("  {}", pattern);
                }
            }
        }
    }

    Ok(())
}
