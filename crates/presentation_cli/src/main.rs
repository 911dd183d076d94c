//! Tool Monkey CLI
//!
//! Runs failure scenarios against a mock tool and prints what the observer saw.

#![allow(clippy::print_stdout)]

mod runner;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use domain::{FailureScenario, scenarios};
use infrastructure::{AppConfig, RetryConfig, TelemetryConfig, init_logging};
use runner::{RunOptions, RunReport, run_scenario};

/// Tool Monkey CLI
#[derive(Parser)]
#[command(name = "tool-monkey")]
#[command(author, version, about = "Deterministic failure injection for agent tools", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scenarios
    List,

    /// Run a built-in scenario against the mock lookup tool
    ///
    /// Example: tool-monkey run retry_exhaustion --calls 3 --retries 3
    Run {
        /// Scenario name (see `list`)
        preset: String,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Run a scenario defined in a configuration file
    ///
    /// Example: tool-monkey scenario --config tool-monkey.toml flaky_search
    Scenario {
        /// TOML file with `[[scenarios]]` tables
        #[arg(short, long)]
        config: PathBuf,

        /// Scenario name within the file
        name: String,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Number of logical calls to make
    #[arg(short = 'n', long, default_value = "5")]
    calls: u32,

    /// Tool name reported to the observer
    #[arg(short, long, default_value = "lookup")]
    tool: String,

    /// Retry failed calls up to this many times
    #[arg(short, long)]
    retries: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn options(&self, retry_defaults: &RetryConfig) -> RunOptions {
        RunOptions {
            calls: self.calls,
            tool_name: self.tool.clone(),
            retry: self
                .retries
                .map(|retries| retry_defaults.clone().with_max_retries(retries)),
        }
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn preset_scenario(name: &str) -> anyhow::Result<FailureScenario> {
    match scenarios::preset(name) {
        Some(scenario) => Ok(scenario?),
        None => bail!("Unknown scenario '{name}'. Run `tool-monkey list` to see the built-in scenarios"),
    }
}

fn print_report(report: &RunReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
        return Ok(());
    }

    println!("Scenario: {}", report.scenario);
    println!();
    for outcome in &report.outcomes {
        println!("  {outcome}");
    }
    println!();
    println!("{}", report.observer.summary());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&TelemetryConfig::with_filter(log_filter_from_verbosity(
        cli.verbose,
    )))?;

    match cli.command {
        Commands::List => {
            println!("Built-in scenarios:");
            for name in scenarios::PRESET_NAMES {
                println!("  {name}");
            }
        },

        Commands::Run { preset, run } => {
            let scenario = preset_scenario(&preset)?;
            let app_config = AppConfig::load()?;
            let report = run_scenario(scenario, &run.options(&app_config.retry)).await;
            print_report(&report, run.json)?;
        },

        Commands::Scenario { config, name, run } => {
            let app_config = AppConfig::from_file(&config)
                .with_context(|| format!("Failed to read {}", config.display()))?;
            let Some(scenario) = app_config.scenario(&name).cloned() else {
                let known: Vec<&str> = app_config.scenario_names().collect();
                bail!(
                    "Scenario '{name}' not found in {}. Defined: {}",
                    config.display(),
                    known.join(", ")
                );
            };
            let report = run_scenario(scenario, &run.options(&app_config.retry)).await;
            print_report(&report, run.json)?;
        },
    }

    Ok(())
}
