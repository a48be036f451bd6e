//! Binary entry point for studysphere.
//!
//! This binary provides the CLI front end for the study room search.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
#![allow(clippy::multiple_crate_versions)]

use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use studysphere::cli::{SearchArgs, cmd_config_show, cmd_scrape, cmd_search, parse_window};
use studysphere::config::StudySphereConfig;
use studysphere::controller::SearchPhase;
use studysphere::observability::{self, InitOptions};
use studysphere::rendering::OutputFormat;

/// Studysphere - find bookable study rooms.
#[derive(Parser)]
#[command(name = "studysphere")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List rooms available in a time window.
    Search {
        /// Building filter (empty for all buildings).
        #[arg(short, long, default_value = "")]
        building: String,

        /// Window start, YYYY-MM-DDTHH:MM (default: today 12:00).
        #[arg(short, long)]
        start: Option<String>,

        /// Window end, YYYY-MM-DDTHH:MM (default: today 14:00).
        #[arg(short, long)]
        end: Option<String>,

        /// Output format: text or json.
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Ask the room service to collect fresh availability.
    Scrape {
        /// Window start, YYYY-MM-DDTHH:MM (default: today 12:00).
        #[arg(short, long)]
        start: Option<String>,

        /// Window end, YYYY-MM-DDTHH:MM (default: today 14:00).
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Loads configuration from an explicit path or the default locations.
fn load_config(path: Option<&std::path::Path>) -> studysphere::Result<StudySphereConfig> {
    let config = match path {
        Some(path) => StudySphereConfig::load_from_file(path)?,
        None => StudySphereConfig::load_default(),
    };
    Ok(config.with_env_overrides())
}

/// Runs the selected command.
fn run_command(command: Commands, config: &StudySphereConfig) -> studysphere::Result<ExitCode> {
    let today = Local::now().date_naive();

    match command {
        Commands::Search {
            building,
            start,
            end,
            format,
        } => {
            let args = SearchArgs {
                building,
                window: parse_window(start.as_deref(), end.as_deref(), today)?,
                format: OutputFormat::parse(&format),
            };
            let phase = cmd_search(&args, config)?;
            Ok(if phase == SearchPhase::Success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        },
        Commands::Scrape { start, end } => {
            let window = parse_window(start.as_deref(), end.as_deref(), today)?;
            cmd_scrape(window, config)?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Config { show } => {
            if show {
                let stdout = std::io::stdout();
                cmd_config_show(config, &mut stdout.lock())?;
            } else {
                println!("Use --show to print the effective configuration");
            }
            Ok(ExitCode::SUCCESS)
        },
    }
}
