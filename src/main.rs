//! Skirmish CLI - Command-line interface for scripting Skirmish matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Skirmish - A two-player hero/HQ tactics rules engine
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a JSON command script against a fresh session
    Run {
        /// Script file: a JSON array of commands
        #[arg(required = true)]
        script: std::path::PathBuf,

        /// Dice seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Rules config file (JSON, omitted fields take defaults)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Use fixed dice showing this face instead of seeded dice
        #[arg(short, long)]
        dice: Option<u32>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Only print the final session state
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the hero catalog
    Heroes {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            script,
            seed,
            config,
            dice,
            format,
            quiet,
        } => cli::run::execute(script, seed, config, dice, format, quiet),

        Commands::Heroes { format } => cli::heroes::execute(format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
