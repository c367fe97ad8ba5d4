//! # gzbundle Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file is the entry point of the gzbundle CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each command (`make-archive`, `extract-files`) is a variant of the `Commands` enum
//! - Commands are mapped to handler functions in `commands::`
//! - All errors are propagated to this level, printed once, and turned into exit status 1
//!
//! ## Examples
//!
//! ```bash
//! # Archive two files, compressing up to 4 at a time
//! gzbundle make-archive -P 4 files.tar a.txt b.txt
//!
//! # Extract them again, one job at a time, with progress logging
//! gzbundle -v extract-files -S files.tar restored/
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (make-archive, extract-files)
mod common; // Process supervision, pipelines, filesystem helpers
mod core; // Errors and configuration

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "gzbundle",
    about = "Bundle files into a tar archive, compressing each one with gzip in parallel",
    long_about = "Compresses every input file in its own gzip process (with a cap on how many\n\
                  run at once) and bundles the results with tar. Extraction reverses it.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(aliases = ["create", "c"])]
    MakeArchive(commands::make_archive::MakeArchiveArgs),
    #[command(aliases = ["extract", "x"])]
    ExtractFiles(commands::extract_files::ExtractFilesArgs),
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::MakeArchive(args) => commands::make_archive::handle_make_archive(args),
        Commands::ExtractFiles(args) => commands::extract_files::handle_extract_files(args),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
