//! qbdoc CLI - query builder parameter documentation
//!
//! This binary provides the command-line interface for qbdoc.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qbdoc::{describe_features, document_routes, inspect_file, load_config};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qbdoc")]
#[command(about = "Document spatie/laravel-query-builder parameters of Laravel routes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Document route actions located through the configured autoload roots
    Document {
        /// Actions in `Fully\Qualified\Controller@method` form
        #[arg(required = true)]
        actions: Vec<String>,
    },
    /// Document one handler method of a single PHP file
    Inspect {
        /// PHP source file
        file: PathBuf,
        /// Handler method name
        method: String,
        /// Class declaring the handler (defaults to the first class in the file)
        #[arg(long)]
        class: Option<String>,
    },
    /// Print the capability descriptors
    Features,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Document { actions } => {
            let base_dir = env::current_dir().context("Failed to get current directory")?;
            print_json(&document_routes(&config, &base_dir, &actions)?)
        }
        Commands::Inspect {
            file,
            method,
            class,
        } => print_json(&inspect_file(&config, &file, &method, class.as_deref())?),
        Commands::Features => print_json(&describe_features(&config)),
    }
}

/// Initialize logging system
///
/// Logs go to stderr so stdout carries only JSON.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "qbdoc_core={level},qbdoc_php={level},{}={level}",
            env!("CARGO_PKG_NAME")
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
