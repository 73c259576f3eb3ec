//! chains - resolve venues into chains of commonly branded locations.
//!
//! Usage:
//!   chains import <venues.json>
//!   chains resolve [--global]
//!   chains lookup <venue_id>
//!   chains show <chain_id>
//!   chains prune [<chain_id>] [--threshold <t>]
//!   chains merge <chain_a> <chain_b>
//!   chains remove <chain_id> <venue_id>
//!   chains delete <chain_id>
//!   chains repair
//!   chains stats

mod app;
mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use chains_core::config::ChainsConfig;
use chains_core::tracing_setup::init_tracing;

use app::App;

#[derive(Parser)]
#[command(name = "chains")]
#[command(about = "Group venues into chains of commonly branded locations")]
#[command(version)]
struct Cli {
    /// TOML config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the SQLite database path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Override the category hierarchy JSON
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cache venues from a JSON array of location-API payloads
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Resolve every cached venue
    Resolve {
        /// Search globally by name before resolving each venue
        #[arg(long)]
        global: bool,
    },

    /// Show the chain a venue belongs to
    Lookup { venue_id: String },

    /// Print a chain document
    Show { chain_id: String },

    /// Remove members scoring below the threshold against the rest of their chain
    Prune {
        /// Chain to prune; every chain when omitted
        chain_id: Option<String>,

        /// Confidence threshold (defaults to matching.prune_threshold)
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Replace two chains with one over both memberships
    Merge { chain_a: String, chain_b: String },

    /// Remove one venue from a chain
    Remove { chain_id: String, venue_id: String },

    /// Delete a chain and its lookups
    Delete { chain_id: String },

    /// Reconcile the venue-to-chain lookup with the chain documents
    Repair,

    /// Corpus and chain counts
    Stats,
}

fn load_config(cli: &Cli) -> anyhow::Result<ChainsConfig> {
    let mut config = match &cli.config {
        Some(path) => ChainsConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ChainsConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.storage.db_path = db.display().to_string();
    }
    if let Some(categories) = &cli.categories {
        config.storage.category_tree_path = Some(categories.display().to_string());
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<serde_json::Value> {
    let config = load_config(&cli)?;
    init_tracing(&config.observability);
    let app = App::open(config)?;

    match cli.command {
        Commands::Import { file } => commands::import(&app, &file),
        Commands::Resolve { global } => commands::resolve(&app, global),
        Commands::Lookup { venue_id } => commands::lookup(&app, &venue_id),
        Commands::Show { chain_id } => commands::show(&app, &chain_id),
        Commands::Prune {
            chain_id,
            threshold,
        } => commands::prune(&app, chain_id.as_deref(), threshold),
        Commands::Merge { chain_a, chain_b } => commands::merge(&app, &chain_a, &chain_b),
        Commands::Remove { chain_id, venue_id } => commands::remove(&app, &chain_id, &venue_id),
        Commands::Delete { chain_id } => commands::delete(&app, &chain_id),
        Commands::Repair => commands::repair(&app),
        Commands::Stats => commands::stats(&app),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(output) => {
            match serde_json::to_string_pretty(&output) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
