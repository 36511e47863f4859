//! # ecoaware
//!
//! Operator command line for EcoAware core:
//! - `ecoaware goals parse/render`: run the goal normalizer over stdin
//! - `ecoaware staff ensure`: create or promote a staff account
//! - `ecoaware campaigns list/show`: inspect stored campaigns
//! - `ecoaware articles list`: page through articles

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ecoaware_core::logging::normalize_level;
use ecoaware_core::AppConfig;

/// EcoAware community platform tools.
#[derive(Parser)]
#[command(name = "ecoaware", version, about)]
struct Cli {
    /// SQLite database file (overrides ECOAWARE_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Log level: trace, debug, info, warn or error.
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rotating log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize or render campaign goal lists.
    Goals {
        #[command(subcommand)]
        command: commands::goals::GoalsCommands,
    },
    /// Manage staff accounts.
    Staff {
        #[command(subcommand)]
        command: commands::staff::StaffCommands,
    },
    /// Inspect campaigns.
    Campaigns {
        #[command(subcommand)]
        command: commands::campaigns::CampaignsCommands,
    },
    /// Inspect articles.
    Articles {
        #[command(subcommand)]
        command: commands::articles::ArticlesCommands,
    },
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::from_env().context("invalid environment configuration")?;
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = normalize_level(level).context("invalid --log-level")?;
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match &cli.command {
        // Pure text transforms; no database or log files involved.
        Commands::Goals { command } => commands::goals::execute(command),
        Commands::Staff { command } => {
            commands::init_logging(&config)?;
            commands::staff::execute(command, &config)
        }
        Commands::Campaigns { command } => {
            commands::init_logging(&config)?;
            commands::campaigns::execute(command, &config)
        }
        Commands::Articles { command } => {
            commands::init_logging(&config)?;
            commands::articles::execute(command, &config)
        }
    }
}
