//! shiftledger library root.
//! Work-time ledger & attendance reconciliation engine: open-ended work
//! sessions, one attendance period per worker per civil day, an auto-close
//! safety net, and timezone-correct multi-window rollups.
//! Exposes the CLI parser, a high-level run() function, and internal modules.

pub mod calendar;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Start { .. } | Commands::Stop { .. } | Commands::Active => {
            cli::commands::session::handle(cli, cfg)
        }
        Commands::ClockIn { .. } | Commands::ClockOut { .. } | Commands::Status { .. } => {
            cli::commands::attendance::handle(cli, cfg)
        }
        Commands::Day { .. } => cli::commands::day::handle(cli, cfg),
        Commands::Report { .. } | Commands::VehicleMonth { .. } => {
            cli::commands::report::handle(cli, cfg)
        }
        Commands::AdminSet { .. } | Commands::Audit { .. } | Commands::Del { .. } => {
            cli::commands::admin::handle(cli, cfg)
        }
        Commands::Sweep { .. } => cli::commands::sweep::handle(cli, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1. parse CLI
    let cli = Cli::parse();

    // 2. load config once
    let mut cfg = Config::load();

    // 3. apply the DB override from the command line, if any
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    // 4. hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
