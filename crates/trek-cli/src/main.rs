//! Trek CLI - Transport activity dashboard
//!
//! Usage:
//!   trek accounts                      List demo accounts
//!   trek journeys --account acc-1      Fetch and display journeys
//!   trek stats --target-month 2023-07  Show monthly stat cards
//!   trek export --kind purchases       Write a CSV export
//!   trek serve --port 3000             Start the web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Accounts => commands::cmd_accounts(),
        Commands::Journeys {
            account,
            year,
            month,
            months_back,
        } => {
            let api = commands::api_from_env()?;
            let mut session = commands::session_for(&account);
            commands::cmd_journeys(&api, &mut session, year, month, months_back).await
        }
        Commands::Stats {
            account,
            year,
            month,
            months_back,
            target_month,
        } => {
            let api = commands::api_from_env()?;
            let mut session = commands::session_for(&account);
            commands::cmd_stats(
                &api,
                &mut session,
                year,
                month,
                months_back,
                target_month.as_deref(),
            )
            .await
        }
        Commands::Export {
            account,
            kind,
            output,
            year,
            month,
            months_back,
        } => {
            let api = commands::api_from_env()?;
            let mut session = commands::session_for(&account);
            commands::cmd_export(&api, &mut session, kind, &output, year, month, months_back).await
        }
        Commands::Serve {
            port,
            host,
            static_dir,
            cors_origins,
        } => {
            commands::cmd_serve(&host, port, static_dir.as_deref(), cors_origins.as_deref()).await
        }
    }
}
