//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Trek - Aggregate journeys and spending from transport providers
#[derive(Parser)]
#[command(name = "trek")]
#[command(about = "Transport activity dashboard over simulated provider data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the selectable demo accounts
    Accounts,

    /// Fetch and display the journey table
    Journeys {
        /// Demo account id (e.g. acc-1)
        #[arg(short, long, default_value = "acc-1")]
        account: String,

        /// Anchor year of the fetch window
        ///
        /// The demo sandbox only carries data for 2023.
        #[arg(long, default_value_t = 2023)]
        year: i32,

        /// Anchor month of the fetch window (1-12)
        #[arg(long, default_value_t = 7)]
        month: u32,

        /// Additional months before the anchor to fetch
        #[arg(long, default_value_t = 2)]
        months_back: u32,
    },

    /// Show the monthly stat cards and summary
    Stats {
        /// Demo account id (e.g. acc-1)
        #[arg(short, long, default_value = "acc-1")]
        account: String,

        /// Anchor year of the fetch window
        #[arg(long, default_value_t = 2023)]
        year: i32,

        /// Anchor month of the fetch window (1-12)
        #[arg(long, default_value_t = 7)]
        month: u32,

        /// Additional months before the anchor to fetch
        #[arg(long, default_value_t = 2)]
        months_back: u32,

        /// Restrict the stat cards to one "YYYY-MM" month
        #[arg(long)]
        target_month: Option<String>,
    },

    /// Export fetched records to a date-stamped CSV file
    Export {
        /// Demo account id (e.g. acc-1)
        #[arg(short, long, default_value = "acc-1")]
        account: String,

        /// Record kind to export
        #[arg(short, long, value_enum, default_value_t = ExportKind::Journeys)]
        kind: ExportKind,

        /// Output directory for the CSV file
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Anchor year of the fetch window
        #[arg(long, default_value_t = 2023)]
        year: i32,

        /// Anchor month of the fetch window (1-12)
        #[arg(long, default_value_t = 7)]
        month: u32,

        /// Additional months before the anchor to fetch
        #[arg(long, default_value_t = 2)]
        months_back: u32,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g. ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origins (comma-separated)
        #[arg(long)]
        cors_origins: Option<String>,
    },
}

/// Exportable record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    Journeys,
    Purchases,
}
