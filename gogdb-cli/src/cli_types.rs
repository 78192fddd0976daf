//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gogdb-ingest")]
#[command(about = "Import GOG catalog snapshots into a SQLite catalog", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (TOML, defaults to ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog database path (overrides database.path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to this file under logging.dir (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Import product manifests (.json) and snapshot archives (.tar.xz)
    Import {
        /// Sources to import, in order
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },

    /// Show catalog statistics and recent imports
    Stats {
        /// Number of import log entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Print trimmed product records from a snapshot archive as JSON lines
    Collate {
        /// Snapshot archive (.tar.xz)
        archive: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
