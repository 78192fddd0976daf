//! gogdb-ingest CLI
//!
//! Command-line interface for importing GOG catalog snapshots.

mod cli_types;
mod commands;
mod error;
mod logging;
mod settings;
mod spinner;

use std::path::Path;

use clap::Parser;
use log::{LevelFilter, Log};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use cli_types::{Cli, Commands};
pub(crate) use error::CliError;
use logging::LogContext;
use settings::{DEFAULT_CONFIG_PATH, Settings};

/// Number of buffered warnings shown again after a fatal error.
const REPLAYED_WARNINGS: usize = 20;

fn main() {
    let cli = Cli::parse();

    let (settings, log_ctx) = match setup(&cli) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{} {}", "error:".if_supports_color(Stderr, |t| t.red()), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &settings, &log_ctx) {
        log::error!("{}", e);
        replay_warnings(&log_ctx);
        log::logger().flush();
        std::process::exit(1);
    }
    log::logger().flush();
}

/// Load settings and install the logger.
fn setup(cli: &Cli) -> Result<(Settings, LogContext), CliError> {
    let (config_path, explicit) = match &cli.config {
        Some(path) => (path.as_path(), true),
        None => (Path::new(DEFAULT_CONFIG_PATH), false),
    };
    let mut settings = Settings::load(config_path, explicit)?;
    if let Some(name) = &cli.logfile {
        settings.logging.file = Some(name.clone());
    }

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        settings.logging.level_filter()?
    };

    let log_ctx = LogContext::install(&settings.logging, level)?;
    if let Some(path) = log_ctx.file_path() {
        log::debug!("Logging to {} at level {}", path.display(), log_ctx.level());
    }
    Ok((settings, log_ctx))
}

fn run(cli: &Cli, settings: &Settings, log_ctx: &LogContext) -> Result<(), CliError> {
    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => settings.database.resolved_path(),
    };

    match &cli.command {
        Commands::Import { sources } => commands::import::run_import(
            sources,
            &db_path,
            &settings.database,
            log_ctx,
            cli.quiet,
        ),
        Commands::Stats { limit } => {
            commands::stats::run_stats(&db_path, &settings.database, *limit)
        }
        Commands::Collate { archive, output } => {
            commands::collate::run_collate(archive, output.as_deref())
        }
    }
}

/// Print the most recent buffered warnings so they follow the error line.
fn replay_warnings(log_ctx: &LogContext) {
    if log_ctx.buffer().is_empty() {
        return;
    }
    let warnings = log_ctx.recent_warnings(REPLAYED_WARNINGS);
    if warnings.is_empty() {
        return;
    }
    eprintln!(
        "{} ({} of {} buffered lines):",
        "Recent warnings".if_supports_color(Stderr, |t| t.yellow()),
        warnings.len(),
        log_ctx.buffer().len()
    );
    for line in warnings {
        eprintln!("  {}", line);
    }
}

/// Print an empty line between output sections.
pub(crate) fn log_blank() {
    if log::log_enabled!(log::Level::Info) {
        eprintln!();
    }
}
