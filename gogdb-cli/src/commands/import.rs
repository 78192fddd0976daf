use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use gogdb_import::{ImportStats, import_sources, validate_sources};

use crate::CliError;
use crate::logging::LogContext;
use crate::settings::DatabaseSettings;
use crate::spinner::ImportSpinner;

use super::open_catalog;

/// Import snapshot archives and product manifests into the catalog database.
pub(crate) fn run_import(
    sources: &[PathBuf],
    db_path: &Path,
    db: &DatabaseSettings,
    log_ctx: &LogContext,
    quiet: bool,
) -> Result<(), CliError> {
    // Reject bad paths before the database is touched.
    validate_sources(sources)?;

    let conn = open_catalog(db_path, db)?;

    log::info!(
        "{}",
        format!(
            "Importing {} source(s) into {}",
            sources.len(),
            db_path.display()
        )
        .if_supports_color(Stderr, |t| t.bold()),
    );

    let spinner = ImportSpinner::new(quiet, log_ctx);
    let result = import_sources(&conn, sources, Some(&spinner));
    spinner.finish();
    let stats = result?;

    crate::log_blank();
    log_summary(&stats);
    Ok(())
}

fn log_summary(stats: &ImportStats) {
    log::info!("{}", "Import complete".if_supports_color(Stderr, |t| t.bold()));
    log::info!("  Products:        {:>8}", stats.products);
    log::info!("  Filtered:        {:>8}", stats.products_filtered);
    log::info!("  Builds:          {:>8}", stats.builds);
    log::info!("  Installers:      {:>8}", stats.installers);
    log::info!(
        "  DLC links:       {:>8} ({} not installable)",
        stats.dlc_links,
        stats.dlc_links_dropped
    );
    log::info!(
        "  Build products:  {:>8} (from {} gen2 manifests)",
        stats.build_products,
        stats.gen2_manifests
    );
    log::info!("  Gen1 skipped:    {:>8}", stats.gen1_skipped);
    if stats.malformed_members > 0 {
        log::warn!(
            "  {} Malformed members: {}",
            "\u{26A0}".if_supports_color(Stderr, |t| t.yellow()),
            stats.malformed_members
        );
    }
    log::debug!("  Ignored members: {:>8}", stats.ignored_members);
}
