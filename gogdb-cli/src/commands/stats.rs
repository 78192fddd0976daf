use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::CliError;
use crate::settings::DatabaseSettings;

use super::open_catalog;

pub(crate) fn run_stats(db_path: &Path, db: &DatabaseSettings, limit: u32) -> Result<(), CliError> {
    if !db_path.exists() {
        log::warn!("No catalog database found at {}", db_path.display());
        log::info!("Run 'gogdb-ingest import <SOURCES>' to create one.");
        return Ok(());
    }

    let conn = open_catalog(db_path, db)?;

    let stats = gogdb_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))?;

    log::info!(
        "{}",
        "Catalog Database Statistics".if_supports_color(Stderr, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("  Products:       {:>8}", stats.products);
    log::info!("    Games:        {:>8}", stats.games);
    log::info!("    DLC:          {:>8}", stats.dlcs);
    log::info!("    Packs:        {:>8}", stats.packs);
    log::info!("  Builds:         {:>8}", stats.builds);
    log::info!("  Installers:     {:>8}", stats.installers);
    log::info!("  DLC links:      {:>8} (installable)", stats.installable_dlc_links);
    log::info!("  Build products: {:>8}", stats.build_products);
    log::info!("  Imports:        {:>8}", stats.imports);

    let logs = gogdb_db::list_import_logs(&conn, Some(limit))
        .map_err(|e| CliError::database(format!("Failed to read import log: {}", e)))?;
    if logs.is_empty() {
        return Ok(());
    }

    crate::log_blank();
    log::info!("{}", "Recent Imports".if_supports_color(Stderr, |t| t.bold()));
    for entry in &logs {
        log::info!(
            "  {}  {:<8} {}  ({} products, {} builds, {} installers, {} gen1 skipped, {} malformed)",
            entry.imported_at,
            entry.source_type,
            entry.source_name,
            entry.products,
            entry.builds,
            entry.installers,
            entry.gen1_skipped,
            entry.malformed_members,
        );
    }

    Ok(())
}
