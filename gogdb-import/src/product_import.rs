//! Import product manifests and gen2 build manifests into the catalog database.
//!
//! A product manifest fans out into a product row, an optional DLC link, and
//! its build and installer rows. A gen2 build manifest fans out into the
//! build/product pairings it lists.

use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use gogdb_catalog::extract::{
    self, ExtractError, extract_build_product_rows, extract_build_rows, extract_dlc_link,
    extract_installer_rows,
};
use gogdb_catalog::types::ImportLog;
use gogdb_db::operations::{self, OperationError};
use rusqlite::Connection;
use serde_json::Value;
use thiserror::Error;

use crate::source::SourceKind;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Unsupported source type (expected .json or .tar.xz): {0}")]
    UnsupportedSource(PathBuf),
    #[error("Cannot read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Statistics from one import (or several, summed).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub products: u64,
    pub products_filtered: u64,
    pub dlc_links: u64,
    pub dlc_links_dropped: u64,
    pub builds: u64,
    pub installers: u64,
    pub build_products: u64,
    pub gen2_manifests: u64,
    pub gen1_skipped: u64,
    pub malformed_members: u64,
    pub ignored_members: u64,
}

impl AddAssign<&ImportStats> for ImportStats {
    fn add_assign(&mut self, other: &ImportStats) {
        self.products += other.products;
        self.products_filtered += other.products_filtered;
        self.dlc_links += other.dlc_links;
        self.dlc_links_dropped += other.dlc_links_dropped;
        self.builds += other.builds;
        self.installers += other.installers;
        self.build_products += other.build_products;
        self.gen2_manifests += other.gen2_manifests;
        self.gen1_skipped += other.gen1_skipped;
        self.malformed_members += other.malformed_members;
        self.ignored_members += other.ignored_members;
    }
}

/// Import one already-parsed product manifest.
///
/// Filtered products write nothing. A missing identifying key fails the call;
/// the caller's transaction decides what that rolls back.
pub fn import_product_data(
    conn: &Connection,
    data: &Value,
    stats: &mut ImportStats,
) -> Result<(), ImportError> {
    let Some(product) = extract::extract_product(data)? else {
        stats.products_filtered += 1;
        return Ok(());
    };
    let dlc_link = extract_dlc_link(data)?;
    let builds = extract_build_rows(data);
    let installers = extract_installer_rows(data);

    operations::products::upsert_product(conn, &product)?;
    stats.products += 1;

    match dlc_link {
        Some(link) if link.is_installable() => {
            operations::dlcs::upsert_dlc_link(conn, &link)?;
            stats.dlc_links += 1;
        }
        Some(link) => {
            // Non-installable DLC keep their product row but no link.
            if operations::dlcs::remove_dlc_link(conn, link.dlc_id)? {
                log::debug!("Removed stale link for non-installable DLC {}", link.dlc_id);
            }
            stats.dlc_links_dropped += 1;
        }
        None => {
            // Not a DLC, or its parent is unresolvable.
            if operations::dlcs::remove_dlc_link(conn, product.id)? {
                log::debug!("Removed stale DLC link for product {}", product.id);
            }
        }
    }

    operations::builds::upsert_builds(conn, &builds)?;
    stats.builds += builds.len() as u64;

    operations::installers::upsert_installers(conn, &installers)?;
    stats.installers += installers.len() as u64;

    Ok(())
}

/// Import one gen2 build manifest (`buildId` must already be present).
pub fn import_build_data_gen2(
    conn: &Connection,
    data: &Value,
    stats: &mut ImportStats,
) -> Result<(), ImportError> {
    let rows = extract_build_product_rows(data);
    operations::build_products::upsert_build_products(conn, &rows)?;
    stats.gen2_manifests += 1;
    stats.build_products += rows.len() as u64;
    Ok(())
}

/// Import a standalone product manifest file in its own transaction.
pub fn import_product_json(conn: &Connection, json_path: &Path) -> Result<ImportStats, ImportError> {
    let contents = std::fs::read_to_string(json_path)?;
    let data: Value = serde_json::from_str(&contents).map_err(|source| ImportError::Json {
        path: json_path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Importing product ID {} from {}",
        data.get("id").unwrap_or(&Value::Null),
        json_path.display()
    );

    let mut stats = ImportStats::default();
    let tx = conn.unchecked_transaction()?;
    import_product_data(&tx, &data, &mut stats)?;
    log_import(&tx, SourceKind::Manifest, json_path, &stats)?;
    tx.commit()?;

    Ok(stats)
}

/// Log an import run in the import_log table.
pub fn log_import(
    conn: &Connection,
    kind: SourceKind,
    source: &Path,
    stats: &ImportStats,
) -> Result<i64, ImportError> {
    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    let entry = ImportLog {
        id: 0,
        source_type: kind.as_str().to_string(),
        source_name,
        imported_at: chrono::Utc::now().to_rfc3339(),
        products: stats.products as i64,
        builds: stats.builds as i64,
        installers: stats.installers as i64,
        dlc_links: stats.dlc_links as i64,
        build_products: stats.build_products as i64,
        gen1_skipped: stats.gen1_skipped as i64,
        malformed_members: stats.malformed_members as i64,
    };
    let id = operations::import_log::insert_import_log(conn, &entry)?;
    Ok(id)
}
