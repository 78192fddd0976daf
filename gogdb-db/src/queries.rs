//! Cross-table read queries for the catalog database.

use gogdb_catalog::types::ImportLog;
use rusqlite::Connection;

use crate::operations::OperationError;

// ── Statistics ──────────────────────────────────────────────────────────────

/// Get overall catalog statistics.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let count = |sql: &str| -> Result<i64, OperationError> {
        Ok(conn.query_row(sql, [], |r| r.get(0))?)
    };

    Ok(CatalogStats {
        products: count("SELECT COUNT(*) FROM catalog_products")?,
        games: count("SELECT COUNT(*) FROM catalog_products WHERE type = 'game'")?,
        dlcs: count("SELECT COUNT(*) FROM catalog_products WHERE type = 'dlc'")?,
        packs: count("SELECT COUNT(*) FROM catalog_products WHERE type = 'pack'")?,
        builds: count("SELECT COUNT(*) FROM catalog_builds")?,
        installable_dlc_links: count(
            "SELECT COUNT(*) FROM catalog_dlcs WHERE installer_qty > 0",
        )?,
        installers: count("SELECT COUNT(*) FROM catalog_installers")?,
        build_products: count("SELECT COUNT(*) FROM catalog_build_products")?,
        imports: count("SELECT COUNT(*) FROM import_log")?,
    })
}

/// Summary statistics for the catalog.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub products: i64,
    pub games: i64,
    pub dlcs: i64,
    pub packs: i64,
    pub builds: i64,
    /// DLC entries with at least one installer (not summed installer counts).
    pub installable_dlc_links: i64,
    pub installers: i64,
    pub build_products: i64,
    pub imports: i64,
}

// ── Import Log Queries ──────────────────────────────────────────────────────

/// List recent import logs, newest first.
pub fn list_import_logs(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<ImportLog>, OperationError> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, source_type, source_name, imported_at, products, builds,
                installers, dlc_links, build_products, gen1_skipped, malformed_members
         FROM import_log ORDER BY imported_at DESC, id DESC LIMIT {limit}"
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(ImportLog {
            id: row.get(0)?,
            source_type: row.get(1)?,
            source_name: row.get(2)?,
            imported_at: row.get(3)?,
            products: row.get(4)?,
            builds: row.get(5)?,
            installers: row.get(6)?,
            dlc_links: row.get(7)?,
            build_products: row.get(8)?,
            gen1_skipped: row.get(9)?,
            malformed_members: row.get(10)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
