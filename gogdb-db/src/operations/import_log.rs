use gogdb_catalog::types::ImportLog;
use rusqlite::{Connection, params};

use super::OperationError;

/// Insert an import log entry. Returns the generated ID.
pub fn insert_import_log(conn: &Connection, log: &ImportLog) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_log (source_type, source_name, imported_at, products, builds,
             installers, dlc_links, build_products, gen1_skipped, malformed_members)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            log.source_type,
            log.source_name,
            log.imported_at,
            log.products,
            log.builds,
            log.installers,
            log.dlc_links,
            log.build_products,
            log.gen1_skipped,
            log.malformed_members,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
