//! Installer rows, keyed on `(product_id, installer_id)`.

use gogdb_catalog::types::Installer;
use rusqlite::{Connection, params};

use super::{OperationError, optional_row};

/// Insert or update an installer. The surrogate `id` is ignored on write.
pub fn upsert_installer(conn: &Connection, installer: &Installer) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO catalog_installers (product_id, installer_id, language, os, version)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(product_id, installer_id) DO UPDATE SET
             language = excluded.language,
             os = excluded.os,
             version = excluded.version",
        params![
            installer.product_id,
            installer.installer_id,
            installer.language,
            installer.os,
            installer.version,
        ],
    )?;
    Ok(())
}

/// Upsert each installer in order.
pub fn upsert_installers(
    conn: &Connection,
    installers: &[Installer],
) -> Result<(), OperationError> {
    for installer in installers {
        upsert_installer(conn, installer)?;
    }
    Ok(())
}

/// Find an installer by its natural key.
pub fn find_installer(
    conn: &Connection,
    product_id: i64,
    installer_id: &str,
) -> Result<Option<Installer>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, product_id, installer_id, language, os, version
         FROM catalog_installers WHERE product_id = ?1 AND installer_id = ?2",
    )?;
    optional_row(stmt.query_row(params![product_id, installer_id], row_to_installer))
}

/// All installers of a product, ordered by installer id.
pub fn installers_for_product(
    conn: &Connection,
    product_id: i64,
) -> Result<Vec<Installer>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, product_id, installer_id, language, os, version
         FROM catalog_installers WHERE product_id = ?1 ORDER BY installer_id",
    )?;
    let rows = stmt.query_map(params![product_id], row_to_installer)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_installer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Installer> {
    Ok(Installer {
        id: Some(row.get(0)?),
        product_id: row.get(1)?,
        installer_id: row.get(2)?,
        language: row.get(3)?,
        os: row.get(4)?,
        version: row.get(5)?,
    })
}
