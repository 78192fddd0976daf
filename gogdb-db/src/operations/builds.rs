//! Build rows, keyed on the build id.

use gogdb_catalog::types::Build;
use rusqlite::{Connection, params};

use super::{OperationError, optional_row};

const BUILD_COLUMNS: &str =
    "id, product_id, date_published, generation, version, legacy_build_id, os";

/// Insert or update a build.
pub fn upsert_build(conn: &Connection, build: &Build) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO catalog_builds (id, product_id, date_published, generation, version, legacy_build_id, os)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
             product_id = excluded.product_id,
             date_published = excluded.date_published,
             generation = excluded.generation,
             version = excluded.version,
             legacy_build_id = excluded.legacy_build_id,
             os = excluded.os",
        params![
            build.id,
            build.product_id,
            build.date_published,
            build.generation,
            build.version,
            build.legacy_build_id,
            build.os,
        ],
    )?;
    Ok(())
}

/// Upsert each build in order.
pub fn upsert_builds(conn: &Connection, builds: &[Build]) -> Result<(), OperationError> {
    for build in builds {
        upsert_build(conn, build)?;
    }
    Ok(())
}

/// Find a build by id.
pub fn get_build(conn: &Connection, id: i64) -> Result<Option<Build>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BUILD_COLUMNS} FROM catalog_builds WHERE id = ?1"
    ))?;
    optional_row(stmt.query_row(params![id], row_to_build))
}

/// The most recently published build of a product.
///
/// Served by the `(product_id, date_published DESC)` index.
pub fn latest_build_for_product(
    conn: &Connection,
    product_id: i64,
) -> Result<Option<Build>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BUILD_COLUMNS} FROM catalog_builds
         WHERE product_id = ?1
         ORDER BY date_published DESC
         LIMIT 1"
    ))?;
    optional_row(stmt.query_row(params![product_id], row_to_build))
}

/// All builds of a product, newest first.
pub fn builds_for_product(
    conn: &Connection,
    product_id: i64,
) -> Result<Vec<Build>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BUILD_COLUMNS} FROM catalog_builds
         WHERE product_id = ?1
         ORDER BY date_published DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![product_id], row_to_build)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_build(row: &rusqlite::Row<'_>) -> rusqlite::Result<Build> {
    Ok(Build {
        id: row.get(0)?,
        product_id: row.get(1)?,
        date_published: row.get(2)?,
        generation: row.get(3)?,
        version: row.get(4)?,
        legacy_build_id: row.get(5)?,
        os: row.get(6)?,
    })
}
