//! Gen2 build contents, keyed on `(build_id, product_id)`.

use gogdb_catalog::types::BuildProduct;
use rusqlite::{Connection, params};

use super::{OperationError, optional_row};

/// Insert or update a build/product pairing.
pub fn upsert_build_product(conn: &Connection, row: &BuildProduct) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO catalog_build_products (build_id, product_id, product_name, temp_executable)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(build_id, product_id) DO UPDATE SET
             product_name = excluded.product_name,
             temp_executable = excluded.temp_executable",
        params![row.build_id, row.product_id, row.product_name, row.temp_executable],
    )?;
    Ok(())
}

/// Upsert each pairing in order.
pub fn upsert_build_products(
    conn: &Connection,
    rows: &[BuildProduct],
) -> Result<(), OperationError> {
    for row in rows {
        upsert_build_product(conn, row)?;
    }
    Ok(())
}

/// Find one pairing by its composite key.
pub fn get_build_product(
    conn: &Connection,
    build_id: i64,
    product_id: i64,
) -> Result<Option<BuildProduct>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT build_id, product_id, product_name, temp_executable
         FROM catalog_build_products WHERE build_id = ?1 AND product_id = ?2",
    )?;
    optional_row(stmt.query_row(params![build_id, product_id], row_to_build_product))
}

/// Products bundled into a build, ordered by product id.
pub fn build_products_for_build(
    conn: &Connection,
    build_id: i64,
) -> Result<Vec<BuildProduct>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT build_id, product_id, product_name, temp_executable
         FROM catalog_build_products WHERE build_id = ?1 ORDER BY product_id",
    )?;
    let rows = stmt.query_map(params![build_id], row_to_build_product)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Builds that bundle a product, ordered by build id.
pub fn build_products_for_product(
    conn: &Connection,
    product_id: i64,
) -> Result<Vec<BuildProduct>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT build_id, product_id, product_name, temp_executable
         FROM catalog_build_products WHERE product_id = ?1 ORDER BY build_id",
    )?;
    let rows = stmt.query_map(params![product_id], row_to_build_product)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_build_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<BuildProduct> {
    Ok(BuildProduct {
        build_id: row.get(0)?,
        product_id: row.get(1)?,
        product_name: row.get(2)?,
        temp_executable: row.get(3)?,
    })
}
