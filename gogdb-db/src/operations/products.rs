//! Product rows, keyed on the catalog product id.

use std::collections::HashMap;

use gogdb_catalog::types::{Product, ProductType};
use rusqlite::{Connection, params, params_from_iter};

use super::{OperationError, optional_row};

const PRODUCT_COLUMNS: &str =
    "id, type, slug, title, global_date, is_in_development, image_boxart";

/// Insert or update a product.
pub fn upsert_product(conn: &Connection, product: &Product) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO catalog_products (id, type, slug, title, global_date, is_in_development, image_boxart)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
             type = excluded.type,
             slug = excluded.slug,
             title = excluded.title,
             global_date = excluded.global_date,
             is_in_development = excluded.is_in_development,
             image_boxart = excluded.image_boxart",
        params![
            product.id,
            product.product_type.as_str(),
            product.slug,
            product.title,
            product.global_date,
            product.is_in_development,
            product.image_boxart,
        ],
    )?;
    Ok(())
}

/// Upsert each product in order.
pub fn upsert_products(conn: &Connection, products: &[Product]) -> Result<(), OperationError> {
    for product in products {
        upsert_product(conn, product)?;
    }
    Ok(())
}

/// Find a product by id.
pub fn get_product(conn: &Connection, id: i64) -> Result<Option<Product>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM catalog_products WHERE id = ?1"
    ))?;
    optional_row(stmt.query_row(params![id], row_to_product))
}

/// Find a product by slug. Slugs are not unique; the lowest id wins.
pub fn find_product_by_slug(
    conn: &Connection,
    slug: &str,
) -> Result<Option<Product>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM catalog_products WHERE slug = ?1 ORDER BY id LIMIT 1"
    ))?;
    optional_row(stmt.query_row(params![slug], row_to_product))
}

/// Find a product id by slug.
pub fn find_product_id_by_slug(
    conn: &Connection,
    slug: &str,
) -> Result<Option<i64>, OperationError> {
    let mut stmt =
        conn.prepare("SELECT id FROM catalog_products WHERE slug = ?1 ORDER BY id LIMIT 1")?;
    optional_row(stmt.query_row(params![slug], |row| row.get(0)))
}

/// Map each known slug to every product id carrying it.
///
/// Slugs with no product are absent from the result.
pub fn product_ids_by_slugs(
    conn: &Connection,
    slugs: &[&str],
) -> Result<HashMap<String, Vec<i64>>, OperationError> {
    let mut unique: Vec<&str> = slugs.to_vec();
    unique.sort_unstable();
    unique.dedup();
    if unique.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        "SELECT slug, id FROM catalog_products WHERE slug IN ({}) ORDER BY id",
        placeholders(unique.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(unique), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut mapping: HashMap<String, Vec<i64>> = HashMap::new();
    for row in rows {
        let (slug, id) = row?;
        mapping.entry(slug).or_default().push(id);
    }
    Ok(mapping)
}

/// Map each known product id to its slug.
pub fn slugs_by_product_ids(
    conn: &Connection,
    ids: &[i64],
) -> Result<HashMap<i64, String>, OperationError> {
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    if unique.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        "SELECT id, slug FROM catalog_products WHERE id IN ({})",
        placeholders(unique.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(unique), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    rows.collect::<Result<HashMap<_, _>, _>>().map_err(Into::into)
}

fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}

pub(crate) fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    let type_str: String = row.get(1)?;
    let product_type = ProductType::parse(&type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown product type '{type_str}'").into(),
        )
    })?;
    Ok(Product {
        id: row.get(0)?,
        product_type,
        slug: row.get(2)?,
        title: row.get(3)?,
        global_date: row.get(4)?,
        is_in_development: row.get(5)?,
        image_boxart: row.get(6)?,
    })
}
