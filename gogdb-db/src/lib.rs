//! SQLite persistence layer for the product catalog.
//!
//! Provides schema creation, per-entity upsert and lookup operations, and
//! catalog-wide queries backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::OperationError;
pub use operations::build_products::{
    build_products_for_build, build_products_for_product, get_build_product,
    upsert_build_product, upsert_build_products,
};
pub use operations::builds::{
    builds_for_product, get_build, latest_build_for_product, upsert_build, upsert_builds,
};
pub use operations::dlcs::{
    count_installable_dlcs_for_parent, get_dlc_link, installable_dlcs_for_parent,
    remove_dlc_link, replace_dlc_links_for_parent, upsert_dlc_link, upsert_dlc_links,
};
pub use operations::import_log::insert_import_log;
pub use operations::installers::{
    find_installer, installers_for_product, upsert_installer, upsert_installers,
};
pub use operations::products::{
    find_product_by_slug, find_product_id_by_slug, get_product, product_ids_by_slugs,
    slugs_by_product_ids, upsert_product, upsert_products,
};
pub use queries::{CatalogStats, catalog_stats, list_import_logs};
pub use schema::{DEFAULT_BUSY_TIMEOUT, SchemaError, open_database, open_memory};
