//! Catalog row types and JSON extraction for GOG product snapshots.
//!
//! This crate defines the persistent data model for the catalog without any
//! database dependencies. The extraction functions turn raw product and build
//! manifests into typed rows that `gogdb-db` can persist.

pub mod extract;
pub mod prefilter;
pub mod types;

pub use extract::{
    ExtractError, extract_build_product_rows, extract_build_rows, extract_dlc_link,
    extract_installer_rows, extract_product,
};
pub use prefilter::trim_product;
pub use types::*;
