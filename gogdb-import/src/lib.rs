//! Import GOG catalog snapshots into the catalog database.
//!
//! This crate owns the ETL drivers: reading standalone product manifests and
//! `.tar.xz` snapshot archives, classifying archive members, running the
//! extraction layer from `gogdb-catalog`, and writing rows through `gogdb-db`.
//! Every top-level source is imported inside its own transaction.

pub mod archive;
pub mod product_import;
pub mod progress;
pub mod source;

pub use archive::{MemberKind, classify_member, collate_archive, import_archive};
pub use product_import::{
    ImportError, ImportStats, import_build_data_gen2, import_product_data, import_product_json,
    log_import,
};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use source::{SourceKind, import_sources, validate_sources};
