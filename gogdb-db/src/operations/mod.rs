//! Insert-or-update and lookup operations, one module per catalog entity.
//!
//! Every upsert names its conflict target and the exact set of columns it
//! overwrites; key columns are never part of the update set.

pub mod build_products;
pub mod builds;
pub mod dlcs;
pub mod import_log;
pub mod installers;
pub mod products;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Collapse "no rows" into `None` for single-row lookups.
pub(crate) fn optional_row<T>(result: rusqlite::Result<T>) -> Result<Option<T>, OperationError> {
    match result {
        Ok(row) => Ok(Some(row)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
