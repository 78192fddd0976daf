pub(crate) mod collate;
pub(crate) mod import;
pub(crate) mod stats;

use std::path::Path;

use rusqlite::Connection;

use crate::CliError;
use crate::settings::DatabaseSettings;

/// Open (or create) the catalog database at `path`.
pub(crate) fn open_catalog(path: &Path, db: &DatabaseSettings) -> Result<Connection, CliError> {
    gogdb_db::open_database(path, db.busy_timeout()).map_err(|e| {
        CliError::database(format!(
            "Failed to open catalog database at {}: {}",
            path.display(),
            e
        ))
    })
}
