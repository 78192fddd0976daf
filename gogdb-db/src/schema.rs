//! SQLite schema creation and version checks.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error creating database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported schema version: expected {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Default bounded wait when another process holds the write lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Create all tables and indexes if they don't exist.
///
/// Idempotent; an existing database is left as is.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    if get_schema_version(conn)? < CURRENT_VERSION {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a catalog database at the given path.
///
/// The parent directory is created if needed. Foreign keys stay disabled:
/// snapshot order can reference a product before its own manifest arrives.
pub fn open_database(path: &Path, busy_timeout: Duration) -> Result<Connection, SchemaError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=OFF;")?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        create_schema(&conn)?;
    } else {
        check_version(version)?;
    }
    log::debug!("Opened catalog database {} (schema v{})", path.display(), CURRENT_VERSION);

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=OFF;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Accept only databases at `CURRENT_VERSION`. No older versions exist to
/// upgrade from; a database written by a newer build is refused.
fn check_version(found: i32) -> Result<(), SchemaError> {
    if found != CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found,
        });
    }
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Games, DLC and packs
CREATE TABLE IF NOT EXISTS catalog_products (
    id INTEGER PRIMARY KEY,
    type TEXT NOT NULL,
    slug TEXT NOT NULL,
    title TEXT NOT NULL,
    global_date TEXT,
    is_in_development BOOLEAN NOT NULL DEFAULT 0,
    image_boxart TEXT
);
CREATE INDEX IF NOT EXISTS idx_catalog_products_slug ON catalog_products(slug);

-- Published builds (references are advisory, foreign keys stay off)
CREATE TABLE IF NOT EXISTS catalog_builds (
    id INTEGER PRIMARY KEY,
    product_id INTEGER NOT NULL REFERENCES catalog_products(id),
    date_published TEXT NOT NULL,
    generation INTEGER NOT NULL DEFAULT 0,
    version TEXT,
    legacy_build_id INTEGER,
    os TEXT
);
CREATE INDEX IF NOT EXISTS idx_catalog_builds_product_date
    ON catalog_builds(product_id, date_published DESC);

-- DLC -> base game links, installable DLC only
CREATE TABLE IF NOT EXISTS catalog_dlcs (
    dlc_id INTEGER PRIMARY KEY REFERENCES catalog_products(id),
    parent_id INTEGER NOT NULL REFERENCES catalog_products(id),
    installer_qty INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_catalog_dlcs_parent ON catalog_dlcs(parent_id);

-- Downloadable installers
CREATE TABLE IF NOT EXISTS catalog_installers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES catalog_products(id),
    installer_id TEXT NOT NULL,
    language TEXT,
    os TEXT,
    version TEXT,
    UNIQUE(product_id, installer_id)
);

-- Products bundled into a gen2 build
CREATE TABLE IF NOT EXISTS catalog_build_products (
    build_id INTEGER NOT NULL,
    product_id INTEGER NOT NULL REFERENCES catalog_products(id),
    product_name TEXT,
    temp_executable TEXT,
    PRIMARY KEY (build_id, product_id)
);
CREATE INDEX IF NOT EXISTS idx_catalog_build_products_product
    ON catalog_build_products(product_id);

-- Local library locations
CREATE TABLE IF NOT EXISTS library_stores (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    path TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS library_products (
    id INTEGER PRIMARY KEY,
    store_id INTEGER NOT NULL REFERENCES library_stores(id),
    product_id INTEGER NOT NULL REFERENCES catalog_products(id),
    last_updated TEXT,
    UNIQUE(store_id, product_id)
);

-- Executable fingerprints
CREATE TABLE IF NOT EXISTS artifact_fingerprints (
    id INTEGER PRIMARY KEY,
    hash_type TEXT NOT NULL,
    hash_value TEXT NOT NULL,
    exe_size_bytes INTEGER NOT NULL,
    pe_product_name TEXT,
    pe_product_version TEXT,
    sig_timestamp TEXT,
    UNIQUE(hash_type, hash_value)
);

-- Import tracking
CREATE TABLE IF NOT EXISTS import_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_type TEXT NOT NULL,
    source_name TEXT NOT NULL,
    imported_at TEXT NOT NULL,
    products INTEGER NOT NULL DEFAULT 0,
    builds INTEGER NOT NULL DEFAULT 0,
    installers INTEGER NOT NULL DEFAULT 0,
    dlc_links INTEGER NOT NULL DEFAULT 0,
    build_products INTEGER NOT NULL DEFAULT 0,
    gen1_skipped INTEGER NOT NULL DEFAULT 0,
    malformed_members INTEGER NOT NULL DEFAULT 0
);
"#;
