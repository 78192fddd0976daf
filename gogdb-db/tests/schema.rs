use gogdb_db::schema::{CURRENT_VERSION, create_schema};
use gogdb_db::{DEFAULT_BUSY_TIMEOUT, SchemaError, open_database, open_memory};
use tempfile::TempDir;

#[test]
fn create_schema_in_memory() {
    let conn = open_memory().unwrap();
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(version, CURRENT_VERSION);
}

#[test]
fn schema_is_idempotent() {
    let conn = open_memory().unwrap();
    // Creating again should not error
    create_schema(&conn).unwrap();
    let rows: i32 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn foreign_keys_are_advisory() {
    let conn = open_memory().unwrap();
    let fk: i32 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk, 0);

    // A build may arrive before its product.
    conn.execute(
        "INSERT INTO catalog_builds (id, product_id, date_published, generation) VALUES (1, 999, '2020-01-01', 2)",
        [],
    )
    .unwrap();
}

#[test]
fn all_tables_exist() {
    let conn = open_memory().unwrap();
    let tables = [
        "schema_version",
        "catalog_products",
        "catalog_builds",
        "catalog_dlcs",
        "catalog_installers",
        "catalog_build_products",
        "library_stores",
        "library_products",
        "artifact_fingerprints",
        "import_log",
    ];
    for table in tables {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "table '{}' should exist", table);
    }
}

#[test]
fn lookup_indexes_exist() {
    let conn = open_memory().unwrap();
    for index in ["idx_catalog_products_slug", "idx_catalog_builds_product_date"] {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='index' AND name=?1)",
                [index],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "index '{}' should exist", index);
    }
}

#[test]
fn open_database_creates_parent_and_reopens() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data").join("catalog.db");

    {
        let conn = open_database(&path, DEFAULT_BUSY_TIMEOUT).unwrap();
        conn.execute(
            "INSERT INTO catalog_products (id, type, slug, title, is_in_development) VALUES (1, 'game', 'a', 'A', 0)",
            [],
        )
        .unwrap();
    }

    let conn = open_database(&path, DEFAULT_BUSY_TIMEOUT).unwrap();
    let count: i32 = conn
        .query_row("SELECT COUNT(*) FROM catalog_products", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn newer_schema_is_refused() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    {
        let conn = open_database(&path, DEFAULT_BUSY_TIMEOUT).unwrap();
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_VERSION + 1],
        )
        .unwrap();
    }
    let err = open_database(&path, DEFAULT_BUSY_TIMEOUT).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::VersionMismatch { expected: CURRENT_VERSION, found } if found == CURRENT_VERSION + 1
    ));
}

#[test]
fn current_schema_reopens_without_new_version_rows() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    drop(open_database(&path, DEFAULT_BUSY_TIMEOUT).unwrap());

    let conn = open_database(&path, DEFAULT_BUSY_TIMEOUT).unwrap();
    let rows: i32 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}
