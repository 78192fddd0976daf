use gogdb_db::*;
use gogdb_import::*;
use serde_json::{Value, json};

fn count(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

fn game_manifest() -> Value {
    json!({
        "id": 1207658924,
        "type": "game",
        "slug": "unreal_gold",
        "title": "Unreal Gold",
        "global_date": "2008-08-26",
        "builds": [
            {"id": 51827, "product_id": 1207658924, "date_published": "2016-03-01T10:00:00+0000", "generation": 1, "os": "windows"},
            {"id": 51828, "product_id": 1207658924, "date_published": null, "generation": 2, "os": "windows"}
        ],
        "dl_installer": [
            {"id": "en1installer0", "language": {"code": "en-US"}, "os": "windows", "version": "2.2"}
        ]
    })
}

fn dlc_manifest(id: i64, parent: i64, installers: usize) -> Value {
    let dl_installer: Vec<Value> = (0..installers)
        .map(|i| json!({"id": format!("en1dlc{i}"), "os": "windows"}))
        .collect();
    json!({
        "id": id,
        "type": "dlc",
        "slug": format!("dlc_{id}"),
        "title": "Bonus Content",
        "requires": [parent],
        "dl_installer": dl_installer,
    })
}

// ── Product Manifests ───────────────────────────────────────────────────────

#[test]
fn import_game_fans_out_to_rows() {
    let conn = open_memory().unwrap();
    let mut stats = ImportStats::default();
    import_product_data(&conn, &game_manifest(), &mut stats).unwrap();

    assert_eq!(stats.products, 1);
    // The build without a publication date is skipped.
    assert_eq!(stats.builds, 1);
    assert_eq!(stats.installers, 1);
    assert_eq!(count(&conn, "catalog_products"), 1);
    assert_eq!(count(&conn, "catalog_builds"), 1);
    assert_eq!(count(&conn, "catalog_installers"), 1);
    assert_eq!(count(&conn, "catalog_dlcs"), 0);

    let product = get_product(&conn, 1207658924).unwrap().unwrap();
    assert_eq!(product.title, "Unreal Gold");
}

#[test]
fn filtered_products_write_nothing() {
    let conn = open_memory().unwrap();
    let mut stats = ImportStats::default();
    for data in [
        json!({"id": 1, "type": "game", "slug": "a", "title": "A", "store_state": "coming-soon",
               "builds": [{"id": 5, "date_published": "2020-01-01"}]}),
        json!({"id": 2, "type": "extras", "slug": "b", "title": "B"}),
        json!({"id": 3, "type": "game", "slug": "unreal_demo", "title": "Demo",
               "dl_installer": [{"id": "en1installer0"}]}),
    ] {
        import_product_data(&conn, &data, &mut stats).unwrap();
    }

    assert_eq!(stats.products_filtered, 3);
    assert_eq!(stats.products, 0);
    assert_eq!(count(&conn, "catalog_products"), 0);
    assert_eq!(count(&conn, "catalog_builds"), 0);
    assert_eq!(count(&conn, "catalog_installers"), 0);
}

#[test]
fn missing_identifying_key_is_an_error() {
    let conn = open_memory().unwrap();
    let mut stats = ImportStats::default();
    let data = json!({"id": 1, "type": "game", "title": "No Slug"});
    let err = import_product_data(&conn, &data, &mut stats).unwrap_err();
    assert!(matches!(err, ImportError::Extract(_)));
    assert_eq!(count(&conn, "catalog_products"), 0);
}

#[test]
fn reimport_is_idempotent() {
    let conn = open_memory().unwrap();
    let mut stats = ImportStats::default();
    import_product_data(&conn, &game_manifest(), &mut stats).unwrap();
    import_product_data(&conn, &game_manifest(), &mut stats).unwrap();

    assert_eq!(count(&conn, "catalog_products"), 1);
    assert_eq!(count(&conn, "catalog_builds"), 1);
    assert_eq!(count(&conn, "catalog_installers"), 1);
}

// ── DLC Retention ───────────────────────────────────────────────────────────

#[test]
fn installable_dlc_is_linked() {
    let conn = open_memory().unwrap();
    let mut stats = ImportStats::default();
    import_product_data(&conn, &dlc_manifest(200, 100, 2), &mut stats).unwrap();

    assert_eq!(stats.dlc_links, 1);
    let link = get_dlc_link(&conn, 200).unwrap().unwrap();
    assert_eq!(link.parent_id, 100);
    assert_eq!(link.installer_qty, 2);
    // The parent does not need to exist.
    assert!(get_product(&conn, 100).unwrap().is_none());
}

#[test]
fn dlc_losing_installers_loses_its_link() {
    let conn = open_memory().unwrap();
    let mut stats = ImportStats::default();
    import_product_data(&conn, &dlc_manifest(200, 100, 1), &mut stats).unwrap();
    import_product_data(&conn, &dlc_manifest(200, 100, 0), &mut stats).unwrap();

    assert_eq!(stats.dlc_links_dropped, 1);
    assert!(get_dlc_link(&conn, 200).unwrap().is_none());
    // The product row itself is kept.
    assert!(get_product(&conn, 200).unwrap().is_some());
}

#[test]
fn dlc_without_resolvable_parent_loses_its_link() {
    let conn = open_memory().unwrap();
    let mut stats = ImportStats::default();
    import_product_data(&conn, &dlc_manifest(200, 100, 1), &mut stats).unwrap();
    assert!(get_dlc_link(&conn, 200).unwrap().is_some());

    let mut orphaned = dlc_manifest(200, 100, 1);
    orphaned["requires"] = json!([]);
    import_product_data(&conn, &orphaned, &mut stats).unwrap();
    assert!(get_dlc_link(&conn, 200).unwrap().is_none());
    assert!(get_product(&conn, 200).unwrap().is_some());
}

#[test]
fn dlc_reclassified_as_game_loses_its_link() {
    let conn = open_memory().unwrap();
    let mut stats = ImportStats::default();
    import_product_data(&conn, &dlc_manifest(200, 100, 1), &mut stats).unwrap();

    let mut as_game = dlc_manifest(200, 100, 1);
    as_game["type"] = json!("game");
    import_product_data(&conn, &as_game, &mut stats).unwrap();

    assert!(get_dlc_link(&conn, 200).unwrap().is_none());
    let product = get_product(&conn, 200).unwrap().unwrap();
    assert_eq!(product.product_type, gogdb_catalog::ProductType::Game);
}

// ── Gen2 Build Manifests ────────────────────────────────────────────────────

#[test]
fn gen2_manifest_rows() {
    let conn = open_memory().unwrap();
    let mut stats = ImportStats::default();
    let data = json!({
        "version": 2,
        "buildId": "56391349421451347",
        "products": [
            {"productId": "1207658924", "name": "Unreal Gold", "temp_executable": "System/Unreal.exe"},
            {"name": "No id"},
            {"productId": 1207658925, "name": null}
        ]
    });
    import_build_data_gen2(&conn, &data, &mut stats).unwrap();

    assert_eq!(stats.gen2_manifests, 1);
    assert_eq!(stats.build_products, 2);
    let rows = build_products_for_build(&conn, 56391349421451347).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].temp_executable.as_deref(), Some("System/Unreal.exe"));
}

// ── Standalone Manifest Files ───────────────────────────────────────────────

#[test]
fn product_json_file_is_imported_and_logged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("product.json");
    std::fs::write(&path, game_manifest().to_string()).unwrap();

    let conn = open_memory().unwrap();
    let stats = import_product_json(&conn, &path).unwrap();
    assert_eq!(stats.products, 1);

    let logs = list_import_logs(&conn, None).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].source_type, "manifest");
    assert_eq!(logs[0].source_name, "product.json");
    assert_eq!(logs[0].products, 1);
}

#[test]
fn product_json_failure_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"id": 1, "type": "game", "slug": "a"}"#).unwrap();

    let conn = open_memory().unwrap();
    assert!(import_product_json(&conn, &path).is_err());
    assert_eq!(count(&conn, "catalog_products"), 0);
    assert_eq!(count(&conn, "import_log"), 0);
}

#[test]
fn malformed_standalone_json_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{not json").unwrap();

    let conn = open_memory().unwrap();
    let err = import_product_json(&conn, &path).unwrap_err();
    assert!(matches!(err, ImportError::Json { .. }));
}
