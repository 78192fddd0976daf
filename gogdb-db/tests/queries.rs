use gogdb_catalog::types::*;
use gogdb_db::*;

fn product(id: i64, product_type: ProductType, slug: &str) -> Product {
    Product {
        id,
        product_type,
        slug: slug.to_string(),
        title: slug.replace('_', " "),
        global_date: None,
        is_in_development: false,
        image_boxart: None,
    }
}

fn build(id: i64, product_id: i64, date: &str) -> Build {
    Build {
        id,
        product_id,
        date_published: date.to_string(),
        generation: 2,
        version: None,
        legacy_build_id: None,
        os: Some("windows".to_string()),
    }
}

fn setup_db() -> rusqlite::Connection {
    let conn = open_memory().unwrap();
    upsert_products(
        &conn,
        &[
            product(1, ProductType::Game, "witcher"),
            product(2, ProductType::Dlc, "witcher_soundtrack"),
            product(3, ProductType::Pack, "witcher_collection"),
            // Slugs are not unique across the catalog.
            product(4, ProductType::Game, "witcher"),
        ],
    )
    .unwrap();
    conn
}

// ── Product Lookups ─────────────────────────────────────────────────────────

#[test]
fn find_by_slug() {
    let conn = setup_db();
    let found = find_product_by_slug(&conn, "witcher_soundtrack").unwrap().unwrap();
    assert_eq!(found.id, 2);
    assert_eq!(found.product_type, ProductType::Dlc);

    assert_eq!(find_product_id_by_slug(&conn, "witcher").unwrap(), Some(1));
    assert_eq!(find_product_id_by_slug(&conn, "missing").unwrap(), None);
}

#[test]
fn ids_by_slugs_groups_duplicates() {
    let conn = setup_db();
    let mapping =
        product_ids_by_slugs(&conn, &["witcher", "witcher_collection", "missing", "witcher"])
            .unwrap();
    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping["witcher"], vec![1, 4]);
    assert_eq!(mapping["witcher_collection"], vec![3]);
    assert!(product_ids_by_slugs(&conn, &[]).unwrap().is_empty());
}

#[test]
fn slugs_by_ids() {
    let conn = setup_db();
    let mapping = slugs_by_product_ids(&conn, &[2, 3, 99]).unwrap();
    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping[&2], "witcher_soundtrack");
    assert_eq!(mapping[&3], "witcher_collection");
}

// ── Build Lookups ───────────────────────────────────────────────────────────

#[test]
fn latest_build_is_newest_by_publication_date() {
    let conn = setup_db();
    upsert_builds(
        &conn,
        &[
            build(10, 1, "2021-01-01"),
            build(11, 1, "2023-05-05"),
            build(12, 4, "2024-01-01"),
        ],
    )
    .unwrap();

    let latest = latest_build_for_product(&conn, 1).unwrap().unwrap();
    assert_eq!(latest.id, 11);
    assert_eq!(latest.date_published, "2023-05-05");

    let all: Vec<i64> = builds_for_product(&conn, 1)
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(all, vec![11, 10]);

    assert!(latest_build_for_product(&conn, 2).unwrap().is_none());
}

// ── Statistics ──────────────────────────────────────────────────────────────

#[test]
fn catalog_stats_counts_tables() {
    let conn = setup_db();
    upsert_build(&conn, &build(10, 1, "2021-01-01")).unwrap();
    upsert_dlc_links(
        &conn,
        &[
            DlcLink { dlc_id: 2, parent_id: 1, installer_qty: 4 },
            DlcLink { dlc_id: 5, parent_id: 1, installer_qty: 0 },
        ],
    )
    .unwrap();

    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.products, 4);
    assert_eq!(stats.games, 2);
    assert_eq!(stats.dlcs, 1);
    assert_eq!(stats.packs, 1);
    assert_eq!(stats.builds, 1);
    assert_eq!(stats.installable_dlc_links, 1);
    assert_eq!(stats.installers, 0);
    assert_eq!(stats.imports, 0);
}

// ── Import Log Queries ──────────────────────────────────────────────────────

#[test]
fn import_logs_newest_first() {
    let conn = open_memory().unwrap();
    for (name, at) in [
        ("old.tar.xz", "2024-01-01T00:00:00+00:00"),
        ("new.tar.xz", "2024-02-01T00:00:00+00:00"),
    ] {
        insert_import_log(
            &conn,
            &ImportLog {
                source_type: "archive".to_string(),
                source_name: name.to_string(),
                imported_at: at.to_string(),
                ..Default::default()
            },
        )
        .unwrap();
    }

    let logs = list_import_logs(&conn, None).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].source_name, "new.tar.xz");

    let limited = list_import_logs(&conn, Some(1)).unwrap();
    assert_eq!(limited.len(), 1);
}
