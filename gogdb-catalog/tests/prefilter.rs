use gogdb_catalog::{extract_build_rows, extract_product, trim_product};
use serde_json::json;

#[test]
fn keeps_windows_builds_only() {
    let data = json!({
        "id": 1, "type": "game", "slug": "witcher", "title": "The Witcher",
        "description": "long text", "screenshots": ["a", "b"],
        "builds": [
            {"id": 10, "os": "windows", "date_published": "2020-01-01", "version": "1.5", "generation": 2, "tags": []},
            {"id": 11, "os": "osx", "date_published": "2020-01-02"}
        ]
    });
    let trimmed = trim_product(&data).unwrap();

    assert!(trimmed.get("description").is_none());
    assert!(trimmed.get("screenshots").is_none());
    assert_eq!(trimmed["image_boxart"], serde_json::Value::Null);

    let builds = trimmed["builds"].as_array().unwrap();
    assert_eq!(builds.len(), 1);
    assert_eq!(
        builds[0],
        json!({"id": 10, "date_published": "2020-01-01", "version": "1.5", "generation": 2})
    );
}

#[test]
fn drops_unsold_and_other_kinds() {
    let coming = json!({"id": 1, "type": "game", "store_state": "coming-soon"});
    assert!(trim_product(&coming).is_none());

    let pack = json!({"id": 1, "type": "pack"});
    assert!(trim_product(&pack).is_none());

    let untyped = json!({"id": 1});
    assert!(trim_product(&untyped).is_none());
}

#[test]
fn missing_or_null_build_list_drops_the_record() {
    let absent = json!({"id": 2, "type": "dlc", "slug": "ost", "title": "OST"});
    assert!(trim_product(&absent).is_none());

    let null = json!({"id": 2, "type": "dlc", "slug": "ost", "title": "OST", "builds": null});
    assert!(trim_product(&null).is_none());
}

#[test]
fn empty_build_list_is_kept() {
    let data = json!({"id": 2, "type": "dlc", "slug": "ost", "title": "OST", "builds": []});
    let trimmed = trim_product(&data).unwrap();
    assert_eq!(trimmed["builds"], json!([]));

    let mac_only = json!({"id": 4, "type": "game", "slug": "m", "title": "M",
                          "builds": [{"id": 40, "os": "osx"}]});
    assert_eq!(trim_product(&mac_only).unwrap()["builds"], json!([]));
}

#[test]
fn trimmed_record_still_extracts() {
    let data = json!({
        "id": 3, "type": "game", "slug": "gwent", "title": "Gwent",
        "builds": [{"id": 30, "os": "windows", "date_published": "2021-01-01"}]
    });
    let trimmed = trim_product(&data).unwrap();
    let product = extract_product(&trimmed).unwrap().unwrap();
    assert_eq!(product.id, 3);
    let builds = extract_build_rows(&trimmed);
    assert_eq!(builds.len(), 1);
    assert_eq!(builds[0].generation, 0);
    assert!(builds[0].os.is_none());
}
