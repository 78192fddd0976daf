//! Trimming of product manifests down to the fields the importer reads.
//!
//! Full snapshot manifests carry descriptions, screenshots, localisations and
//! every platform's builds. The trimmed form keeps games and DLC that are on
//! sale and carry a build list, the identifying fields, the installer list,
//! and Windows builds only:
//!
//! ```text
//! {type, title, slug, id, image_boxart, global_date, is_in_development,
//!  dl_installer, builds: [{id, date_published, version, generation}]}
//! ```
//!
//! Trimmed records are valid input for [`crate::extract`].

use serde_json::{Map, Value};

use crate::types::ProductType;

const KEPT_FIELDS: [&str; 8] = [
    "type",
    "title",
    "slug",
    "id",
    "image_boxart",
    "global_date",
    "is_in_development",
    "dl_installer",
];

const KEPT_BUILD_FIELDS: [&str; 4] = ["id", "date_published", "version", "generation"];

const BUILD_OS: &str = "windows";

/// Trim a product manifest, or return `None` if it is filtered out.
pub fn trim_product(data: &Value) -> Option<Value> {
    let kind = data.get("type").and_then(Value::as_str)?;
    if kind != ProductType::Game.as_str() && kind != ProductType::Dlc.as_str() {
        return None;
    }
    if data.get("store_state").and_then(Value::as_str) == Some("coming-soon") {
        return None;
    }

    // A record whose build list is absent, null or not a list has nothing to trim.
    let builds = data.get("builds").and_then(Value::as_array)?;

    let mut out = project(data, &KEPT_FIELDS);
    let builds = builds
        .iter()
        .filter(|b| b.get("os").and_then(Value::as_str) == Some(BUILD_OS))
        .map(|b| Value::Object(project(b, &KEPT_BUILD_FIELDS)))
        .collect();
    out.insert("builds".to_string(), Value::Array(builds));

    Some(Value::Object(out))
}

/// Copy `fields` out of `source`, filling absent ones with `null`.
fn project(source: &Value, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .map(|&field| {
            let value = source.get(field).cloned().unwrap_or(Value::Null);
            (field.to_string(), value)
        })
        .collect()
}
