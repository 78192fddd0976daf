//! Extraction of typed catalog rows from raw snapshot JSON.
//!
//! Snapshot manifests are loosely shaped: keys go missing, numbers arrive as
//! strings, lists arrive as `null`. Every function here reads only the keys it
//! needs and coerces them permissively. Only a product manifest missing one of
//! its identifying keys is an error; everything else degrades to "skip this
//! entry" with a log line.
//!
//! Two manifest shapes are understood:
//! ```text
//! product.json            {"id", "type", "slug", "title", "builds": [..], "dl_installer": [..], ...}
//! <build id>.json (v2)    {"version": 2, "buildId", "products": [{"productId", "name", ...}]}
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::types::{Build, BuildProduct, DlcLink, Installer, Product, ProductType};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("product manifest missing required key: {field}")]
    MissingField { field: &'static str },
    #[error("product manifest key '{field}' has unusable value: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Store state of products announced but not yet purchasable.
const COMING_SOON: &str = "coming-soon";

/// Slug suffix used for demo versions of a game.
const DEMO_SUFFIX: &str = "_demo";

// ── Products ────────────────────────────────────────────────────────────────

/// Extract the product row from a product manifest.
///
/// Returns `Ok(None)` for items the catalog does not keep: coming-soon
/// products, types other than game/dlc/pack, and demos.
///
/// # Examples
///
/// ```
/// use gogdb_catalog::extract::extract_product;
/// use serde_json::json;
///
/// let data = json!({"id": 1207658924, "type": "game", "slug": "unreal_gold", "title": "Unreal Gold"});
/// let product = extract_product(&data).unwrap().unwrap();
/// assert_eq!(product.slug, "unreal_gold");
/// assert!(!product.is_in_development);
///
/// let demo = json!({"id": 1, "type": "game", "slug": "unreal_demo", "title": "Unreal Demo"});
/// assert!(extract_product(&demo).unwrap().is_none());
/// ```
pub fn extract_product(data: &Value) -> Result<Option<Product>, ExtractError> {
    if data.get("store_state").and_then(Value::as_str) == Some(COMING_SOON) {
        return Ok(None);
    }
    let Some(product_type) = data.get("type").and_then(Value::as_str).and_then(ProductType::parse)
    else {
        return Ok(None);
    };

    let id = require_int(data, "id")?;
    let slug = require_string(data, "slug")?;
    let title = require_string(data, "title")?;

    if slug.ends_with(DEMO_SUFFIX) {
        return Ok(None);
    }

    Ok(Some(Product {
        id,
        product_type,
        slug,
        title,
        global_date: optional_string(data.get("global_date")),
        is_in_development: data.get("is_in_development").is_some_and(truthy),
        image_boxart: optional_string(data.get("image_boxart")),
    }))
}

// ── DLC Links ───────────────────────────────────────────────────────────────

/// Extract the DLC → parent link declared by a DLC manifest.
///
/// The parent is the first entry of `requires`. `installer_qty` counts the
/// manifest's installers, zero included; filtering on it is left to storage.
pub fn extract_dlc_link(data: &Value) -> Result<Option<DlcLink>, ExtractError> {
    if data.get("type").and_then(Value::as_str) != Some(ProductType::Dlc.as_str()) {
        return Ok(None);
    }
    let dlc_id = require_int(data, "id")?;

    let Some(first) = list(data.get("requires")).first() else {
        log::debug!("DLC {dlc_id} declares no parent product");
        return Ok(None);
    };
    let Some(parent_id) = coerce_int(first) else {
        log::debug!("DLC {dlc_id} has unresolvable parent reference {first}");
        return Ok(None);
    };

    Ok(Some(DlcLink {
        dlc_id,
        parent_id,
        installer_qty: list(data.get("dl_installer")).len() as i64,
    }))
}

// ── Builds ──────────────────────────────────────────────────────────────────

/// Extract the build rows listed in a product manifest.
///
/// Malformed entries and entries without a publication date are skipped.
pub fn extract_build_rows(data: &Value) -> Vec<Build> {
    let manifest_id = data.get("id").and_then(coerce_int);
    let mut rows = Vec::new();

    for entry in list(data.get("builds")) {
        let id = entry.get("id").and_then(coerce_int);
        let product_id = match entry.get("product_id") {
            Some(v) => coerce_int(v),
            None => manifest_id,
        };
        let (Some(id), Some(product_id)) = (id, product_id) else {
            log::debug!("Skipping malformed build entry: {entry}");
            continue;
        };

        let Some(date_published) = entry
            .get("date_published")
            .filter(|v| truthy(v))
            .and_then(coerce_string)
        else {
            log::warn!("Skipping build {id} for product {product_id} with no date_published");
            continue;
        };

        let generation = match entry.get("generation") {
            None | Some(Value::Null) => 0,
            Some(v) => match coerce_int(v) {
                Some(g) => g,
                None => {
                    log::warn!("Skipping build {id} for product {product_id}: bad generation {v}");
                    continue;
                }
            },
        };

        rows.push(Build {
            id,
            product_id,
            date_published,
            generation,
            version: optional_string(entry.get("version")),
            legacy_build_id: entry.get("legacy_build_id").and_then(coerce_int),
            os: optional_string(entry.get("os")),
        });
    }

    rows
}

// ── Installers ──────────────────────────────────────────────────────────────

/// Extract the installer rows listed under `dl_installer`.
pub fn extract_installer_rows(data: &Value) -> Vec<Installer> {
    let installers = list(data.get("dl_installer"));
    if installers.is_empty() {
        return Vec::new();
    }
    let Some(product_id) = data.get("id").and_then(coerce_int) else {
        log::debug!("Skipping {} installers of a manifest without a usable id", installers.len());
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(installers.len());
    for inst in installers {
        let Some(installer_id) = inst.get("id").and_then(coerce_string) else {
            log::debug!("Skipping malformed installer entry for product {product_id}: {inst}");
            continue;
        };
        let language = inst
            .get("language")
            .and_then(|lang| lang.get("code"))
            .and_then(coerce_string);

        rows.push(Installer {
            id: None,
            product_id,
            installer_id,
            language,
            os: optional_string(inst.get("os")),
            version: optional_string(inst.get("version")),
        });
    }
    rows
}

// ── Gen2 Build Manifests ────────────────────────────────────────────────────

/// Extract the products bundled into a gen2 build manifest.
///
/// A manifest without a usable `buildId` contributes nothing; a product entry
/// without a usable `productId` is skipped on its own.
pub fn extract_build_product_rows(data: &Value) -> Vec<BuildProduct> {
    let Some(build_id) = data.get("buildId").and_then(coerce_int) else {
        log::warn!(
            "Skipping gen2 build manifest - invalid or missing buildId: {}",
            data.get("buildId").unwrap_or(&Value::Null)
        );
        return Vec::new();
    };

    let products = list(data.get("products"));
    if products.is_empty() {
        log::debug!("Gen2 build manifest {build_id} has no products");
        return Vec::new();
    }

    let mut rows = Vec::with_capacity(products.len());
    for (idx, prod) in products.iter().enumerate() {
        let Some(product_id) = prod.get("productId").and_then(coerce_int) else {
            log::warn!(
                "Skipping product[{idx}] in build {build_id} - invalid or missing productId: {}",
                prod.get("productId").unwrap_or(&Value::Null)
            );
            continue;
        };
        rows.push(BuildProduct {
            build_id,
            product_id,
            product_name: optional_string(prod.get("name")),
            temp_executable: optional_string(prod.get("temp_executable")),
        });
    }
    rows
}

// ── Coercion Helpers ────────────────────────────────────────────────────────

// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
const I64_MIN_F64: f64 = i64::MIN as f64;
const I64_MAX_EXCLUSIVE_F64: f64 = i64::MAX as f64;

fn require_int(data: &Value, field: &'static str) -> Result<i64, ExtractError> {
    let value = data.get(field).ok_or(ExtractError::MissingField { field })?;
    coerce_int(value).ok_or_else(|| ExtractError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn require_string(data: &Value, field: &'static str) -> Result<String, ExtractError> {
    let value = data.get(field).ok_or(ExtractError::MissingField { field })?;
    coerce_string(value).ok_or_else(|| ExtractError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Integer view of a scalar: integers, floats (truncated), decimal strings
/// and booleans. Values outside the `i64` range have none.
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| (I64_MIN_F64..I64_MAX_EXCLUSIVE_F64).contains(f))
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// String view of a scalar. `null`, arrays and objects have none.
pub(crate) fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn optional_string(value: Option<&Value>) -> Option<String> {
    value.and_then(coerce_string)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// The elements of a list-valued key; absent, `null` or non-list is empty.
fn list(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}
