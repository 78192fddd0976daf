//! Data model types for the product catalog.
//!
//! These types represent the persistent catalog schema: products, builds,
//! DLC links, installers, gen2 build contents, and import tracking.

// ── Product ─────────────────────────────────────────────────────────────────

/// A catalog item: a game, a DLC, or a pack bundling several products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub product_type: ProductType,
    pub slug: String,
    pub title: String,
    /// Release date as published in the snapshot (free-form ISO-ish string).
    pub global_date: Option<String>,
    pub is_in_development: bool,
    pub image_boxart: Option<String>,
}

/// The kinds of product the catalog keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductType {
    Game,
    Dlc,
    Pack,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Dlc => "dlc",
            Self::Pack => "pack",
        }
    }

    /// Parse the snapshot's `type` value. Anything outside the kept kinds
    /// (movies, package bundles, ...) yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "game" => Some(Self::Game),
            "dlc" => Some(Self::Dlc),
            "pack" => Some(Self::Pack),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Build ───────────────────────────────────────────────────────────────────

/// A published build of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub id: i64,
    pub product_id: i64,
    pub date_published: String,
    pub generation: i64,
    pub version: Option<String>,
    pub legacy_build_id: Option<i64>,
    pub os: Option<String>,
}

// ── DLC Link ────────────────────────────────────────────────────────────────

/// "DLC `dlc_id` belongs to base game `parent_id`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DlcLink {
    pub dlc_id: i64,
    pub parent_id: i64,
    /// Number of installers the DLC ships (0 = not installable).
    pub installer_qty: i64,
}

impl DlcLink {
    /// Whether this link passes the retention rule for the DLC relation.
    pub fn is_installable(&self) -> bool {
        self.installer_qty > 0
    }
}

// ── Installer ───────────────────────────────────────────────────────────────

/// A downloadable installer for a product.
///
/// The natural key is `(product_id, installer_id)`. `id` is the storage
/// surrogate and is `None` until the row has been read back from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installer {
    pub id: Option<i64>,
    pub product_id: i64,
    pub installer_id: String,
    pub language: Option<String>,
    pub os: Option<String>,
    pub version: Option<String>,
}

// ── Build Product ───────────────────────────────────────────────────────────

/// One product bundled into a gen2 build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProduct {
    pub build_id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    pub temp_executable: Option<String>,
}

// ── Import Tracking ─────────────────────────────────────────────────────────

/// Log entry for one committed top-level import.
#[derive(Debug, Clone, Default)]
pub struct ImportLog {
    pub id: i64,
    /// `archive` or `manifest`.
    pub source_type: String,
    pub source_name: String,
    pub imported_at: String,
    pub products: i64,
    pub builds: i64,
    pub installers: i64,
    pub dlc_links: i64,
    pub build_products: i64,
    pub gen1_skipped: i64,
    pub malformed_members: i64,
}
