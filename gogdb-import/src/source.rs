//! Top-level import sources: standalone manifests and snapshot archives.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::archive::import_archive;
use crate::product_import::{ImportError, ImportStats, import_product_json};
use crate::progress::ImportProgress;

/// The kind of a top-level source, decided by its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Archive,
    Manifest,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Archive => "archive",
            SourceKind::Manifest => "manifest",
        }
    }

    /// `.tar.xz` is an archive, `.json` a product manifest, anything else unsupported.
    pub fn of_path(path: &Path) -> Option<SourceKind> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".tar.xz") {
            Some(SourceKind::Archive)
        } else if path.extension().is_some_and(|ext| ext == "json") {
            Some(SourceKind::Manifest)
        } else {
            None
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check every source before anything is imported.
///
/// A missing path or an unsupported file type fails the whole batch.
pub fn validate_sources(paths: &[PathBuf]) -> Result<Vec<(PathBuf, SourceKind)>, ImportError> {
    paths
        .iter()
        .map(|path| {
            if !path.exists() {
                return Err(ImportError::SourceNotFound(path.clone()));
            }
            let kind = SourceKind::of_path(path)
                .ok_or_else(|| ImportError::UnsupportedSource(path.clone()))?;
            Ok((path.clone(), kind))
        })
        .collect()
}

/// Import each source in order, each in its own transaction.
///
/// A failing source stops the run; sources before it stay committed.
pub fn import_sources(
    conn: &Connection,
    paths: &[PathBuf],
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let sources = validate_sources(paths)?;
    let total = sources.len();
    let mut totals = ImportStats::default();

    for (i, (path, kind)) in sources.iter().enumerate() {
        if let Some(p) = progress {
            p.on_source(i + 1, total, path);
        }
        let stats = match kind {
            SourceKind::Archive => import_archive(conn, path, progress)?,
            SourceKind::Manifest => import_product_json(conn, path)?,
        };
        log::info!(
            "Imported {} {}: {} products, {} builds, {} installers, {} DLC links, {} build products",
            kind,
            path.display(),
            stats.products,
            stats.builds,
            stats.installers,
            stats.dlc_links,
            stats.build_products
        );
        if let Some(p) = progress {
            p.on_complete(&format!("Committed {}", path.display()));
        }
        totals += &stats;
    }

    Ok(totals)
}
