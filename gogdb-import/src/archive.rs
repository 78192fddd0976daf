//! Traversal of `.tar.xz` catalog snapshots.
//!
//! A snapshot holds one directory per product with a `product.json`, plus
//! build manifests named after their build id:
//! ```text
//! products/1207658924/product.json
//! products/1207658924/builds/51827.json            (gen1, "version": 1)
//! products/1207658924/builds/56391349421451347.json (gen2, "version": 2)
//! ```
//! Members are read one at a time and written through immediately.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use gogdb_catalog::prefilter::trim_product;
use rusqlite::Connection;
use serde_json::Value;
use xz2::read::XzDecoder;

use crate::product_import::{
    ImportError, ImportStats, import_build_data_gen2, import_product_data, log_import,
};
use crate::progress::ImportProgress;
use crate::source::SourceKind;

const PRODUCT_MEMBER: &str = "product.json";

/// How an archive member is handled, decided from its file name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    /// A `product.json` product manifest.
    Product,
    /// `<digits>.json`, a build manifest; the digits are the build id.
    BuildManifest { file_build_id: String },
    Ignored,
}

/// Classify an archive member by its base name.
pub fn classify_member(path: &Path) -> MemberKind {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return MemberKind::Ignored;
    };
    if name == PRODUCT_MEMBER {
        return MemberKind::Product;
    }
    match name.strip_suffix(".json") {
        Some(stem) if !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()) => {
            MemberKind::BuildManifest {
                file_build_id: stem.to_string(),
            }
        }
        _ => MemberKind::Ignored,
    }
}

/// Import every recognised member of a snapshot archive in one transaction.
///
/// Unparseable members are counted and skipped. A fatal error (unreadable
/// archive, product manifest without an identifying key, database failure)
/// rolls back everything written from this archive.
pub fn import_archive(
    conn: &Connection,
    archive_path: &Path,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let mut archive = open_archive(archive_path)?;
    let archive_err = |source| ImportError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    let mut stats = ImportStats::default();
    let mut processed = 0usize;
    let tx = conn.unchecked_transaction()?;

    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let member_path = entry.path().map_err(archive_err)?.into_owned();
        let kind = classify_member(&member_path);
        if kind == MemberKind::Ignored {
            stats.ignored_members += 1;
            continue;
        }

        let Some(data) = read_json_member(&mut entry, &member_path, &mut stats)
            .map_err(archive_err)?
        else {
            continue;
        };

        let result = match kind {
            MemberKind::Product => import_product_data(&tx, &data, &mut stats),
            MemberKind::BuildManifest { file_build_id } => {
                import_build_manifest(&tx, data, &file_build_id, &member_path, &mut stats)
            }
            MemberKind::Ignored => Ok(()),
        };
        if let Err(e) = result {
            log::error!(
                "Aborting import of {} at member {}: {}",
                archive_path.display(),
                member_path.display(),
                e
            );
            return Err(e);
        }

        processed += 1;
        if let Some(p) = progress {
            p.on_member(processed, &member_path.to_string_lossy());
        }
    }

    log::debug!(
        "Skipped {} gen1 build manifests in {}",
        stats.gen1_skipped,
        archive_path.display()
    );
    log_import(&tx, SourceKind::Archive, archive_path, &stats)?;
    tx.commit()?;

    Ok(stats)
}

/// Write the trimmed form of every kept `product.json` as one JSON line.
///
/// Returns the number of records written.
pub fn collate_archive<W: Write>(archive_path: &Path, out: &mut W) -> Result<usize, ImportError> {
    let mut archive = open_archive(archive_path)?;
    let archive_err = |source| ImportError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    let mut scratch = ImportStats::default();
    let mut written = 0;
    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let member_path = entry.path().map_err(archive_err)?.into_owned();
        if classify_member(&member_path) != MemberKind::Product {
            continue;
        }
        let Some(data) =
            read_json_member(&mut entry, &member_path, &mut scratch).map_err(archive_err)?
        else {
            continue;
        };
        if let Some(trimmed) = trim_product(&data) {
            serde_json::to_writer(&mut *out, &trimmed).map_err(std::io::Error::from)?;
            out.write_all(b"\n")?;
            written += 1;
        }
    }
    out.flush()?;

    Ok(written)
}

fn open_archive(path: &Path) -> Result<tar::Archive<XzDecoder<BufReader<File>>>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Archive {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(tar::Archive::new(XzDecoder::new(BufReader::new(file))))
}

/// Read and parse one member. Malformed JSON is logged, counted, and skipped.
fn read_json_member<R: Read>(
    entry: &mut R,
    member_path: &Path,
    stats: &mut ImportStats,
) -> std::io::Result<Option<Value>> {
    let mut raw = Vec::new();
    entry.read_to_end(&mut raw)?;
    match serde_json::from_slice(&raw) {
        Ok(data) => Ok(Some(data)),
        Err(e) => {
            log::warn!("Skipping malformed JSON member {}: {}", member_path.display(), e);
            stats.malformed_members += 1;
            Ok(None)
        }
    }
}

/// Dispatch a build manifest on its `version` field.
fn import_build_manifest(
    conn: &Connection,
    mut data: Value,
    file_build_id: &str,
    member_path: &Path,
    stats: &mut ImportStats,
) -> Result<(), ImportError> {
    match manifest_version(&data) {
        Some(2) => {
            if let Some(obj) = data.as_object_mut() {
                if !obj.contains_key("buildId") {
                    match file_build_id.parse::<i64>() {
                        Ok(id) => {
                            obj.insert("buildId".to_string(), Value::from(id));
                            log::debug!(
                                "Injected buildId {} from filename (source: {})",
                                file_build_id,
                                member_path.display()
                            );
                        }
                        Err(e) => log::warn!(
                            "Cannot use filename build id {} of {}: {}",
                            file_build_id,
                            member_path.display(),
                            e
                        ),
                    }
                }
            }
            import_build_data_gen2(conn, &data, stats)
        }
        Some(1) => {
            // Gen1 manifests are recognised but not imported yet.
            log::debug!("Skipping gen1 build manifest {}", member_path.display());
            stats.gen1_skipped += 1;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// The manifest format generation, when it is 1 or 2.
fn manifest_version(data: &Value) -> Option<u8> {
    let version = data.get("version")?.as_f64()?;
    if version == 1.0 {
        Some(1)
    } else if version == 2.0 {
        Some(2)
    } else {
        None
    }
}
