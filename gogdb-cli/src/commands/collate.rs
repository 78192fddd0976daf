use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use gogdb_import::{ImportError, SourceKind, collate_archive};

use crate::CliError;

/// Write trimmed product records from an archive as JSON lines.
pub(crate) fn run_collate(archive: &Path, output: Option<&Path>) -> Result<(), CliError> {
    if !archive.exists() {
        return Err(ImportError::SourceNotFound(archive.to_path_buf()).into());
    }
    if SourceKind::of_path(archive) != Some(SourceKind::Archive) {
        return Err(ImportError::UnsupportedSource(archive.to_path_buf()).into());
    }

    let written = match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let mut out = BufWriter::new(File::create(path)?);
            collate_archive(archive, &mut out)?
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            collate_archive(archive, &mut out)?
        }
    };

    log::info!("Collated {} product records from {}", written, archive.display());
    Ok(())
}
