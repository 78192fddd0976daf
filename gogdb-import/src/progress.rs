//! Import progress reporting.

use std::path::Path;

/// Trait for receiving import progress updates.
pub trait ImportProgress {
    /// Called when a top-level source (archive or manifest) starts.
    fn on_source(&self, current: usize, total: usize, path: &Path);

    /// Called after each recognised archive member is processed.
    fn on_member(&self, processed: usize, name: &str);

    /// Called when a top-level source has been committed.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_source(&self, _current: usize, _total: usize, _path: &Path) {}
    fn on_member(&self, _processed: usize, _name: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_source(&self, current: usize, total: usize, path: &Path) {
        log::info!("[{}/{}] Importing {}", current, total, path.display());
    }

    fn on_member(&self, processed: usize, name: &str) {
        if processed.is_multiple_of(5000) {
            log::info!("  {} members processed ({})", processed, name);
        }
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
