//! Logger for the `gogdb-ingest` binary.
//!
//! One [`log::Log`] implementation fans each record out to up to three sinks:
//! the console (stderr, coloured level tag), an optional size-rotated log file
//! (ANSI codes stripped), and an in-memory [`LogBuffer`] of recent lines. The
//! buffer and the [`MultiProgress`] that console lines are drawn above are
//! owned by the [`LogContext`] that `main` builds and hands to commands.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use indicatif::MultiProgress;
use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::CliError;
use crate::settings::LoggingSettings;

/// Bounded ring of formatted log lines; the oldest line is dropped when full.
pub(crate) struct LogBuffer {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity.min(4096))),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if let Ok(mut lines) = self.lines.lock() {
            while lines.len() >= self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// The newest `n` lines, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| {
                let skip = lines.len().saturating_sub(n);
                lines.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.recent(self.capacity)
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|lines| lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle on the installed logger, passed to commands.
pub(crate) struct LogContext {
    level: LevelFilter,
    buffer: Arc<LogBuffer>,
    progress: MultiProgress,
    file_path: Option<PathBuf>,
}

impl LogContext {
    /// Build the sinks described by `settings` and install the global logger.
    pub fn install(settings: &LoggingSettings, level: LevelFilter) -> Result<Self, CliError> {
        let (ctx, logger) = Self::build(settings, level, MultiProgress::new())?;
        log::set_boxed_logger(Box::new(logger))
            .map_err(|e| CliError::logging(format!("Cannot install logger: {}", e)))?;
        log::set_max_level(level);
        Ok(ctx)
    }

    fn build(
        settings: &LoggingSettings,
        level: LevelFilter,
        progress: MultiProgress,
    ) -> Result<(Self, Logger), CliError> {
        let buffer = Arc::new(LogBuffer::new(settings.buffer_capacity));

        let (file, file_path) = match &settings.file {
            Some(name) => {
                let path = settings.dir.join(name);
                let file =
                    RotatingFile::open(&path, settings.file_max_bytes, settings.file_backup_count)
                        .map_err(|e| {
                            CliError::logging(format!(
                                "Cannot open log file {}: {}",
                                path.display(),
                                e
                            ))
                        })?;
                (Some(Mutex::new(file)), Some(path))
            }
            None => (None, None),
        };

        let logger = Logger {
            level,
            console: settings.console,
            progress: progress.clone(),
            file,
            buffer: Arc::clone(&buffer),
        };
        let ctx = Self {
            level,
            buffer,
            progress,
            file_path,
        };
        Ok((ctx, logger))
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    /// Progress bars added here are redrawn below console log lines.
    pub fn progress(&self) -> &MultiProgress {
        &self.progress
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Recent buffered warning lines, oldest first.
    pub fn recent_warnings(&self, n: usize) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .buffer
            .snapshot()
            .into_iter()
            .filter(|line| line.contains(&format!("[{}]", Level::Warn)))
            .collect();
        let skip = warnings.len().saturating_sub(n);
        warnings.drain(..skip);
        warnings
    }
}

struct Logger {
    level: LevelFilter,
    console: bool,
    progress: MultiProgress,
    file: Option<Mutex<RotatingFile>>,
    buffer: Arc<LogBuffer>,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let message = record.args().to_string();
        let plain = strip_ansi_escapes::strip_str(format_line(
            &timestamp,
            &record.level().to_string(),
            record.target(),
            &message,
        ));

        if self.console {
            let tag = record.level().to_string();
            let tag = match record.level() {
                Level::Error => tag.if_supports_color(Stderr, |t| t.red()).to_string(),
                Level::Warn => tag.if_supports_color(Stderr, |t| t.yellow()).to_string(),
                Level::Info => tag.if_supports_color(Stderr, |t| t.green()).to_string(),
                Level::Debug => tag.if_supports_color(Stderr, |t| t.blue()).to_string(),
                Level::Trace => tag.if_supports_color(Stderr, |t| t.dimmed()).to_string(),
            };
            let line = format_line(&timestamp, &tag, record.target(), &message);
            self.progress.suspend(|| eprintln!("{}", line));
        }

        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.write_line(&plain);
            }
        }

        self.buffer.push(plain);
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.file.flush();
            }
        }
    }
}

fn format_line(timestamp: &str, level: &str, target: &str, message: &str) -> String {
    format!("{} [{}] {}: {}", timestamp, level, target, message)
}

/// Log file sink that rolls over by size.
///
/// When a line would push the file past `max_bytes`, `name` becomes
/// `name.1`, `name.1` becomes `name.2` and so on; at most `backups` old
/// files are kept. A zero `max_bytes` or `backups` disables rollover.
struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    backups: usize,
}

impl RotatingFile {
    /// Open a fresh log file, moving aside any file already at `path`.
    fn open(path: &Path, max_bytes: u64, backups: usize) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            let rotated = unused_rotated_path(path, &chrono::Local::now());
            fs::rename(path, rotated)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            written: 0,
            max_bytes,
            backups,
        })
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        let len = line.len() as u64 + 1;
        if self.max_bytes > 0
            && self.backups > 0
            && self.written > 0
            && self.written + len > self.max_bytes
        {
            self.roll_over()?;
        }
        writeln!(self.file, "{}", line)?;
        self.written += len;
        Ok(())
    }

    fn roll_over(&mut self) -> std::io::Result<()> {
        self.file.flush()?;
        for i in (1..self.backups).rev() {
            let from = self.backup_path(i);
            if from.exists() {
                fs::rename(&from, self.backup_path(i + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;
        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }
}

/// `<dir>/<YYYY.MM.DD.HH.MM.SS>-<name>` for the file at `path`, with a
/// `-<n>` counter after the timestamp when that name is taken.
fn unused_rotated_path<Tz: chrono::TimeZone>(path: &Path, now: &chrono::DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format("%Y.%m.%d.%H.%M.%S").to_string();
    let mut candidate = rotated_path(path, &stamp);
    let mut n = 1;
    while candidate.exists() {
        candidate = rotated_path(path, &format!("{}-{}", stamp, n));
        n += 1;
    }
    candidate
}

fn rotated_path(path: &Path, prefix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamped = format!("{}-{}", prefix, name);
    match path.parent() {
        Some(dir) => dir.join(stamped),
        None => PathBuf::from(stamped),
    }
}
