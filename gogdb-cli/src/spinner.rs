//! Spinner display for import progress.

use std::path::Path;
use std::time::Duration;

use gogdb_import::ImportProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::logging::{LogBuffer, LogContext};

/// Update the spinner message every this many archive members.
const MEMBER_REDRAW_INTERVAL: usize = 250;

/// A single spinner line tracking the current source and member count.
///
/// Starting a source also clears the log buffer, so warnings replayed after
/// a failure belong to the source that failed.
pub struct ImportSpinner<'a> {
    pb: ProgressBar,
    buffer: &'a LogBuffer,
}

impl<'a> ImportSpinner<'a> {
    /// When `quiet` is true, the spinner is hidden. Otherwise it joins the
    /// logger's progress group so log lines print above it.
    pub fn new(quiet: bool, log_ctx: &'a LogContext) -> Self {
        let pb = if quiet {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        } else {
            log_ctx.progress().add(ProgressBar::new_spinner())
        };
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("/-\\|"));
        }
        Self {
            pb,
            buffer: log_ctx.buffer(),
        }
    }

    /// Stop ticking and clear the line.
    pub fn finish(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}

impl ImportProgress for ImportSpinner<'_> {
    fn on_source(&self, current: usize, total: usize, path: &Path) {
        self.buffer.clear();
        self.pb.reset();
        self.pb.enable_steady_tick(Duration::from_millis(100));
        self.pb
            .set_message(format!("[{}/{}] {}", current, total, path.display()));
    }

    fn on_member(&self, processed: usize, name: &str) {
        if processed.is_multiple_of(MEMBER_REDRAW_INTERVAL) {
            self.pb
                .set_message(format!("{} members: {}", processed, name));
        }
    }

    fn on_complete(&self, message: &str) {
        self.pb.disable_steady_tick();
        self.pb.set_message("");
        self.pb.println(format!("  {}", message));
    }
}
