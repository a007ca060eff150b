//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display progress bars for the hashing and resolving phases.
//!
//! The core never draws anything itself; it only calls the callback, so
//! tests and embedders can plug in their own implementation or none at all.

use std::sync::Mutex;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Phase name for fingerprinting.
pub const PHASE_HASHING: &str = "hashing";
/// Phase name for duplicate resolution.
pub const PHASE_RESOLVING: &str = "resolving";

/// Progress callback for the deduplication phases.
///
/// Implement this trait to receive progress updates during a run.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_HASHING`] or [`PHASE_RESOLVING`])
    /// * `total` - Total number of items to process
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of items completed so far (1-based)
    /// * `item` - Name of the item just processed
    fn on_progress(&self, current: usize, item: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    active: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `hidden` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dedupe::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            active: Mutex::new(None),
            hidden,
        }
    }

    fn style(phase: &str) -> ProgressStyle {
        let template = if phase == PHASE_HASHING {
            "[{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} ({percent}%) {msg} {per_sec} (ETA: {eta})"
        } else {
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}"
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
    }

    fn active(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        // A poisoned lock only means another thread panicked mid-update.
        self.active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.hidden {
            return;
        }

        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::style(phase));
        pb.set_message(match phase {
            PHASE_HASHING => "Building hashes".to_string(),
            PHASE_RESOLVING => "Resolving duplicates".to_string(),
            other => other.to_string(),
        });
        *self.active() = Some(pb);
    }

    fn on_progress(&self, current: usize, item: &str) {
        if self.hidden {
            return;
        }

        if let Some(ref pb) = *self.active() {
            pb.set_position(current as u64);
            pb.set_message(truncate_name(item, 30));
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.hidden {
            return;
        }

        if let Some(pb) = self.active().take() {
            match phase {
                PHASE_HASHING => pb.finish_and_clear(),
                _ => pb.finish_with_message("done"),
            }
        }
    }
}

/// Truncate a file name for display in the progress bar.
fn truncate_name(name: &str, max_len: usize) -> String {
    let count = name.chars().count();
    if count <= max_len {
        return name.to_string();
    }

    let tail: String = name.chars().skip(count - (max_len - 3)).collect();
    format!("...{tail}")
}
