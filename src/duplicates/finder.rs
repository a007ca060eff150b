//! Deduplicator: enumerate, fingerprint, group, resolve.
//!
//! # Overview
//!
//! This module orchestrates one deduplication run over a single directory:
//! 1. **Enumerate** direct, non-hidden, non-directory entries
//! 2. **Fingerprint** each entry with the configured [`HashAlgorithm`]
//! 3. **Group** records by fingerprint (see [`crate::duplicates::groups`])
//! 4. **Resolve** each group by keeping the first member and deleting or
//!    moving aside the rest (see [`crate::actions::resolve`])
//!
//! Fingerprinting may run on a bounded rayon pool; results are collected in
//! discovery order, so grouping is identical to a sequential run. Resolution
//! is always sequential.
//!
//! # Error policy
//!
//! By default the first hashing or resolution failure aborts the run. Groups
//! resolved before the failure stay resolved. With
//! [`DedupeConfig::with_continue_on_error`] failing files are skipped and
//! reported in [`RunSummary::errors`] instead.
//!
//! # Example
//!
//! ```no_run
//! use dedupe::actions::Action;
//! use dedupe::duplicates::{DedupeConfig, Deduplicator};
//! use dedupe::scanner::HashAlgorithm;
//! use std::path::Path;
//!
//! let config = DedupeConfig::default()
//!     .with_algorithm(HashAlgorithm::Blake3)
//!     .with_action(Action::Delete);
//! let summary = Deduplicator::new(config).run(Path::new("/photos")).unwrap();
//!
//! println!("Found {} duplicate group(s)", summary.duplicate_groups);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::actions::{Action, GroupResolution, ResolveError, Resolver};
use crate::config::{Config, ConfigError, DEFAULT_IO_THREADS};
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_RESOLVING};
use crate::scanner::{
    list_eligible, EligibleEntry, FileRecord, HashAlgorithm, HashError, Hasher, ScanError,
    DEFAULT_CHUNK_SIZE,
};

use super::groups::group_with_stats;

/// Configuration for a deduplication run.
#[derive(Clone)]
pub struct DedupeConfig {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Read chunk size in bytes.
    pub chunk_size: usize,
    /// What to do with redundant copies.
    pub action: Action,
    /// Number of hashing workers; 1 hashes strictly one file at a time.
    pub io_threads: usize,
    /// Skip failing files instead of aborting.
    pub continue_on_error: bool,
    /// Plan the resolution without modifying anything.
    pub dry_run: bool,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for DedupeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupeConfig")
            .field("algorithm", &self.algorithm)
            .field("chunk_size", &self.chunk_size)
            .field("action", &self.action)
            .field("io_threads", &self.io_threads)
            .field("continue_on_error", &self.continue_on_error)
            .field("dry_run", &self.dry_run)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            action: Action::default(),
            io_threads: DEFAULT_IO_THREADS,
            continue_on_error: false,
            dry_run: false,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl From<&Config> for DedupeConfig {
    fn from(config: &Config) -> Self {
        Self {
            algorithm: config.algorithm,
            chunk_size: config.chunk_size,
            action: Action::from_remove_flag(config.remove),
            io_threads: config.io_threads,
            continue_on_error: config.continue_on_error,
            ..Self::default()
        }
    }
}

impl DedupeConfig {
    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the resolution action.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Set the number of hashing workers (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Skip failing files instead of aborting.
    #[must_use]
    pub fn with_continue_on_error(mut self, enabled: bool) -> Self {
        self.continue_on_error = enabled;
        self
    }

    /// Plan without modifying the file system.
    #[must_use]
    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// A file that could not be processed in a continue-on-error run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunError {
    /// File the failure relates to
    pub path: PathBuf,
    /// Human-readable description
    pub message: String,
}

impl From<&HashError> for RunError {
    fn from(e: &HashError) -> Self {
        Self {
            path: e.path().to_path_buf(),
            message: e.to_string(),
        }
    }
}

impl From<&ResolveError> for RunError {
    fn from(e: &ResolveError) -> Self {
        Self {
            path: e.path().to_path_buf(),
            message: e.to_string(),
        }
    }
}

/// Structured result of a run, for the caller to render.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Scanned directory
    pub directory: PathBuf,
    /// Algorithm used for fingerprints
    pub algorithm: HashAlgorithm,
    /// Resolution action
    pub action: Action,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Number of files fingerprinted
    pub files_scanned: usize,
    /// Number of distinct fingerprints with more than one member
    pub duplicate_groups: usize,
    /// Per-group kept/removed detail, in resolution order
    pub groups: Vec<GroupResolution>,
    /// Number of copies removed or moved
    pub files_removed: usize,
    /// Bytes held by removed or moved copies
    pub bytes_reclaimed: u64,
    /// `duplicates/` location, when moves were made or planned
    pub duplicates_dir: Option<PathBuf>,
    /// Failures skipped in a continue-on-error run
    pub errors: Vec<RunError>,
    /// Whether the run stopped early on a shutdown request
    pub interrupted: bool,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl RunSummary {
    /// `true` if at least one duplicate group was found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.duplicate_groups > 0
    }

    /// `true` if some files were skipped because of errors.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Reclaimed bytes as a human-readable string.
    #[must_use]
    pub fn reclaimed_display(&self) -> String {
        bytesize::ByteSize::b(self.bytes_reclaimed).to_string()
    }
}

/// Errors that abort a deduplication run.
#[derive(thiserror::Error, Debug)]
pub enum DedupeError {
    /// The run was interrupted before any file was modified.
    #[error("run interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The directory could not be listed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// A duplicate could not be moved or deleted.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Per-entry result of the fingerprinting phase.
enum Fingerprinted {
    Done(FileRecord),
    Failed(HashError),
    Skipped,
}

/// Runs the enumerate → fingerprint → group → resolve pipeline.
pub struct Deduplicator {
    config: DedupeConfig,
    hasher: Hasher,
}

impl Deduplicator {
    /// Create a deduplicator with the given configuration.
    #[must_use]
    pub fn new(config: DedupeConfig) -> Self {
        let hasher = Hasher::new(config.algorithm).with_chunk_size(config.chunk_size);
        Self { config, hasher }
    }

    /// Create a deduplicator with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DedupeConfig::default())
    }

    /// Fingerprint every entry, preserving input order.
    ///
    /// Returns the records plus, in continue-on-error mode, the files that
    /// could not be hashed.
    ///
    /// # Errors
    ///
    /// - [`DedupeError::Interrupted`] if shutdown was requested
    /// - [`DedupeError::Hash`] for the first failing file (in input order)
    ///   when `continue_on_error` is off
    pub fn fingerprint(
        &self,
        entries: Vec<EligibleEntry>,
    ) -> Result<(Vec<FileRecord>, Vec<HashError>), DedupeError> {
        let total = entries.len();
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_HASHING, total);
        }

        let completed = AtomicUsize::new(0);
        let abort = AtomicBool::new(false);
        let hash_one = |entry: EligibleEntry| self.hash_entry(entry, &completed, &abort);

        let outcomes: Vec<Fingerprinted> = if self.config.io_threads <= 1 || total <= 1 {
            entries.into_iter().map(hash_one).collect()
        } else {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.io_threads)
                .build()
            {
                Ok(pool) => pool.install(|| entries.into_par_iter().map(hash_one).collect()),
                Err(e) => {
                    log::warn!("Failed to create hashing pool ({e}), hashing sequentially");
                    entries.into_iter().map(hash_one).collect()
                }
            }
        };

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_HASHING);
        }

        if self.config.is_shutdown_requested() {
            log::info!("Fingerprinting interrupted by shutdown signal");
            return Err(DedupeError::Interrupted);
        }

        let mut records = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Fingerprinted::Done(record) => records.push(record),
                Fingerprinted::Failed(e) if self.config.continue_on_error => {
                    log::warn!("Skipping {}: {}", e.path().display(), e);
                    failures.push(e);
                }
                Fingerprinted::Failed(e) => return Err(e.into()),
                Fingerprinted::Skipped => {}
            }
        }

        Ok((records, failures))
    }

    fn hash_entry(
        &self,
        entry: EligibleEntry,
        completed: &AtomicUsize,
        abort: &AtomicBool,
    ) -> Fingerprinted {
        if abort.load(Ordering::Relaxed) || self.config.is_shutdown_requested() {
            return Fingerprinted::Skipped;
        }

        let outcome = match self.hasher.hash_file(&entry.path) {
            Ok(fingerprint) => {
                log::debug!("{} {}", fingerprint, entry.name);
                Fingerprinted::Done(FileRecord::new(entry, fingerprint))
            }
            Err(e) => {
                if !self.config.continue_on_error {
                    abort.store(true, Ordering::Relaxed);
                }
                Fingerprinted::Failed(e)
            }
        };

        if let Some(ref callback) = self.config.progress_callback {
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            let name = match outcome {
                Fingerprinted::Done(ref r) => r.name.as_str(),
                _ => "",
            };
            callback.on_progress(done, name);
        }

        outcome
    }

    /// Run the full pipeline on `directory`.
    ///
    /// # Errors
    ///
    /// Returns [`DedupeError`] if the directory is missing or unreadable, if
    /// the run is interrupted during fingerprinting, or on the first hashing
    /// or resolution failure when `continue_on_error` is off.
    pub fn run(&self, directory: &Path) -> Result<RunSummary, DedupeError> {
        let start_time = Instant::now();

        if !directory.exists() {
            return Err(DedupeError::PathNotFound(directory.to_path_buf()));
        }
        if !directory.is_dir() {
            return Err(DedupeError::NotADirectory(directory.to_path_buf()));
        }

        let mut summary = RunSummary {
            directory: directory.to_path_buf(),
            algorithm: self.config.algorithm,
            action: self.config.action,
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        let entries = list_eligible(directory)?;
        log::info!(
            "Building {} hashes of {} file(s) in {}",
            self.config.algorithm,
            entries.len(),
            directory.display()
        );

        let (records, hash_failures) = self.fingerprint(entries)?;
        summary.errors.extend(hash_failures.iter().map(RunError::from));

        let (groups, stats) = group_with_stats(records);
        summary.files_scanned = stats.total_files;
        summary.duplicate_groups = stats.duplicate_groups;
        log::info!(
            "{} file(s) hashed, {} duplicate group(s), {} redundant copies",
            stats.total_files,
            stats.duplicate_groups,
            stats.redundant_files
        );

        let mut resolver =
            Resolver::new(directory, self.config.action).with_dry_run(self.config.dry_run);

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_RESOLVING, groups.len());
        }

        for (idx, group) in groups.iter().enumerate() {
            if self.config.is_shutdown_requested() {
                log::info!(
                    "Resolution interrupted after {} of {} group(s)",
                    idx,
                    groups.len()
                );
                summary.interrupted = true;
                break;
            }

            log::debug!(
                "Resolving {} ({} redundant, {} reclaimable)",
                group.fingerprint,
                group.redundant().len(),
                bytesize::ByteSize::b(group.wasted_space())
            );
            let (resolution, failures) =
                resolver.resolve_group(group, self.config.continue_on_error)?;

            summary.files_removed += resolution.removed.len();
            summary.bytes_reclaimed += resolution.removed.iter().map(|r| r.size).sum::<u64>();
            summary.errors.extend(failures.iter().map(RunError::from));
            summary.groups.push(resolution);

            if let Some(ref callback) = self.config.progress_callback {
                callback.on_progress(idx + 1, &group.kept().name);
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_RESOLVING);
        }

        if resolver.used_duplicates_dir() {
            summary.duplicates_dir = Some(resolver.duplicates_dir());
        }
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        log::info!(
            "Run complete: {} group(s), {} file(s) {}, {} reclaimed in {}ms",
            summary.duplicate_groups,
            summary.files_removed,
            match summary.action {
                Action::Delete => "deleted",
                Action::MoveAside => "moved",
            },
            summary.reclaimed_display(),
            summary.duration_ms
        );

        Ok(summary)
    }
}

/// Deduplicate `directory` with default settings for everything but the
/// algorithm and action.
///
/// # Errors
///
/// See [`Deduplicator::run`].
pub fn run(
    directory: &Path,
    algorithm: HashAlgorithm,
    action: Action,
) -> Result<RunSummary, DedupeError> {
    let config = DedupeConfig::default()
        .with_algorithm(algorithm)
        .with_action(action);
    Deduplicator::new(config).run(directory)
}
