//! Duplicate resolution: delete or move aside every copy but the first.
//!
//! # Overview
//!
//! For each [`DuplicateGroup`] the first-discovered member is left untouched.
//! Every later member is either removed permanently ([`Action::Delete`]) or
//! renamed into `<directory>/duplicates/` ([`Action::MoveAside`]).
//!
//! # Destination names
//!
//! A move never overwrites. When `duplicates/<name>` is taken, the file is
//! stored as `<stem>-<first 8 hex of fingerprint>.<ext>`, and if that is taken
//! too, a numeric suffix is appended (`<stem>-<tag>-1.<ext>`, `-2`, ...).
//!
//! # Example
//!
//! ```no_run
//! use dedupe::actions::{Action, Resolver};
//! use dedupe::duplicates::group_by_fingerprint;
//! use std::path::Path;
//!
//! # let records = Vec::new();
//! let mut resolver = Resolver::new(Path::new("/photos"), Action::MoveAside);
//! for group in group_by_fingerprint(records) {
//!     let (resolution, _) = resolver.resolve_group(&group, false).unwrap();
//!     println!("kept {}", resolution.kept);
//! }
//! ```

use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;
use crate::scanner::FileRecord;

/// Name of the sub-directory that receives moved duplicates.
pub const DUPLICATES_DIR: &str = "duplicates";

/// Length of the fingerprint prefix used to disambiguate destination names.
const FINGERPRINT_TAG_LEN: usize = 8;

/// What to do with redundant copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Relocate into `duplicates/`, preserving the base name.
    #[default]
    #[serde(rename = "move")]
    MoveAside,
    /// Remove permanently.
    Delete,
}

impl Action {
    /// Map the CLI's "remove" flag to an action.
    #[must_use]
    pub fn from_remove_flag(remove: bool) -> Self {
        if remove {
            Self::Delete
        } else {
            Self::MoveAside
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveAside => f.write_str("move"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Error type for resolution operations.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The `duplicates/` directory could not be created.
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Something other than a directory occupies the `duplicates/` name.
    #[error("{0} exists and is not a directory")]
    NotADirectory(PathBuf),

    /// Renaming a duplicate into `duplicates/` failed.
    #[error("failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Removing a duplicate failed.
    #[error("failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDir { path, .. } | Self::NotADirectory(path) | Self::Delete { path, .. } => {
                path
            }
            Self::Move { from, .. } => from,
        }
    }
}

/// One redundant copy that was (or, in a dry run, would be) resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    /// Base name of the copy
    pub name: String,
    /// Original location
    pub path: PathBuf,
    /// New location for moves, `None` for deletions
    pub destination: Option<PathBuf>,
    /// Size in bytes at scan time
    pub size: u64,
}

/// Outcome of resolving one duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupResolution {
    /// Shared fingerprint
    pub fingerprint: String,
    /// Name of the retained file
    pub kept: String,
    /// Copies that were removed or moved
    pub removed: Vec<Removal>,
}

/// Applies an [`Action`] to duplicate groups inside one directory.
#[derive(Debug)]
pub struct Resolver {
    directory: PathBuf,
    action: Action,
    dry_run: bool,
    dir_ready: bool,
    claimed: HashSet<PathBuf>,
}

impl Resolver {
    /// Create a resolver for `directory`.
    #[must_use]
    pub fn new(directory: &Path, action: Action) -> Self {
        Self {
            directory: directory.to_path_buf(),
            action,
            dry_run: false,
            dir_ready: false,
            claimed: HashSet::new(),
        }
    }

    /// Plan resolutions without touching the file system.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Location of the `duplicates/` directory.
    #[must_use]
    pub fn duplicates_dir(&self) -> PathBuf {
        self.directory.join(DUPLICATES_DIR)
    }

    /// `true` once `duplicates/` was created or a move into it was planned.
    #[must_use]
    pub fn used_duplicates_dir(&self) -> bool {
        self.dir_ready || !self.claimed.is_empty()
    }

    /// Create `duplicates/` if it does not exist yet.
    ///
    /// Safe to call repeatedly and from several processes at once: an
    /// "already exists" outcome is accepted as long as it is a real
    /// directory. A symlink is rejected even if it points at one, so moves
    /// never leave the scanned directory.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CreateDir`] or [`ResolveError::NotADirectory`].
    pub fn ensure_duplicates_dir(&mut self) -> Result<PathBuf, ResolveError> {
        let dir = self.duplicates_dir();
        if self.dir_ready || self.dry_run {
            return Ok(dir);
        }

        match fs::create_dir(&dir) {
            Ok(()) => log::debug!("Created {}", dir.display()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let is_real_dir = fs::symlink_metadata(&dir).is_ok_and(|m| m.is_dir());
                if !is_real_dir {
                    return Err(ResolveError::NotADirectory(dir));
                }
            }
            Err(source) => return Err(ResolveError::CreateDir { path: dir, source }),
        }

        self.dir_ready = true;
        Ok(dir)
    }

    /// Resolve every member after the first.
    ///
    /// With `continue_on_error` a failing member is recorded and skipped;
    /// otherwise the first failure is returned and later members are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`] when `continue_on_error` is false.
    pub fn resolve_group(
        &mut self,
        group: &DuplicateGroup,
        continue_on_error: bool,
    ) -> Result<(GroupResolution, Vec<ResolveError>), ResolveError> {
        let mut resolution = GroupResolution {
            fingerprint: group.fingerprint.clone(),
            kept: group.files.first().map(|f| f.name.clone()).unwrap_or_default(),
            removed: Vec::with_capacity(group.len().saturating_sub(1)),
        };
        let mut failures = Vec::new();

        for record in group.redundant() {
            match self.resolve_file(record) {
                Ok(removal) => resolution.removed.push(removal),
                Err(e) if continue_on_error => {
                    log::warn!("{e}");
                    failures.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok((resolution, failures))
    }

    /// Apply the action to one redundant copy.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] if the file cannot be moved or deleted.
    pub fn resolve_file(&mut self, record: &FileRecord) -> Result<Removal, ResolveError> {
        let destination = match self.action {
            Action::Delete => {
                if !self.dry_run {
                    fs::remove_file(&record.path).map_err(|source| ResolveError::Delete {
                        path: record.path.clone(),
                        source,
                    })?;
                }
                log::debug!("Deleted {}", record.path.display());
                None
            }
            Action::MoveAside => {
                self.ensure_duplicates_dir()?;
                let to = self.destination_for(record);
                if !self.dry_run {
                    fs::rename(&record.path, &to).map_err(|source| ResolveError::Move {
                        from: record.path.clone(),
                        to: to.clone(),
                        source,
                    })?;
                }
                log::debug!("Moved {} -> {}", record.path.display(), to.display());
                self.claimed.insert(to.clone());
                Some(to)
            }
        };

        Ok(Removal {
            name: record.name.clone(),
            path: record.path.clone(),
            destination,
            size: record.size,
        })
    }

    /// First free destination for `record` inside `duplicates/`.
    fn destination_for(&self, record: &FileRecord) -> PathBuf {
        let dir = self.duplicates_dir();
        let name = record
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(&record.name));

        let plain = dir.join(&name);
        if self.is_free(&plain) {
            return plain;
        }

        let as_path = Path::new(&name);
        let stem = as_path.file_stem().unwrap_or(name.as_os_str()).to_os_string();
        let ext = as_path.extension().map(|e| e.to_os_string());
        let tag: String = record.fingerprint.chars().take(FINGERPRINT_TAG_LEN).collect();

        let build = |suffix: Option<usize>| {
            let mut file = stem.clone();
            file.push("-");
            file.push(&tag);
            if let Some(n) = suffix {
                file.push(format!("-{n}"));
            }
            if let Some(ref ext) = ext {
                file.push(".");
                file.push(ext);
            }
            dir.join(file)
        };

        let tagged = build(None);
        if self.is_free(&tagged) {
            log::info!(
                "{} already taken, using {}",
                plain.display(),
                tagged.display()
            );
            return tagged;
        }

        let mut n = 1;
        loop {
            let candidate = build(Some(n));
            if self.is_free(&candidate) {
                log::info!(
                    "{} already taken, using {}",
                    plain.display(),
                    candidate.display()
                );
                return candidate;
            }
            n += 1;
        }
    }

    fn is_free(&self, candidate: &Path) -> bool {
        !self.claimed.contains(candidate) && fs::symlink_metadata(candidate).is_err()
    }
}
