//! Scanner module for directory enumeration and file hashing.
//!
//! This module provides functionality for:
//! - Listing the direct entries of one directory (no recursion)
//! - Filtering out hidden entries and sub-directories
//! - Content hashing with a selectable algorithm
//!
//! # Architecture
//!
//! - [`hasher`]: streaming digest of file content
//! - [`list_eligible`]: enumeration and eligibility filter
//!
//! # Example
//!
//! ```no_run
//! use dedupe::scanner::list_eligible;
//! use std::path::Path;
//!
//! for entry in list_eligible(Path::new(".")).unwrap() {
//!     println!("{}", entry.name);
//! }
//! ```

pub mod hasher;

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

// Re-export main types
pub use hasher::{hash_file, HashAlgorithm, HashError, Hasher, DEFAULT_CHUNK_SIZE};

/// A directory entry that passed the eligibility filter but has not been hashed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleEntry {
    /// Full path to the entry
    pub path: PathBuf,
    /// Base name, used for display and for move destinations
    pub name: String,
    /// Size in bytes, if metadata was readable
    pub size: Option<u64>,
}

/// One eligible file with its content fingerprint.
///
/// Records are built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Full path to the file
    pub path: PathBuf,
    /// Base name of the file
    pub name: String,
    /// Hex-encoded content digest
    pub fingerprint: String,
    /// Size in bytes at scan time
    pub size: u64,
}

impl FileRecord {
    /// Create a record from an eligible entry and its digest.
    #[must_use]
    pub fn new(entry: EligibleEntry, fingerprint: String) -> Self {
        Self {
            path: entry.path,
            name: entry.name,
            fingerprint,
            size: entry.size.unwrap_or(0),
        }
    }
}

/// Errors that can occur while enumerating the directory.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The directory itself could not be listed.
    #[error("failed to list {path}: {source}")]
    ReadDir {
        /// Directory being listed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Check whether a file name carries the hidden-file marker (leading `.`).
#[must_use]
pub fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// List the eligible files directly inside `directory`.
///
/// Hidden entries and sub-directories (including symlinks that resolve to
/// directories) are skipped. Entries are returned in the order the file
/// system reports them; no sort is applied.
///
/// An entry whose metadata cannot be read is still returned, so the failure
/// surfaces when the file is hashed.
///
/// # Errors
///
/// Returns [`ScanError::ReadDir`] if the directory cannot be listed or an
/// entry cannot be read from the listing.
pub fn list_eligible(directory: &Path) -> Result<Vec<EligibleEntry>, ScanError> {
    let read_dir_err = |source| ScanError::ReadDir {
        path: directory.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let file_name = entry.file_name();

        if is_hidden(&file_name) {
            log::trace!("Skipping hidden entry: {}", entry.path().display());
            continue;
        }

        let path = entry.path();
        let size = match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                log::trace!("Skipping directory: {}", path.display());
                continue;
            }
            Ok(meta) => Some(meta.len()),
            Err(e) => {
                log::debug!("Cannot stat {}: {}", path.display(), e);
                None
            }
        };

        entries.push(EligibleEntry {
            name: file_name.to_string_lossy().into_owned(),
            path,
            size,
        });
    }

    log::debug!(
        "Found {} eligible file(s) in {}",
        entries.len(),
        directory.display()
    );
    Ok(entries)
}
