//! JSON output formatter for run summaries.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "fingerprint": "5eb63bbbe01eeed093cb22bb8f5acdc3",
//!       "kept": "a.txt",
//!       "removed": [
//!         { "name": "b.txt", "destination": "/dir/duplicates/b.txt", "size": 11 }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "directory": "/dir",
//!     "algorithm": "md5",
//!     "action": "move",
//!     "dry_run": false,
//!     "files_scanned": 3,
//!     "duplicate_groups": 1,
//!     "files_removed": 1,
//!     "bytes_reclaimed": 11,
//!     "duplicates_dir": "/dir/duplicates",
//!     "errors": [],
//!     "interrupted": false,
//!     "duration_ms": 4,
//!     "exit_code": 0,
//!     "exit_code_name": "DD000"
//!   }
//! }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dedupe::duplicates::Deduplicator;
//! use dedupe::error::ExitCode;
//! use dedupe::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let summary = Deduplicator::with_defaults().run(Path::new(".")).unwrap();
//! let output = JsonOutput::new(&summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

use std::io::Write;

use serde::Serialize;

use crate::actions::{Action, GroupResolution};
use crate::duplicates::{RunError, RunSummary};
use crate::error::ExitCode;
use crate::scanner::HashAlgorithm;

/// A moved or deleted copy in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRemoval {
    /// File name in the scanned directory
    pub name: String,
    /// Path under `duplicates/`; absent for deletions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// File size in bytes
    pub size: u64,
}

/// A resolved duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// Hex digest shared by the group
    pub fingerprint: String,
    /// Name of the copy left in place
    pub kept: String,
    /// Copies removed or moved aside
    pub removed: Vec<JsonRemoval>,
}

impl From<&GroupResolution> for JsonGroup {
    fn from(group: &GroupResolution) -> Self {
        Self {
            fingerprint: group.fingerprint.clone(),
            kept: group.kept.clone(),
            removed: group
                .removed
                .iter()
                .map(|r| JsonRemoval {
                    name: r.name.clone(),
                    destination: r
                        .destination
                        .as_ref()
                        .map(|d| d.to_string_lossy().into_owned()),
                    size: r.size,
                })
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Scanned directory
    pub directory: String,
    /// Fingerprint algorithm
    pub algorithm: HashAlgorithm,
    /// Resolution action
    pub action: Action,
    /// Whether nothing was modified
    pub dry_run: bool,
    /// Number of files fingerprinted
    pub files_scanned: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Copies removed or moved aside
    pub files_removed: usize,
    /// Bytes held by those copies
    pub bytes_reclaimed: u64,
    /// `duplicates/` location if it was used
    pub duplicates_dir: Option<String>,
    /// Files skipped because of errors
    pub errors: Vec<RunError>,
    /// Whether the run stopped early
    pub interrupted: bool,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a run summary and an exit code.
    #[must_use]
    pub fn from_run_summary(summary: &RunSummary, exit_code: ExitCode) -> Self {
        Self {
            directory: summary.directory.to_string_lossy().into_owned(),
            algorithm: summary.algorithm,
            action: summary.action,
            dry_run: summary.dry_run,
            files_scanned: summary.files_scanned,
            duplicate_groups: summary.duplicate_groups,
            files_removed: summary.files_removed,
            bytes_reclaimed: summary.bytes_reclaimed,
            duplicates_dir: summary
                .duplicates_dir
                .as_ref()
                .map(|d| d.to_string_lossy().into_owned()),
            errors: summary.errors.clone(),
            interrupted: summary.interrupted,
            duration_ms: summary.duration_ms,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Resolved groups, in resolution order
    pub groups: Vec<JsonGroup>,
    /// Run statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from a run summary and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use dedupe::duplicates::RunSummary;
    /// use dedupe::error::ExitCode;
    /// use dedupe::output::json::JsonOutput;
    ///
    /// let output = JsonOutput::new(&RunSummary::default(), ExitCode::Success);
    /// assert!(output.groups.is_empty());
    /// assert_eq!(output.summary.exit_code_name, "DD000");
    /// ```
    #[must_use]
    pub fn new(summary: &RunSummary, exit_code: ExitCode) -> Self {
        Self {
            groups: summary.groups.iter().map(JsonGroup::from).collect(),
            summary: JsonSummary::from_run_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON output: {0}")]
    Io(#[from] std::io::Error),
}
