//! Fingerprint grouping of scanned files.
//!
//! # Overview
//!
//! Files are partitioned by fingerprint. A fingerprint seen exactly once is
//! not a duplicate and yields no group. Within a group, members keep the
//! order in which they were discovered, and groups themselves are ordered by
//! the discovery of their first member.
//!
//! # Example
//!
//! ```
//! use dedupe::duplicates::group_by_fingerprint;
//! use dedupe::scanner::FileRecord;
//! use std::path::PathBuf;
//!
//! let record = |name: &str, fp: &str| FileRecord {
//!     path: PathBuf::from(name),
//!     name: name.to_string(),
//!     fingerprint: fp.to_string(),
//!     size: 4,
//! };
//!
//! let groups = group_by_fingerprint(vec![
//!     record("a.txt", "aa"),
//!     record("b.txt", "bb"),
//!     record("c.txt", "aa"),
//! ]);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].kept().name, "a.txt");
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::scanner::FileRecord;

/// All scanned files sharing one fingerprint, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Shared fingerprint
    pub fingerprint: String,
    /// Members in discovery order; index 0 is kept
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The first-discovered member, which is always retained.
    ///
    /// # Panics
    ///
    /// Panics if the group is empty. Groups built by
    /// [`group_by_fingerprint`] always hold at least two files.
    #[must_use]
    pub fn kept(&self) -> &FileRecord {
        &self.files[0]
    }

    /// Members to be removed or moved aside (everything after the first).
    #[must_use]
    pub fn redundant(&self) -> &[FileRecord] {
        self.files.get(1..).unwrap_or_default()
    }

    /// Bytes held by the redundant copies.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.redundant().iter().map(|f| f.size).sum()
    }
}

/// Statistics from the grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of records grouped
    pub total_files: usize,
    /// Number of distinct fingerprints
    pub unique_fingerprints: usize,
    /// Number of fingerprints with 2+ files
    pub duplicate_groups: usize,
    /// Number of files that would be removed (all copies minus one per group)
    pub redundant_files: usize,
}

/// Partition `records` by fingerprint, keeping only groups with 2+ members.
#[must_use]
pub fn group_by_fingerprint(records: Vec<FileRecord>) -> Vec<DuplicateGroup> {
    group_with_stats(records).0
}

/// Like [`group_by_fingerprint`], also returning [`GroupingStats`].
#[must_use]
pub fn group_with_stats(records: Vec<FileRecord>) -> (Vec<DuplicateGroup>, GroupingStats) {
    let mut stats = GroupingStats {
        total_files: records.len(),
        ..Default::default()
    };

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for record in records {
        match index.get(&record.fingerprint) {
            Some(&slot) => groups[slot].files.push(record),
            None => {
                index.insert(record.fingerprint.clone(), groups.len());
                groups.push(DuplicateGroup {
                    fingerprint: record.fingerprint.clone(),
                    files: vec![record],
                });
            }
        }
    }

    stats.unique_fingerprints = groups.len();
    groups.retain(|g| g.len() > 1);
    stats.duplicate_groups = groups.len();
    stats.redundant_files = groups.iter().map(|g| g.len() - 1).sum();

    for group in &groups {
        log::debug!(
            "Group {}: {:?}",
            group.fingerprint,
            group.files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>()
        );
    }

    (groups, stats)
}
