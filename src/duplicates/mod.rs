//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Fingerprinting eligible files (optionally on a bounded worker pool)
//! - Grouping files by fingerprint
//! - Running the whole scan-and-resolve pipeline via [`Deduplicator`]

pub mod finder;
pub mod groups;

pub use finder::{run, DedupeConfig, DedupeError, Deduplicator, RunError, RunSummary};
pub use groups::{group_by_fingerprint, group_with_stats, DuplicateGroup, GroupingStats};
