//! File actions module.
//!
//! Resolution of duplicate groups:
//! - Move redundant copies into a `duplicates/` sub-directory (default)
//! - Permanent deletion
//! - Dry-run planning of either, without touching the file system
//!
//! The first-discovered member of each group is always kept.

pub mod resolve;

// Re-export commonly used types
pub use resolve::{
    Action, GroupResolution, Removal, ResolveError, Resolver, DUPLICATES_DIR,
};
