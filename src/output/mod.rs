//! Output formatters for run summaries.
//!
//! - [`TextOutput`] prints the familiar one-line messages, plus per-group
//!   detail when verbose
//! - [`JsonOutput`] for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dedupe::duplicates::Deduplicator;
//! use dedupe::output::TextOutput;
//! use std::path::Path;
//!
//! let summary = Deduplicator::with_defaults().run(Path::new(".")).unwrap();
//! print!("{}", TextOutput::new(&summary, false).render());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;
