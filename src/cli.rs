//! Command-line interface definitions for dedupe.
//!
//! # Example
//!
//! ```bash
//! # Move duplicates into ~/Pictures/Wallpapers/duplicates/
//! dedupe ~/Pictures/Wallpapers
//!
//! # Delete duplicates, comparing BLAKE3 hashes
//! dedupe --remove --hash blake3 ~/Pictures/Wallpapers
//!
//! # Show what would happen, as JSON
//! dedupe --dry-run --output json ~/Downloads
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigError};
use crate::scanner::HashAlgorithm;

/// Find duplicate files in a folder by content hash.
///
/// All but the first copy of each duplicate are moved into a `duplicates/`
/// sub-folder, or deleted with `--remove`. Hidden files and sub-folders are
/// never touched.
#[derive(Debug, Parser)]
#[command(name = "dedupe")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:\n  dedupe ~/Pictures/Wallpapers\n  dedupe --remove ~/Pictures/Wallpapers")]
pub struct Cli {
    /// Folder to de-duplicate (not searched recursively)
    #[arg(value_name = "FOLDER", value_parser = parse_folder)]
    pub folder: PathBuf,

    /// Remove duplicate files instead of moving them to FOLDER/duplicates/
    #[arg(short, long, visible_alias = "rm")]
    pub remove: bool,

    /// Hash algorithm for comparing files [md5, sha1, sha256, blake3]
    #[arg(long = "hash", value_name = "ALGORITHM", value_parser = parse_algorithm)]
    pub hash: Option<HashAlgorithm>,

    /// Read buffer size used while hashing (e.g., 64KiB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub chunk_size: Option<u64>,

    /// Number of files hashed in parallel
    #[arg(short = 'j', long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Skip files that cannot be read, moved or deleted instead of stopping
    #[arg(long)]
    pub keep_going: bool,

    /// Show what would be done without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output format for the run summary
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable debugging (same as -v, hides the progress bar)
    #[arg(short, long)]
    pub debug: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Configuration file (default: platform config dir/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Effective verbosity, counting `--debug` as one `-v`.
    #[must_use]
    pub fn verbosity(&self) -> u8 {
        self.verbose.max(u8::from(self.debug))
    }

    /// Whether progress bars should be drawn.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.verbosity() == 0 && self.output == OutputFormat::Text
    }

    /// Apply command-line overrides on top of the layered configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the merged values are invalid.
    pub fn apply_to(&self, mut config: Config) -> Result<Config, ConfigError> {
        if let Some(algorithm) = self.hash {
            config.algorithm = algorithm;
        }
        if let Some(size) = self.chunk_size {
            config.chunk_size =
                usize::try_from(size).map_err(|_| ConfigError::InvalidChunkSize)?;
        }
        if let Some(threads) = self.io_threads {
            config.io_threads = threads;
        }
        config.remove |= self.remove;
        config.continue_on_error |= self.keep_going;
        config.validate()?;
        Ok(config)
    }
}

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable messages
    Text,
    /// JSON document for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse an algorithm name case-insensitively.
///
/// # Errors
///
/// Returns the [`ConfigError`] message for unknown names.
pub fn parse_algorithm(s: &str) -> Result<HashAlgorithm, String> {
    s.parse().map_err(|e: ConfigError| e.to_string())
}

/// Check that the folder exists and is a directory.
///
/// # Errors
///
/// Returns a message if the path is missing or is not a directory.
pub fn parse_folder(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if !path.exists() {
        return Err(format!("Folder '{s}' does not exist"));
    }
    if !path.is_dir() {
        return Err(format!("'{s}' is a file, not a folder"));
    }
    Ok(path)
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dedupe::cli::parse_size;
///
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// an unknown size suffix, or evaluates to zero bytes.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    let bytes = (num * multiplier as f64) as u64;
    if bytes == 0 {
        return Err("Size must be at least 1 byte".to_string());
    }
    Ok(bytes)
}
