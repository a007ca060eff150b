//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config <PATH>` or `<platform config dir>/config.toml`)
//! 3. `DEDUPE_*` environment variables (e.g. `DEDUPE_ALGORITHM=sha256`)
//! 4. Command-line flags (applied by the caller)
//!
//! ```toml
//! algorithm = "blake3"
//! chunk_size = 131072
//! io_threads = 4
//! remove = false
//! continue_on_error = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::{HashAlgorithm, DEFAULT_CHUNK_SIZE};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DEDUPE_";

/// Default number of hashing workers.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Errors raised by configuration handling.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The hash algorithm name is not one of the supported algorithms.
    #[error("unsupported hash algorithm '{0}' (expected md5, sha1, sha256 or blake3)")]
    UnsupportedAlgorithm(String),

    /// A zero chunk size was requested.
    #[error("chunk size must be at least 1 byte")]
    InvalidChunkSize,

    /// A zero worker count was requested.
    #[error("I/O thread count must be at least 1")]
    InvalidIoThreads,

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    MissingFile(PathBuf),

    /// The layered configuration could not be extracted.
    #[error("failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),
}

/// Persistent settings for a deduplication run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Digest algorithm used to fingerprint files.
    pub algorithm: HashAlgorithm,
    /// Read chunk size in bytes.
    pub chunk_size: usize,
    /// Number of hashing workers.
    pub io_threads: usize,
    /// Delete duplicates instead of moving them aside.
    pub remove: bool,
    /// Skip failing files instead of aborting the run.
    pub continue_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            io_threads: DEFAULT_IO_THREADS,
            remove: false,
            continue_on_error: false,
        }
    }
}

impl Config {
    /// Load the layered configuration.
    ///
    /// With `file = None` the platform default path is used, and a missing
    /// file there is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit file is missing, a layer fails to
    /// parse, or the merged values are invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match file {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path(),
        };

        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(ref path) = path {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Self::extract(figment)
    }

    /// Extract and validate a configuration from an assembled figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] on extraction failure, or a validation error.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidChunkSize`] or [`ConfigError::InvalidIoThreads`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        if self.io_threads == 0 {
            return Err(ConfigError::InvalidIoThreads);
        }
        Ok(())
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dedupe", "dedupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
