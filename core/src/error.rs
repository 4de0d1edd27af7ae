//! Error types for zhvocab-core.
//!
//! Only startup can fail: a required resource is missing or unreadable, a
//! snapshot cannot be decoded, or a config file does not parse. Query-time
//! operations never return errors.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for loading reference data and configuration.
#[derive(Debug, Error)]
pub enum VocabError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The frequency table could not be read as delimited text.
    #[error("frequency table: {0}")]
    Csv(#[from] csv::Error),

    /// A resource the registry cannot work without does not exist.
    #[error("required {kind} resource not found at {}", .path.display())]
    MissingResource { kind: &'static str, path: PathBuf },

    /// The frequency table header does not name a required column.
    #[error("frequency table header has no `{column}` column")]
    MissingColumn { column: String },

    /// A bincode snapshot could not be written or decoded.
    #[error("snapshot: {0}")]
    Snapshot(#[from] bincode::Error),

    /// A TOML configuration could not be parsed.
    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration could not be serialized.
    #[error("config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

/// A convenience `Result` type alias using the crate's `VocabError` type.
pub type Result<T> = std::result::Result<T, VocabError>;
