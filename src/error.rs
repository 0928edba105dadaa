//! Error taxonomy for per-unit extraction failures.
//!
//! The CLI layer uses `anyhow` for input-level failures. The variants here describe
//! failures of a single unit of work (one database, one record) so that callers can
//! tell a failed safe copy apart from a decode failure and keep batch runs going.

use std::path::PathBuf;

use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// Copying the store into a temporary snapshot failed (disk space, permissions).
    #[error("could not safely copy database {path}: {source}")]
    AcquisitionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The decode backend cannot open the store at all.
    #[error("failed to open database {path}: {message}")]
    DecodeFatal { path: PathBuf, message: String },

    /// One record could not be decoded; the rest of the object store is unaffected.
    #[error("failed to decode record{}: {message}", record_key_suffix(.key))]
    DecodeRecordFailed { key: Option<String>, message: String },

    #[error("path not found: {0}")]
    NotFound(PathBuf),
}

fn record_key_suffix(key: &Option<String>) -> String {
    key.as_deref().map(|k| format!(" {}", k)).unwrap_or_default()
}

impl ExtractError {
    pub fn decode_fatal(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DecodeFatal { path: path.into(), message: message.into() }
    }

    pub fn record_failed(key: Option<String>, message: impl Into<String>) -> Self {
        Self::DecodeRecordFailed { key, message: message.into() }
    }

    /// True for the failures that belong to the safe-copy stage rather than decoding.
    pub fn is_acquisition(&self) -> bool {
        matches!(self, Self::AcquisitionFailed { .. })
    }
}
