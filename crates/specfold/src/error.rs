//! Errors surfaced by the specfold pipeline and CLI.

use std::path::PathBuf;

use specfold_openapi::SpecError;
use thiserror::Error;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Normalizing, merging or writing failed.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// The config file is not valid TOML for [`crate::Config`].
    #[error("Failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Reading an input failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file exists but does not hold fragments.
    #[error("Invalid fragment source {}: {message}", path.display())]
    Source { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_source(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Source {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for specfold operations.
pub type Result<T> = std::result::Result<T, Error>;
