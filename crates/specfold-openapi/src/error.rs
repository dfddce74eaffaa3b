//! Error types for fragment merging.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while normalizing, merging or writing fragments.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A fragment has no `paths` object; the whole run is aborted.
    #[error("Fragment '{title}' has no paths object")]
    MissingPaths { title: String },

    /// Fragment spec data is not shaped like an OpenAPI document.
    #[error("Invalid spec in fragment '{title}': {message}")]
    InvalidSpec { title: String, message: String },

    /// Two fragments define the same path and collisions are rejected.
    #[error("Path '{path}' is defined by both '{first}' and '{second}'")]
    PathConflict {
        path: String,
        first: String,
        second: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure writing an artifact.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SpecError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
