//! Error types for ambxst-core.
//!
//! The dock defaults, notification formatter and shader generator are total
//! and never return these. Only file and process edges do.

use std::path::PathBuf;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ambxst-core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be written out as JSON.
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A color string was not `#rrggbb`.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The wallpaper config has no usable `wallPath`.
    #[error("wallPath not found in config")]
    MissingWallPath,

    /// A wallpaper file or directory does not exist.
    #[error("not found: {0}")]
    NotFound(PathBuf),

    /// An external tool exited unsuccessfully or could not be started.
    #[error("{program} failed: {reason}")]
    Command { program: String, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
