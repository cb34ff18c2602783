use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while registering a host.
///
/// Uninstall never produces these; its failures are reported through
/// [`crate::install::Uninstalled`] and the log.
#[derive(Debug, Error)]
pub enum RegistrarError {
    #[error("failed to create manifest directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid native messaging host name {0:?}: use lowercase letters, digits, `_` and single dots")]
    InvalidHostName(String),

    #[error("cannot determine the user's home directory")]
    HomeDirUnavailable,

    #[error("native messaging manifests are not supported on this platform")]
    UnsupportedPlatform,

    #[error("failed to read host config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid host config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, RegistrarError>;
