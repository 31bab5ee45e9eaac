//! Error taxonomy shared by the library.
//!
//! Fetch failures are the only kind the core tolerates (see
//! [`crate::catalog::FetchPolicy`]); everything else aborts the current
//! lookup and is reported by the binary.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A remote catalog source could not be fetched or decoded.
    #[error("fetching {source_name} catalog from {url}: {message}")]
    Fetch {
        source_name: &'static str,
        url: String,
        message: String,
    },

    /// The local cache could not be created, written, or read back.
    #[error("package cache at {}: {message}", .path.display())]
    Cache { path: PathBuf, message: String },

    /// An approved command could not be launched or exited unsuccessfully.
    #[error("running `{command}`: {message}")]
    Exec { command: String, message: String },

    /// An environment setting could not be interpreted.
    #[error("configuration: {0}")]
    Config(String),

    /// The command line was malformed.
    #[error("{0}")]
    Usage(String),
}

impl Error {
    pub(crate) fn cache(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Cache {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn exec(command: &str, message: impl ToString) -> Self {
        Error::Exec {
            command: command.to_string(),
            message: message.to_string(),
        }
    }

    /// True for failures of the remote catalog.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch { .. })
    }
}
