//! Defines the `Error` and `Result` types used by this crate.

use std::path::PathBuf;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error returned by all fallible operations within this crate.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// A generic error message.
    #[error("{0}")]
    Message(String),

    /// A value reached the formatter in a position where it cannot be rendered as a literal. The
    /// payload is the descriptive type name of the offending value.
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// A file that should be spliced into the output could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        /// The path of the file.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The output destination could not be opened or written.
    #[error("failed to write {}: {source}", .path.display())]
    FileWrite {
        /// The path of the destination.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Error while formatting block text.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),

    /// IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error emitted by serde_json.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Error emitted by serde_yaml.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Deserialization error emitted by toml.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn new<T>(message: T) -> Self
    where
        T: AsRef<str>,
    {
        Self::Message(message.as_ref().to_string())
    }

    pub(crate) fn unsupported<T>(type_name: T) -> Self
    where
        T: AsRef<str>,
    {
        Self::UnsupportedValueType(type_name.as_ref().to_string())
    }
}
