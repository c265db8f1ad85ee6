//! Error type definitions for the cinema administration crate
//!
//! Each layer owns its error enum. `AppError` sits on top and converts from
//! all of them so boundary callers only deal with one type.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::RecordKind;
use crate::pipeline::PipelineError;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// In-memory dataset errors
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Snapshot codec errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Pipeline coordination errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report rendering or writing errors
    #[error("Report error: {message}")]
    Report { message: String },
}

/// Errors raised by index-addressed dataset operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("Index {index} out of range for {kind} (len {len})")]
    IndexOutOfRange {
        kind: RecordKind,
        index: usize,
        len: usize,
    },
}

/// Errors raised by the text and markup snapshot codecs
#[derive(Error, Debug)]
pub enum CodecError {
    /// File unreadable or unwritable
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed structured markup
    #[error("Parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to write default config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

impl AppError {
    /// Create a report error
    pub fn report<S: Into<String>>(message: S) -> Self {
        Self::Report {
            message: message.into(),
        }
    }
}

impl CodecError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a parse error for the given file
    pub fn parse(path: impl AsRef<Path>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
