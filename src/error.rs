//! Error types for the config store and the record validator

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Coarse classification of a failure, so callers can branch on the
/// cause instead of parsing the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The file does not exist
    NotFound,

    /// Any other local I/O failure (permissions, disk full, ...)
    Io,

    /// The file exists but does not contain valid JSON
    Malformed,

    /// Valid JSON that violates the record schema
    Schema,

    /// Repair was attempted but the result still violates the schema
    Unrepairable,

    /// Continuing would risk losing the only copy of a file
    Destructive,
}

impl ErrorKind {
    /// Get human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Io => "I/O error",
            ErrorKind::Malformed => "malformed JSON",
            ErrorKind::Schema => "schema violation",
            ErrorKind::Unrepairable => "unrepairable",
            ErrorKind::Destructive => "unsafe to continue",
        }
    }
}

/// Failures reading or writing JSON documents on disk
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("File does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in file {}: {source}", path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error reading file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::NotFound { .. } => ErrorKind::NotFound,
            StorageError::MalformedJson { .. } => ErrorKind::Malformed,
            StorageError::Read { .. } | StorageError::Write { .. } => ErrorKind::Io,
        }
    }
}

/// Config store errors. `ConfigStore::load` and `ConfigStore::save` never
/// surface these; they only reach callers of the fallible variants.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Config file {} must contain a JSON object at the top level", path.display())]
    NotAnObject { path: PathBuf },

    #[error("Config section '{section}' is not an object")]
    SectionNotAnObject { section: String },

    #[error("Failed to create config directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Record validation and repair errors
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("video_info must be a dictionary, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Missing required fields: {fields:?}")]
    MissingFields { fields: Vec<&'static str> },

    #[error("Field '{field}' must be a list, got {found}")]
    NotAList {
        field: &'static str,
        found: &'static str,
    },

    #[error("Field '{field}' is empty or invalid: {value}")]
    EmptyField { field: &'static str, value: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Could not repair file: {reason}")]
    Unrepairable { reason: Box<RecordError> },

    #[error("Could not back up {} to {}: {source}", path.display(), backup.display())]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Error writing repaired file {} (original kept at {}): {source}",
        path.display(),
        backup.display()
    )]
    Write {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RecordError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordError::NotAnObject { .. }
            | RecordError::MissingFields { .. }
            | RecordError::NotAList { .. }
            | RecordError::EmptyField { .. } => ErrorKind::Schema,
            RecordError::Storage(err) => err.kind(),
            RecordError::Unrepairable { .. } => ErrorKind::Unrepairable,
            RecordError::Backup { .. } => ErrorKind::Destructive,
            RecordError::Write { .. } => ErrorKind::Io,
        }
    }
}
