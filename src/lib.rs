//! Scraper Integrity - config store and metadata record validation
//!
//! Guarantees that the JSON state the scraper persists (its configuration
//! document and the per-video metadata records) is well-formed before
//! anything else consumes it.

pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod storage;

// Re-export main types for easy access
pub use crate::config::{BatchSettings, ConfigDocument, ConfigStore, LoggingSettings};
pub use crate::error::{ConfigError, ErrorKind, RecordError, StorageError};
pub use crate::record::{
    compute_defaults, DirectoryReport, FieldValue, FileFailure, RecordValidator, RepairOutcome,
    RepairReport, VideoRecord,
};
