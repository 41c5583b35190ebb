//! Schema validation for metadata record files

use super::schema::{ESSENTIAL_TEXT_FIELDS, LIST_FIELDS, REQUIRED_FIELDS};
use super::{FieldValue, VideoRecord};
use crate::error::{ErrorKind, RecordError};
use crate::storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Default record file extension
pub const RECORD_EXTENSION: &str = "json";

/// Validates metadata records, singly, from files, or a directory at a time
#[derive(Debug, Clone)]
pub struct RecordValidator {
    /// Extension (without the dot) identifying record files
    extension: String,
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordValidator {
    /// Create a validator for `.json` record files
    pub fn new() -> Self {
        Self {
            extension: RECORD_EXTENSION.to_string(),
        }
    }

    /// Use a different record file extension
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Validate one record.
    ///
    /// Checks run in order and stop at the first failure: the value is an
    /// object, every required field is present, list fields hold lists,
    /// then the essential fields have content.
    pub fn validate_record(&self, record: &Value) -> Result<(), RecordError> {
        match record {
            Value::Object(fields) => Self::validate_fields(fields),
            other => Err(RecordError::NotAnObject {
                found: FieldValue::of(Some(other)).type_name(),
            }),
        }
    }

    /// Validate an already-parsed record
    pub fn validate(&self, record: &VideoRecord) -> Result<(), RecordError> {
        Self::validate_fields(record.as_map())
    }

    fn validate_fields(fields: &Map<String, Value>) -> Result<(), RecordError> {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !fields.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(RecordError::MissingFields { fields: missing });
        }

        for field in LIST_FIELDS {
            match FieldValue::of(fields.get(field)) {
                FieldValue::List(_) | FieldValue::Missing => {}
                other => {
                    return Err(RecordError::NotAList {
                        field,
                        found: other.type_name(),
                    })
                }
            }
        }

        for field in ESSENTIAL_TEXT_FIELDS {
            let value = FieldValue::of(fields.get(field));
            if !value.has_content() {
                return Err(RecordError::EmptyField {
                    field,
                    value: value.describe(),
                });
            }
        }

        for field in LIST_FIELDS {
            let value = FieldValue::of(fields.get(field));
            let non_empty = match value {
                FieldValue::List(items) => !items.is_empty(),
                _ => false,
            };
            if !non_empty {
                return Err(RecordError::EmptyField {
                    field,
                    value: value.describe(),
                });
            }
        }

        Ok(())
    }

    /// Read a record file and validate it
    pub fn validate_file(&self, path: &Path) -> Result<(), RecordError> {
        let record = storage::read_json(path)?;
        self.validate_record(&record)
    }

    /// Validate every record file directly inside `directory`.
    ///
    /// A bad file is recorded in the report and the scan moves on. A missing
    /// directory yields an empty report.
    pub fn validate_directory(&self, directory: &Path) -> DirectoryReport {
        let mut report = DirectoryReport::empty(directory);

        if !directory.is_dir() {
            if directory.exists() {
                error!("Not a directory: {}", directory.display());
            } else {
                error!("Directory does not exist: {}", directory.display());
            }
            return report;
        }

        let files = self.record_files(directory);
        report.total_files = files.len();

        for path in files {
            let name = file_label(&path);
            match self.validate_file(&path) {
                Ok(()) => {
                    report.valid_files += 1;
                    info!("✓ {}: Valid video info", name);
                }
                Err(e) => {
                    report.invalid_files += 1;
                    error!("✗ {}: {}", name, e);
                    report.errors.push(FileFailure::new(name, &e));
                }
            }
        }

        info!(
            "📊 Validation summary for {}: {} total, {} valid, {} invalid",
            directory.display(),
            report.total_files,
            report.valid_files,
            report.invalid_files
        );

        report
    }

    /// Record files directly inside `directory`, sorted by path
    pub fn record_files(&self, directory: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let walker = WalkDir::new(directory).follow_links(true).min_depth(1).max_depth(1);
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", directory.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_record_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!("📁 Found {} record files in {}", files.len(), directory.display());
        files
    }

    /// Check if a path carries the record extension
    pub fn is_record_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// One file that failed validation or repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFailure {
    /// File name within the scanned directory
    pub file: String,

    /// Failure classification
    pub kind: ErrorKind,

    /// Human-readable reason
    pub error: String,
}

impl FileFailure {
    pub fn new(file: String, error: &RecordError) -> Self {
        Self {
            file,
            kind: error.kind(),
            error: error.to_string(),
        }
    }
}

/// Outcome of validating a directory of record files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryReport {
    /// Directory that was scanned
    pub directory: PathBuf,

    /// When the scan ran
    pub checked_at: DateTime<Utc>,

    pub total_files: usize,
    pub valid_files: usize,
    pub invalid_files: usize,

    /// One entry per invalid file
    pub errors: Vec<FileFailure>,
}

impl DirectoryReport {
    fn empty(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            checked_at: Utc::now(),
            total_files: 0,
            valid_files: 0,
            invalid_files: 0,
            errors: Vec::new(),
        }
    }

    /// True when no file failed
    pub fn is_clean(&self) -> bool {
        self.invalid_files == 0
    }

    /// Percentage of valid files (100 for an empty directory)
    pub fn success_rate(&self) -> f64 {
        if self.total_files > 0 {
            self.valid_files as f64 / self.total_files as f64 * 100.0
        } else {
            100.0
        }
    }
}
