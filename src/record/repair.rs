//! Best-effort repair of invalid metadata records

use super::schema::{default_value, LIST_FIELDS, REQUIRED_FIELDS};
use super::validator::{file_label, FileFailure, RecordValidator};
use super::FieldValue;
use crate::error::RecordError;
use crate::storage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// What a successful repair call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The record was valid; nothing was written
    AlreadyValid,

    /// The record was rewritten and the original moved to `backup`
    Repaired { backup: PathBuf },
}

impl fmt::Display for RepairOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairOutcome::AlreadyValid => write!(f, "File is already valid"),
            RepairOutcome::Repaired { backup } => write!(
                f,
                "File repaired successfully (backup saved as {})",
                backup.display()
            ),
        }
    }
}

/// Fill in defaults for missing or empty required fields and coerce the
/// list fields into lists. The input is left untouched.
pub fn compute_defaults(record: &Map<String, Value>) -> Map<String, Value> {
    let mut fixed = record.clone();

    for field in REQUIRED_FIELDS {
        if !FieldValue::of(fixed.get(field)).is_truthy() {
            if let Some(default) = default_value(field) {
                fixed.insert(field.to_string(), default);
            }
        }
    }

    for field in LIST_FIELDS {
        let coerced = match FieldValue::of(fixed.get(field)) {
            FieldValue::List(_) | FieldValue::Missing => continue,
            FieldValue::Text(text) if !text.is_empty() => Value::Array(vec![Value::String(text.to_string())]),
            _ => match default_value(field) {
                Some(default) => default,
                None => continue,
            },
        };
        fixed.insert(field.to_string(), coerced);
    }

    fixed
}

/// Outcome of repairing a directory of record files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairReport {
    pub total_files: usize,
    pub already_valid: usize,
    pub repaired: usize,

    /// One entry per file that could not be repaired
    pub failed: Vec<FileFailure>,
}

impl RecordValidator {
    /// Repair a record file in place.
    ///
    /// A valid file is left alone. Otherwise the defaults are applied and
    /// the result re-validated; if it still fails nothing is written. If it
    /// passes, the original is renamed to `<name>.backup` and the repaired
    /// record written to the original path. A failed rename aborts the
    /// repair with the original untouched.
    pub fn repair_file(&self, path: &Path) -> Result<RepairOutcome, RecordError> {
        let record = storage::read_json(path)?;

        if self.validate_record(&record).is_ok() {
            return Ok(RepairOutcome::AlreadyValid);
        }

        let fields = match record {
            Value::Object(fields) => fields,
            other => {
                return Err(RecordError::Unrepairable {
                    reason: Box::new(RecordError::NotAnObject {
                        found: FieldValue::of(Some(&other)).type_name(),
                    }),
                })
            }
        };

        let repaired = Value::Object(compute_defaults(&fields));
        if let Err(reason) = self.validate_record(&repaired) {
            return Err(RecordError::Unrepairable {
                reason: Box::new(reason),
            });
        }

        let backup = storage::backup_path(path);
        std::fs::rename(path, &backup).map_err(|source| RecordError::Backup {
            path: path.to_path_buf(),
            backup: backup.clone(),
            source,
        })?;

        storage::write_json_atomic(path, &repaired).map_err(|source| RecordError::Write {
            path: path.to_path_buf(),
            backup: backup.clone(),
            source,
        })?;

        info!("🔧 Repaired {} (backup: {})", path.display(), backup.display());
        Ok(RepairOutcome::Repaired { backup })
    }

    /// Repair every record file directly inside `directory`
    pub fn repair_directory(&self, directory: &Path) -> RepairReport {
        let mut report = RepairReport::default();

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
            match self.repair_file(&path) {
                Ok(RepairOutcome::AlreadyValid) => report.already_valid += 1,
                Ok(RepairOutcome::Repaired { .. }) => report.repaired += 1,
                Err(e) => {
                    warn!("✗ {}: {}", name, e);
                    report.failed.push(FileFailure::new(name, &e));
                }
            }
        }

        info!(
            "🔧 Repair summary for {}: {} total, {} already valid, {} repaired, {} failed",
            directory.display(),
            report.total_files,
            report.already_valid,
            report.repaired,
            report.failed.len()
        );

        report
    }
}
