//! Configuration store for the scraper
//!
//! The document lives in a single JSON file. Loading merges it over the
//! built-in defaults and never fails; saving goes through an atomic
//! temp-file-and-rename write and reports success as a bool.

pub mod defaults;
pub mod merge;

use crate::error::{ConfigError, StorageError};
use crate::storage;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub use defaults::{default_document, DEFAULT_CONFIG_FILE, SECTIONS};
pub use merge::deep_merge;

/// The full configuration document: section name -> settings object.
/// Unknown sections and keys are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Get a whole section
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Get `document[section][key]`
    pub fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.0.get(section).and_then(|s| s.get(key))
    }

    /// Set `document[section][key] = value`, creating the section if absent
    pub fn set_value(&mut self, section: &str, key: &str, value: Value) -> Result<(), ConfigError> {
        let entry = self
            .0
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        match entry {
            Value::Object(settings) => {
                settings.insert(key.to_string(), value);
                Ok(())
            }
            _ => Err(ConfigError::SectionNotAnObject {
                section: section.to_string(),
            }),
        }
    }

    /// Check that values are within acceptable ranges.
    ///
    /// Returns every problem found; an empty list means the document is fine.
    pub fn check(&self) -> Vec<String> {
        let limits: [(&str, &str, f64, &str); 3] = [
            ("general", "max_storage_gb", 1.0, "max_storage_gb must be at least 1 GB"),
            (
                "download",
                "connect_timeout_seconds",
                5.0,
                "connect_timeout_seconds must be at least 5",
            ),
            (
                "validation",
                "min_video_size_bytes",
                1024.0,
                "min_video_size_bytes must be at least 1024",
            ),
        ];

        let mut problems = Vec::new();
        for (section, key, minimum, message) in limits {
            match self.value(section, key).and_then(Value::as_f64) {
                Some(actual) if actual >= minimum => {}
                Some(_) => problems.push(message.to_string()),
                None => problems.push(format!("{}.{} must be a number", section, key)),
            }
        }
        problems
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        default_document()
    }
}

/// Batch pacing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Pages scraped per batch
    pub batch_pages: u32,

    /// Wait before the first batch is handed to the download manager
    pub batch_initial_wait_seconds: u64,

    /// Extra wait per page once downloads are queued
    pub per_page_idm_wait_seconds: u64,

    /// Retries for a page whose downloads failed
    pub max_failed_retries_per_page: u32,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level name (DEBUG, INFO, WARNING, ERROR, CRITICAL)
    pub log_level: String,

    /// Write log output to `log_file_path` instead of stderr
    pub log_to_file: bool,

    /// Log file path
    pub log_file_path: PathBuf,
}

/// Owns the on-disk configuration document
#[derive(Debug, Clone)]
pub struct ConfigStore {
    /// Location of the config file
    path: PathBuf,

    /// Defaults, built once and only ever handed out as clones
    defaults: ConfigDocument,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore {
    /// Create a store for the config file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            defaults: default_document(),
        }
    }

    /// Config file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The built-in defaults
    pub fn defaults(&self) -> &ConfigDocument {
        &self.defaults
    }

    /// Load the configuration.
    ///
    /// Missing file: the defaults. Unreadable or malformed file: the
    /// defaults, with the cause logged. Otherwise the file merged over the
    /// defaults.
    pub fn load(&self) -> ConfigDocument {
        match self.read_user_document() {
            Ok(user) => {
                debug!("📄 Config loaded from {}", self.path.display());
                ConfigDocument(deep_merge(self.defaults.as_map(), &user))
            }
            Err(ConfigError::Storage(StorageError::NotFound { .. })) => {
                info!("📄 Config file {} not found, using defaults", self.path.display());
                self.defaults.clone()
            }
            Err(e) => {
                error!("Error loading config: {}", e);
                info!("Using default configuration");
                self.defaults.clone()
            }
        }
    }

    fn read_user_document(&self) -> Result<Map<String, Value>, ConfigError> {
        match storage::read_json(&self.path)? {
            Value::Object(user) => Ok(user),
            _ => Err(ConfigError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    /// Persist `document`, replacing the file atomically.
    ///
    /// Returns `false` on any failure; the previous file is left as it was.
    pub fn save(&self, document: &ConfigDocument) -> bool {
        match self.try_save(document) {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving config: {}", e);
                false
            }
        }
    }

    /// Like [`save`](Self::save) but reports the cause
    pub fn try_save(&self, document: &ConfigDocument) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        storage::write_json_atomic(&self.path, &document.to_value()).map_err(|source| {
            StorageError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        info!("💾 Configuration saved to: {}", self.path.display());
        Ok(())
    }

    /// Load, set `document[section][key] = value`, save
    pub fn update_value(&self, section: &str, key: &str, value: Value) -> bool {
        let mut document = self.load();
        if let Err(e) = document.set_value(section, key, value) {
            error!("Error updating config value {}.{}: {}", section, key, e);
            return false;
        }
        self.save(&document)
    }

    /// Get a whole section, falling back to the default section if the
    /// loaded document lacks it. `Value::Null` for unknown sections.
    pub fn get_section(&self, name: &str) -> Value {
        self.load()
            .section(name)
            .or_else(|| self.defaults.section(name))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Get one setting, falling back to its default
    pub fn get_value(&self, section: &str, key: &str) -> Option<Value> {
        self.load()
            .value(section, key)
            .or_else(|| self.defaults.value(section, key))
            .cloned()
    }

    /// Batch processing settings
    pub fn batch_config(&self) -> BatchSettings {
        self.typed_section("batch")
    }

    /// Logging settings
    pub fn logging_config(&self) -> LoggingSettings {
        self.typed_section("logging")
    }

    /// Download directory
    pub fn download_directory(&self) -> PathBuf {
        let document = self.load();
        let path = document
            .value("general", "download_path")
            .and_then(Value::as_str)
            .or_else(|| {
                self.defaults
                    .value("general", "download_path")
                    .and_then(Value::as_str)
            })
            .unwrap_or(defaults::DEFAULT_DOWNLOAD_PATH);
        PathBuf::from(path)
    }

    /// Storage cap in GB
    pub fn max_storage_gb(&self) -> f64 {
        let document = self.load();
        document
            .value("general", "max_storage_gb")
            .and_then(Value::as_f64)
            .or_else(|| {
                self.defaults
                    .value("general", "max_storage_gb")
                    .and_then(Value::as_f64)
            })
            .unwrap_or(defaults::DEFAULT_MAX_STORAGE_GB)
    }

    /// Deserialize a section, starting from the default section and
    /// overlaying each loaded key that still deserializes. Keys with an
    /// unusable type keep their default.
    fn typed_section<T>(&self, name: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let mut settings = match self.defaults.section(name) {
            Some(Value::Object(section)) => section.clone(),
            _ => Map::new(),
        };

        let document = self.load();
        match document.section(name) {
            Some(Value::Object(user)) => {
                for (key, value) in user {
                    let mut candidate = settings.clone();
                    candidate.insert(key.clone(), value.clone());
                    match serde_json::from_value::<T>(Value::Object(candidate.clone())) {
                        Ok(_) => settings = candidate,
                        Err(e) => warn!(
                            "⚠️ Config value {}.{} is unusable ({}), using default",
                            name, key, e
                        ),
                    }
                }
            }
            Some(other) => warn!(
                "⚠️ Config section '{}' is not an object ({}), using defaults",
                name, other
            ),
            None => {}
        }

        serde_json::from_value(Value::Object(settings)).unwrap_or_else(|e| {
            warn!("⚠️ Default section '{}' is unusable ({})", name, e);
            T::default()
        })
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            batch_pages: 3,
            batch_initial_wait_seconds: 240,
            per_page_idm_wait_seconds: 120,
            max_failed_retries_per_page: 3,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            log_to_file: true,
            log_file_path: PathBuf::from("scraper.log"),
        }
    }
}
