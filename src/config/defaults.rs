//! Built-in default configuration document

use super::ConfigDocument;
use serde_json::json;

/// Default config file location, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default download directory
pub const DEFAULT_DOWNLOAD_PATH: &str = "scraper_downloads";

/// Default storage cap in GB
pub const DEFAULT_MAX_STORAGE_GB: f64 = 940.0;

/// Sections every loaded document is guaranteed to contain
pub const SECTIONS: [&str; 7] = [
    "general",
    "batch",
    "processing",
    "scraping",
    "download",
    "validation",
    "logging",
];

/// Build the default document.
///
/// Every call returns a fresh value; callers own what they get back.
pub fn default_document() -> ConfigDocument {
    let sections = [
        (
            "general",
            json!({
                "base_url": "https://rule34video.com",
                "download_path": DEFAULT_DOWNLOAD_PATH,
                "max_storage_gb": 940
            }),
        ),
        (
            "batch",
            json!({
                "batch_pages": 3,
                "batch_initial_wait_seconds": 240,
                "per_page_idm_wait_seconds": 120,
                "max_failed_retries_per_page": 3
            }),
        ),
        (
            "processing",
            json!({
                "mode": "direct",
                "use_parallel": true,
                "parallel_batch_size": 5,
                "max_concurrent_downloads": 8,
                "max_concurrent_videos": 3,
                "use_parallel_video_processing": true
            }),
        ),
        (
            "scraping",
            json!({
                "wait_time_ms": 3000,
                "max_retries": 3,
                "enable_crawl4ai": true
            }),
        ),
        (
            "download",
            json!({
                "download_method": "direct",
                "max_retries": 5,
                "chunk_size": 16384,
                "connect_timeout_seconds": 30,
                "read_timeout_seconds": 300
            }),
        ),
        (
            "validation",
            json!({
                "required_json_fields": ["video_id", "title", "video_src"],
                "min_video_size_bytes": 1024,
                "min_thumbnail_size_bytes": 100,
                "validation_delay_seconds": 2
            }),
        ),
        (
            "logging",
            json!({
                "log_level": "INFO",
                "log_to_file": true,
                "log_file_path": "scraper.log"
            }),
        ),
    ];

    ConfigDocument::from_map(
        sections
            .into_iter()
            .map(|(name, section)| (name.to_string(), section))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BatchSettings, LoggingSettings};

    #[test]
    fn test_default_document_has_every_section() {
        let doc = default_document();
        for section in SECTIONS {
            assert!(
                doc.section(section).map_or(false, |v| v.is_object()),
                "missing section {}",
                section
            );
        }
        assert_eq!(doc.as_map().len(), SECTIONS.len());
    }

    #[test]
    fn test_default_document_is_fresh_each_time() {
        let mut first = default_document();
        first
            .set_value("batch", "batch_pages", json!(99))
            .unwrap();

        let second = default_document();
        assert_eq!(second.value("batch", "batch_pages"), Some(&json!(3)));
    }

    #[test]
    fn test_typed_views_parse_from_defaults() {
        let doc = default_document();
        let batch: BatchSettings =
            serde_json::from_value(doc.section("batch").unwrap().clone()).unwrap();
        assert_eq!(batch.batch_pages, 3);
        assert_eq!(batch.per_page_idm_wait_seconds, 120);

        let logging: LoggingSettings =
            serde_json::from_value(doc.section("logging").unwrap().clone()).unwrap();
        assert_eq!(logging.log_level, "INFO");
        assert!(logging.log_to_file);
    }

    #[test]
    fn test_constants_match_document() {
        let doc = default_document();
        assert_eq!(
            doc.value("general", "download_path").and_then(|v| v.as_str()),
            Some(DEFAULT_DOWNLOAD_PATH)
        );
        assert_eq!(
            doc.value("general", "max_storage_gb").and_then(|v| v.as_f64()),
            Some(DEFAULT_MAX_STORAGE_GB)
        );
    }
}
