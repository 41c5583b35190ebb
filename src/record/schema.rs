//! Field lists and repair defaults for video metadata records

use serde_json::{json, Value};

/// Fields every record must contain
pub const REQUIRED_FIELDS: [&str; 14] = [
    "video_id",
    "url",
    "title",
    "duration",
    "views",
    "uploader",
    "uploaded_by",
    "upload_date",
    "description",
    "categories",
    "artists",
    "tags",
    "video_src",
    "thumbnail_src",
];

/// Fields that must hold a list
pub const LIST_FIELDS: [&str; 3] = ["categories", "artists", "tags"];

/// Scalar fields that must be non-blank after trimming
pub const ESSENTIAL_TEXT_FIELDS: [&str; 4] = ["video_id", "url", "title", "uploaded_by"];

/// Value substituted for a missing or empty field during repair
pub fn default_value(field: &str) -> Option<Value> {
    let value = match field {
        "video_id" | "url" | "title" | "video_src" | "thumbnail_src" => json!(""),
        "duration" => json!("00:30"),
        "views" => json!("0"),
        "uploader" | "uploaded_by" => json!("Unknown"),
        "upload_date" => json!(0),
        "description" => json!("No description available"),
        "categories" => json!(["uncategorized"]),
        "artists" => json!(["unknown_artist"]),
        "tags" => json!(["untagged"]),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_required_field_has_a_default() {
        for field in REQUIRED_FIELDS {
            assert!(default_value(field).is_some(), "no default for {}", field);
        }
        assert!(default_value("bogus").is_none());
    }

    #[test]
    fn test_list_defaults_are_non_empty_lists() {
        for field in LIST_FIELDS {
            let value = default_value(field).unwrap();
            assert!(value.as_array().map_or(false, |items| !items.is_empty()));
        }
    }
}
