//! Deep merge of a user document over the defaults

use serde_json::{Map, Value};

/// Merge `user` over `defaults`.
///
/// Nested objects present on both sides merge recursively. Any other user
/// value (lists included) replaces the default wholesale. Keys only the
/// user has are kept, so every default key survives unless the user
/// replaced its parent object with a non-object.
pub fn deep_merge(defaults: &Map<String, Value>, user: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = defaults.clone();

    for (key, user_value) in user {
        let value = match (merged.get(key), user_value) {
            (Some(Value::Object(default_obj)), Value::Object(user_obj)) => {
                Value::Object(deep_merge(default_obj, user_obj))
            }
            _ => user_value.clone(),
        };
        merged.insert(key.clone(), value);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_empty_user_yields_defaults() {
        let defaults = obj(json!({"a": {"x": 1}, "b": 2}));
        assert_eq!(deep_merge(&defaults, &Map::new()), defaults);
    }

    #[test]
    fn test_leaf_override_keeps_siblings() {
        let defaults = obj(json!({"processing": {"mode": "direct", "use_parallel": true}}));
        let user = obj(json!({"processing": {"max_retries": 9, "mode": "idm"}}));

        let merged = deep_merge(&defaults, &user);
        assert_eq!(
            Value::Object(merged),
            json!({"processing": {"mode": "idm", "use_parallel": true, "max_retries": 9}})
        );
    }

    #[test]
    fn test_lists_are_replaced_not_concatenated() {
        let defaults = obj(json!({"validation": {"required_json_fields": ["video_id", "title"]}}));
        let user = obj(json!({"validation": {"required_json_fields": ["url"]}}));

        let merged = deep_merge(&defaults, &user);
        assert_eq!(merged["validation"]["required_json_fields"], json!(["url"]));
    }

    #[test]
    fn test_user_only_sections_are_preserved() {
        let defaults = obj(json!({"general": {"max_storage_gb": 940}}));
        let user = obj(json!({"gui": {"theme": "dark"}}));

        let merged = deep_merge(&defaults, &user);
        assert_eq!(merged["gui"], json!({"theme": "dark"}));
        assert_eq!(merged["general"]["max_storage_gb"], json!(940));
    }

    #[test]
    fn test_scalar_replaces_object() {
        let defaults = obj(json!({"batch": {"batch_pages": 3}}));
        let user = obj(json!({"batch": 5}));

        assert_eq!(deep_merge(&defaults, &user)["batch"], json!(5));
    }

    #[test]
    fn test_recurses_through_multiple_levels() {
        let defaults = obj(json!({"a": {"b": {"c": 1, "d": 2}}}));
        let user = obj(json!({"a": {"b": {"d": 20, "e": 30}}}));

        let merged = deep_merge(&defaults, &user);
        assert_eq!(merged["a"]["b"], json!({"c": 1, "d": 20, "e": 30}));
    }
}
