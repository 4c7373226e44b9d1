//! Version and timestamp reconciliation for edited documents.
//!
//! Runs after a draft parses and before the final diff is rendered, so the
//! confirm step always shows the exact bytes that will be written.

use serde_json::Value;

use crate::core::document::{ConfigDocument, LAST_TIMESTAMP_KEY, VERSION_KEY};

/// Force forward progress on `version` and `last_timestamp` when the draft
/// left them untouched; preserve explicit edits verbatim.
///
/// A draft that dropped either field counts as "untouched" — the operator is
/// not required to manage these fields by hand. An operator who deliberately
/// set a different value (say, to jump versions while resolving a manual
/// conflict) keeps it, even if the value is no longer well-formed; the wire
/// codec rejects shape violations at encode time.
pub fn reconcile(original: &ConfigDocument, mut edited: ConfigDocument, now_ms: u64) -> ConfigDocument {
    if let (Some(current), Some(version)) = (original.get(VERSION_KEY), original.version()) {
        let untouched = edited.get(VERSION_KEY).is_none_or(|v| v == current);
        if untouched {
            edited.set(VERSION_KEY, Value::from(version + 1));
        }
    }

    if let Some(current) = original.get(LAST_TIMESTAMP_KEY) {
        let untouched = edited.get(LAST_TIMESTAMP_KEY).is_none_or(|v| v == current);
        if untouched {
            edited.set(LAST_TIMESTAMP_KEY, Value::from(now_ms));
        }
    }

    edited
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW_MS: u64 = 1_700_000_000_000;

    fn doc(value: serde_json::Value) -> ConfigDocument {
        ConfigDocument::parse(&value.to_string()).unwrap()
    }

    #[test]
    fn unchanged_version_is_bumped() {
        let original = doc(json!({"version": 5, "last_timestamp": 1000, "nodes": [1, 2]}));
        let edited = doc(json!({"version": 5, "last_timestamp": 1000, "nodes": [1, 2, 3]}));

        let out = reconcile(&original, edited, NOW_MS);
        assert_eq!(out.version(), Some(6));
        assert_eq!(out.last_timestamp(), Some(NOW_MS));
        assert_eq!(out.get("nodes"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn explicit_version_is_preserved() {
        let original = doc(json!({"version": 5, "last_timestamp": 1000}));
        let edited = doc(json!({"version": 42, "last_timestamp": 1000}));

        let out = reconcile(&original, edited, NOW_MS);
        assert_eq!(out.version(), Some(42));
    }

    #[test]
    fn explicit_timestamp_is_preserved() {
        let original = doc(json!({"version": 5, "last_timestamp": 1000}));
        let edited = doc(json!({"version": 5, "last_timestamp": 2500}));

        let out = reconcile(&original, edited, NOW_MS);
        assert_eq!(out.last_timestamp(), Some(2500));
        assert_eq!(out.version(), Some(6));
    }

    #[test]
    fn dropped_fields_are_reinstated() {
        let original = doc(json!({"version": 5, "last_timestamp": 1000, "nodes": []}));
        let edited = doc(json!({"nodes": [7]}));

        let out = reconcile(&original, edited, NOW_MS);
        assert_eq!(out.version(), Some(6));
        assert_eq!(out.last_timestamp(), Some(NOW_MS));
    }

    #[test]
    fn type_changed_version_is_preserved_verbatim() {
        let original = doc(json!({"version": 5, "last_timestamp": 1000}));
        let edited = doc(json!({"version": "five", "last_timestamp": 1000}));

        let out = reconcile(&original, edited, NOW_MS);
        assert_eq!(out.get(VERSION_KEY), Some(&json!("five")));
    }
}
