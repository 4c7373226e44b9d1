//! Property tests for reconciliation invariants.

use nodecfg::core::document::ConfigDocument;
use nodecfg::core::reconcile::reconcile;
use proptest::prelude::*;
use serde_json::json;

const NOW_MS: u64 = 1_700_000_000_000;

fn doc(value: serde_json::Value) -> ConfigDocument {
    ConfigDocument::parse(&value.to_string()).expect("valid document")
}

proptest! {
    /// An untouched (or dropped) version is always bumped by exactly one;
    /// an explicitly different version is kept as the operator wrote it.
    #[test]
    fn version_moves_forward_or_obeys_the_operator(
        version in 0u64..1_000_000,
        timestamp in 0u64..2_000_000_000_000,
        edited_version in proptest::option::of(0u64..1_000_000),
    ) {
        let original = doc(json!({"version": version, "last_timestamp": timestamp}));

        let mut edited = json!({"last_timestamp": timestamp, "nodes": [1]});
        if let Some(v) = edited_version {
            edited["version"] = json!(v);
        }
        let edited = doc(edited);

        let out = reconcile(&original, edited, NOW_MS);
        match edited_version {
            Some(v) if v != version => prop_assert_eq!(out.version(), Some(v)),
            _ => prop_assert_eq!(out.version(), Some(version + 1)),
        }
    }

    /// An untouched timestamp becomes the reconciliation wall clock; an
    /// explicit one survives verbatim.
    #[test]
    fn timestamp_reflects_reconciliation_time_unless_overridden(
        timestamp in 0u64..2_000_000_000_000,
        edited_timestamp in proptest::option::of(0u64..2_000_000_000_000),
    ) {
        let original = doc(json!({"version": 1, "last_timestamp": timestamp}));

        let mut edited = json!({"version": 1, "nodes": [1]});
        if let Some(ts) = edited_timestamp {
            edited["last_timestamp"] = json!(ts);
        }
        let edited = doc(edited);

        let out = reconcile(&original, edited, NOW_MS);
        match edited_timestamp {
            Some(ts) if ts != timestamp => prop_assert_eq!(out.last_timestamp(), Some(ts)),
            _ => prop_assert_eq!(out.last_timestamp(), Some(NOW_MS)),
        }
    }

    /// Reconciliation never touches anything besides the two managed fields.
    #[test]
    fn other_fields_pass_through_untouched(
        nodes in proptest::collection::vec(0u64..128, 0..8),
    ) {
        let original = doc(json!({"version": 3, "last_timestamp": 500, "nodes": []}));
        let edited = doc(json!({"version": 3, "last_timestamp": 500, "nodes": nodes.clone()}));

        let out = reconcile(&original, edited, NOW_MS);
        prop_assert_eq!(out.get("nodes"), Some(&json!(nodes)));
    }
}
