//! Line-based unified diffs between document snapshots.

use similar::TextDiff;

use crate::core::document::Snapshot;

/// Context lines shown around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Unified diff output, one element per rendered line.
#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    pub lines: Vec<String>,
}

impl DiffReport {
    /// True iff the compared snapshots differ at all.
    pub fn has_changes(&self) -> bool {
        !self.lines.is_empty()
    }
}

/// Compute the unified diff between two snapshots. Pure; identical inputs
/// produce an empty report.
pub fn unified(before: &Snapshot, after: &Snapshot) -> DiffReport {
    let diff = TextDiff::from_lines(before.as_str(), after.as_str());
    let rendered = diff
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .to_string();

    DiffReport {
        lines: rendered.lines().map(str::to_owned).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::ConfigDocument;
    use serde_json::json;

    fn snap(value: serde_json::Value) -> Snapshot {
        ConfigDocument::parse(&value.to_string())
            .unwrap()
            .snapshot()
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        let a = snap(json!({"version": 5, "nodes": [1, 2]}));
        let report = unified(&a, &a.clone());
        assert!(!report.has_changes());
        assert!(report.lines.is_empty());
    }

    #[test]
    fn added_field_shows_up_as_insertion() {
        let before = snap(json!({"version": 5, "nodes": [1, 2]}));
        let after = snap(json!({"version": 5, "nodes": [1, 2, 3]}));
        let report = unified(&before, &after);

        assert!(report.has_changes());
        assert!(report.lines.iter().any(|l| l.starts_with('+') && l.contains('3')));
    }

    #[test]
    fn removed_field_shows_up_as_deletion() {
        let before = snap(json!({"version": 5, "cluster_name": "prod"}));
        let after = snap(json!({"version": 5}));
        let report = unified(&before, &after);

        assert!(report
            .lines
            .iter()
            .any(|l| l.starts_with('-') && l.contains("cluster_name")));
    }

    #[test]
    fn hunks_carry_headers() {
        let before = snap(json!({"version": 5}));
        let after = snap(json!({"version": 6}));
        let report = unified(&before, &after);

        assert!(report.lines.iter().any(|l| l.starts_with("@@")));
    }
}
