//! Versioned nodes-configuration document and its text rendering.
//!
//! The document is a JSON object owned by the remote store between sessions.
//! Rendering sorts object keys (serde_json's default map ordering), so two
//! renderings of the same document are always byte-identical. Diffs and the
//! editor buffer both work off this rendering.

use std::fmt;

use serde_json::{Map, Value};

/// Monotonically increasing write counter, unique per accepted write.
pub const VERSION_KEY: &str = "version";

/// Milliseconds since epoch, non-decreasing across writes.
pub const LAST_TIMESTAMP_KEY: &str = "last_timestamp";

/// A nodes-configuration document: string keys mapped to arbitrary JSON
/// values. Drafts parsed from an editor buffer may be missing `version` or
/// `last_timestamp`; the wire codec enforces them at the store boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    fields: Map<String, Value>,
}

impl ConfigDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Parse an editor buffer into a draft document. Anything other than a
    /// JSON object is rejected.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let fields: Map<String, Value> = serde_json::from_str(text)?;
        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_owned(), value);
    }

    /// The write counter, when present and integral.
    pub fn version(&self) -> Option<u64> {
        self.fields.get(VERSION_KEY).and_then(Value::as_u64)
    }

    /// The last-write timestamp in milliseconds, when present and integral.
    pub fn last_timestamp(&self) -> Option<u64> {
        self.fields.get(LAST_TIMESTAMP_KEY).and_then(Value::as_u64)
    }

    /// Deterministic pretty rendering with sorted keys.
    pub fn snapshot(&self) -> Snapshot {
        let value = Value::Object(self.fields.clone());
        Snapshot(format!("{value:#}"))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

/// Stable text rendering of a document, used for the editor buffer and for
/// diffing. Equal documents produce equal snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
