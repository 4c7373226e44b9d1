//! Wire types for the admin protocol.
//!
//! The protocol is one JSON object per line in each direction. Requests are
//! tagged by method name; every response carries an `ok` flag plus optional
//! message and payload fields.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed enumeration of failure-domain scopes a record can be replicated
/// across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationScope {
    Node,
    Rack,
    Row,
    Cluster,
    DataCenter,
    Region,
    Root,
}

impl LocationScope {
    pub const ALL: &'static [LocationScope] = &[
        LocationScope::Node,
        LocationScope::Rack,
        LocationScope::Row,
        LocationScope::Cluster,
        LocationScope::DataCenter,
        LocationScope::Region,
        LocationScope::Root,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LocationScope::Node => "node",
            LocationScope::Rack => "rack",
            LocationScope::Row => "row",
            LocationScope::Cluster => "cluster",
            LocationScope::DataCenter => "data-center",
            LocationScope::Region => "region",
            LocationScope::Root => "root",
        }
    }
}

impl fmt::Display for LocationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a valid scope")]
pub struct InvalidScope(pub String);

impl FromStr for LocationScope {
    type Err = InvalidScope;

    /// Case-insensitive lookup; `_` and `-` are interchangeable, so both
    /// `data_center` and `DATA-CENTER` resolve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        LocationScope::ALL
            .iter()
            .copied()
            .find(|scope| scope.name() == normalized)
            .ok_or_else(|| InvalidScope(s.trim().to_owned()))
    }
}

/// Replication factors at various scopes, e.g. `rack=2 region=3` means
/// "replicate to at least 3 nodes in at least 2 different racks in at least
/// 3 different regions" when combined by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationProperty(BTreeMap<LocationScope, u32>);

impl ReplicationProperty {
    /// Parse `scope=factor` pairs from the command line. Scope names are
    /// validated against the fixed enumeration before anything touches the
    /// network; factors must be positive.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self, ReplicationParseError> {
        let mut scopes = BTreeMap::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (scope, factor) = pair
                .split_once('=')
                .ok_or_else(|| ReplicationParseError::MissingSeparator(pair.to_owned()))?;
            let scope: LocationScope = scope
                .parse()
                .map_err(|InvalidScope(name)| ReplicationParseError::InvalidScope(name))?;
            let factor: u32 = factor
                .trim()
                .parse()
                .ok()
                .filter(|&f| f > 0)
                .ok_or_else(|| ReplicationParseError::InvalidFactor(pair.to_owned()))?;
            scopes.insert(scope, factor);
        }
        Ok(Self(scopes))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LocationScope, u32)> + '_ {
        self.0.iter().map(|(&scope, &factor)| (scope, factor))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplicationParseError {
    #[error("{0} is not a valid scope")]
    InvalidScope(String),

    #[error("invalid replication factor in {0:?}: expected scope=N with N >= 1")]
    InvalidFactor(String),

    #[error("expected scope=factor, got {0:?}")]
    MissingSeparator(String),
}

/// Client capabilities declared at connect time. An explicit struct rather
/// than free-form key/value settings: the handle you get back is scoped to
/// exactly what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Read the config from the coordination store directly instead of
    /// through another node.
    pub read_from_store: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            read_from_store: true,
        }
    }
}

/// One request per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum Request {
    Hello { capabilities: Capabilities },
    FetchConfig,
    OverwriteConfig { payload: String },
    Bootstrap { replication: ReplicationProperty },
    RemoveNodes { node_indexes: Vec<u64> },
}

/// One response per line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}
