//! Core domain types for the asset dependency index.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ScanIssue;

/// Stable, globally unique identifier of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    /// Create a new asset ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Summary of corpus state used to validate a cached index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Freshness of a record relative to the last full build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetState {
    /// Content matches what the last build saw
    #[default]
    Unchanged,

    /// Content differs from what the last build saw
    Changed,

    /// Asset no longer exists in the corpus
    Missing,

    /// Record was created after the last build, so there is nothing to compare against
    NoData,
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::Changed => write!(f, "changed"),
            Self::Missing => write!(f, "missing"),
            Self::NoData => write!(f, "no data"),
        }
    }
}

/// Everything the index knows about one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Unique identifier
    pub id: AssetId,

    /// Display name (last segment of the asset's path)
    pub name: String,

    /// Corpus-relative path
    pub path: String,

    /// Assets this asset directly depends on, in declaration order
    pub dependencies: Vec<AssetId>,

    /// Assets that directly depend on this asset, in discovery order.
    /// Always derived from `dependencies` across the index.
    pub references: Vec<AssetId>,

    /// Content hash recorded by the last full build
    #[serde(deserialize_with = "Option::deserialize")]
    pub content_hash: Option<u64>,

    /// Freshness relative to the last full build
    pub state: AssetState,
}

impl AssetRecord {
    /// Create a record with no edges.
    pub fn new(id: AssetId, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            dependencies: Vec::new(),
            references: Vec::new(),
            content_hash: None,
            state: AssetState::NoData,
        }
    }

    /// The edge list walked in the given direction.
    #[must_use]
    pub fn edges(&self, direction: Direction) -> &[AssetId] {
        match direction {
            Direction::Dependencies => &self.dependencies,
            Direction::References => &self.references,
        }
    }
}

/// Which edge set a tree follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow "depends on" edges: what does the asset use
    Dependencies,

    /// Follow "depended on by" edges: what uses the asset
    #[default]
    References,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Dependencies => Self::References,
            Self::References => Self::Dependencies,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dependencies => write!(f, "dependencies"),
            Self::References => write!(f, "references"),
        }
    }
}

/// Statistics from a full index build.
#[derive(Debug, Clone)]
pub struct IndexStats {
    /// Number of assets indexed
    pub assets_indexed: usize,
    /// Number of dependency edges stored
    pub dependency_edges: usize,
    /// Number of raw references dropped because the target is unknown
    pub unresolved_references: usize,
    /// Time taken
    pub duration: Duration,
    /// Assets whose content could not be read
    pub unreadable: Vec<ScanIssue>,
}

/// A dependency edge whose inverse is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeViolation {
    /// Asset holding the dependency
    pub from: AssetId,
    /// Asset depended upon
    pub to: AssetId,
    /// Which side lacks the edge
    pub missing: MissingSide,
}

/// The half of an edge pair that is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSide {
    /// `from` lists `to` as a dependency but `to` does not list `from` as a reference
    Reference,
    /// `to` lists `from` as a reference but `from` does not list `to` as a dependency
    Dependency,
}

/// A set of assets that depend on each other circularly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Members of the cycle, ordered by ID
    pub assets: Vec<AssetId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn asset_id_serializes_as_plain_string() {
        let id = AssetId::new("0123abcd");
        let json = serde_json::to_string(&id).expect("serialize");

        assert_eq!(json, "\"0123abcd\"");
    }

    #[test]
    fn record_edges_follow_direction() {
        let mut record = AssetRecord::new(AssetId::new("a"), "a.prefab", "Assets/a.prefab");
        record.dependencies.push(AssetId::new("b"));
        record.references.push(AssetId::new("c"));

        assert_eq!(record.edges(Direction::Dependencies), [AssetId::new("b")]);
        assert_eq!(record.edges(Direction::References), [AssetId::new("c")]);
    }

    #[test]
    fn direction_reversed_swaps_variants() {
        assert_eq!(Direction::Dependencies.reversed(), Direction::References);
        assert_eq!(Direction::References.reversed(), Direction::Dependencies);
    }

    #[test]
    fn direction_deserializes_lowercase() {
        let direction: Direction = serde_json::from_str("\"dependencies\"").expect("parse");
        assert_eq!(direction, Direction::Dependencies);
    }

    #[test]
    fn record_with_null_hash_parses() {
        let json = r#"{"id":"a","name":"a","path":"","dependencies":[],"references":[],"content_hash":null,"state":"no_data"}"#;
        let record: AssetRecord = serde_json::from_str(json).expect("parse");

        assert_eq!(record.state, AssetState::NoData);
        assert_eq!(record.content_hash, None);
    }

    #[rstest]
    #[case::path(r#"{"id":"a","name":"a","dependencies":[],"references":[],"content_hash":1,"state":"unchanged"}"#)]
    #[case::content_hash(r#"{"id":"a","name":"a","path":"","dependencies":[],"references":[],"state":"unchanged"}"#)]
    #[case::state(r#"{"id":"a","name":"a","path":"","dependencies":[],"references":[],"content_hash":1}"#)]
    fn record_missing_a_field_is_rejected(#[case] json: &str) {
        let result = serde_json::from_str::<AssetRecord>(json);

        assert!(result.is_err());
    }
}
