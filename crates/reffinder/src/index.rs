//! The dependency index: forward and inverse edges for every asset.
//!
//! The index owns one [`AssetRecord`] per asset. `dependencies` are read from
//! the corpus; `references` are never authored, only derived by inverting
//! every dependency edge. Between any two operations `references` is exactly
//! the inverse of `dependencies` across the whole index:
//!
//! - [`rebuild`](DependencyIndex::rebuild) restores this by construction,
//!   deriving every reference list in a second pass
//! - [`refresh`](DependencyIndex::refresh) restores it incrementally, removing
//!   stale inverse edges and adding new ones for a single asset
//! - [`load`](DependencyIndex::load) refuses snapshots that violate it

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::{DateTime, Utc};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, LoadOutcome, Snapshot, INDEX_CACHE_KEY, SNAPSHOT_FORMAT_VERSION};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::types::{
    AssetId, AssetRecord, AssetState, Cycle, EdgeViolation, Fingerprint, IndexStats, MissingSide,
};

/// Mapping from asset ID to its record, with both edge directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndex {
    records: HashMap<AssetId, AssetRecord>,
    fingerprint: Option<Fingerprint>,
    built_at: Option<DateTime<Utc>>,
}

impl DependencyIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Building ===

    /// Rebuild the whole index from the corpus.
    ///
    /// Dependency targets the corpus does not know, self-references and
    /// repeats are dropped; declaration order is kept. Assets whose content
    /// cannot be read are indexed without dependencies and reported in the
    /// returned statistics.
    pub fn rebuild<C: Corpus + ?Sized>(&mut self, corpus: &C) -> IndexStats {
        let start = Instant::now();
        self.records.clear();

        // Pass 1: one record per asset that currently exists
        let mut order = Vec::new();
        for id in corpus.asset_ids() {
            if self.records.contains_key(&id) {
                continue;
            }
            let Some(info) = corpus.describe(&id) else {
                debug!(asset = %id, "Enumerated asset no longer exists, skipping");
                continue;
            };
            let mut record = AssetRecord::new(id.clone(), info.name, info.path);
            record.content_hash = corpus.content_hash(&id);
            record.state = AssetState::Unchanged;
            self.records.insert(id.clone(), record);
            order.push(id);
        }

        // Pass 2: dependencies, resolved against the records from pass 1
        let mut unresolved_references = 0;
        let mut unreadable = Vec::new();
        let mut dependency_edges = 0;
        for id in &order {
            let raw = match corpus.direct_dependencies(id) {
                Ok(raw) => raw,
                Err(issue) => {
                    warn!(asset = %id, error = %issue, "Cannot read asset content, indexing without dependencies");
                    unreadable.push(issue);
                    continue;
                }
            };
            let (dependencies, dropped) =
                canonical_dependencies(id, raw, |target| self.records.contains_key(target));
            unresolved_references += dropped;
            dependency_edges += dependencies.len();
            if let Some(record) = self.records.get_mut(id) {
                record.dependencies = dependencies;
            }
        }

        // Pass 3: invert every edge
        for id in &order {
            let dependencies = self
                .records
                .get(id)
                .map(|r| r.dependencies.clone())
                .unwrap_or_default();
            for target in dependencies {
                if let Some(target_record) = self.records.get_mut(&target) {
                    target_record.references.push(id.clone());
                }
            }
        }

        self.fingerprint = Some(corpus.fingerprint());
        self.built_at = Some(Utc::now());

        let stats = IndexStats {
            assets_indexed: self.records.len(),
            dependency_edges,
            unresolved_references,
            duration: start.elapsed(),
            unreadable,
        };
        info!(
            assets = stats.assets_indexed,
            edges = stats.dependency_edges,
            unresolved = stats.unresolved_references,
            unreadable = stats.unreadable.len(),
            duration_ms = stats.duration.as_millis(),
            "Dependency index rebuilt"
        );
        stats
    }

    /// Re-read one asset's dependencies and repair the inverse edges.
    ///
    /// Returns the asset's state afterwards, or `None` if neither the index
    /// nor the corpus knows the asset. An asset the corpus knows but the index
    /// does not gets a new [`AssetState::NoData`] record. An indexed asset
    /// that left the corpus is marked [`AssetState::Missing`] and keeps its
    /// edges. Dependency targets the index has not seen yet are given empty
    /// `NoData` records.
    pub fn refresh<C: Corpus + ?Sized>(&mut self, corpus: &C, id: &AssetId) -> Option<AssetState> {
        let Some(info) = corpus.describe(id) else {
            let record = self.records.get_mut(id)?;
            if record.state != AssetState::Missing {
                debug!(asset = %id, "Asset missing from corpus");
            }
            record.state = AssetState::Missing;
            return Some(AssetState::Missing);
        };

        if !self.records.contains_key(id) {
            debug!(asset = %id, "Creating record for previously unindexed asset");
            let record = AssetRecord::new(id.clone(), info.name.clone(), info.path.clone());
            self.records.insert(id.clone(), record);
        }

        let raw = match corpus.direct_dependencies(id) {
            Ok(raw) => raw,
            Err(issue) => {
                warn!(asset = %id, error = %issue, "Cannot read asset content, keeping previous dependencies");
                return self.records.get(id).map(|r| r.state);
            }
        };
        let (new_dependencies, _) =
            canonical_dependencies(id, raw, |target| corpus.describe(target).is_some());

        let old_dependencies = self
            .records
            .get(id)
            .map(|r| r.dependencies.clone())
            .unwrap_or_default();

        let new_set: HashSet<&AssetId> = new_dependencies.iter().collect();
        let old_set: HashSet<&AssetId> = old_dependencies.iter().collect();

        for removed in old_dependencies.iter().filter(|d| !new_set.contains(d)) {
            if let Some(target) = self.records.get_mut(removed) {
                target.references.retain(|r| r != id);
            }
        }

        for added in new_dependencies.iter().filter(|d| !old_set.contains(d)) {
            if !self.records.contains_key(added) {
                // describe() succeeded while filtering, so the target exists
                let Some(target_info) = corpus.describe(added) else {
                    continue;
                };
                debug!(asset = %added, referrer = %id, "Creating record for new dependency target");
                self.records.insert(
                    added.clone(),
                    AssetRecord::new(added.clone(), target_info.name, target_info.path),
                );
            }
            if let Some(target) = self.records.get_mut(added) {
                if !target.references.contains(id) {
                    target.references.push(id.clone());
                }
            }
        }

        let current_hash = corpus.content_hash(id);
        let record = self.records.get_mut(id)?;
        if record.dependencies != new_dependencies {
            debug!(
                asset = %id,
                before = record.dependencies.len(),
                after = new_dependencies.len(),
                "Dependencies refreshed"
            );
        }
        record.dependencies = new_dependencies;
        record.name = info.name;
        record.path = info.path;
        record.state = match record.state {
            AssetState::NoData => AssetState::NoData,
            _ if current_hash == record.content_hash => AssetState::Unchanged,
            _ => AssetState::Changed,
        };
        Some(record.state)
    }

    // === Queries ===

    /// Record for `id`, if indexed.
    #[must_use]
    pub fn lookup(&self, id: &AssetId) -> Option<&AssetRecord> {
        self.records.get(id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records.values()
    }

    /// Total number of dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.records.values().map(|r| r.dependencies.len()).sum()
    }

    /// Fingerprint of the corpus the index was built from.
    #[must_use]
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint
    }

    /// When the index was last fully built.
    #[must_use]
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    /// Every edge whose inverse half is missing. Empty for a consistent index.
    #[must_use]
    pub fn verify_inverse_edges(&self) -> Vec<EdgeViolation> {
        let mut ids: Vec<&AssetId> = self.records.keys().collect();
        ids.sort();

        let mut violations = Vec::new();
        for id in ids {
            let record = &self.records[id];
            for target in &record.dependencies {
                let mirrored = self
                    .records
                    .get(target)
                    .is_some_and(|t| t.references.contains(id));
                if !mirrored {
                    violations.push(EdgeViolation {
                        from: id.clone(),
                        to: target.clone(),
                        missing: MissingSide::Reference,
                    });
                }
            }
            for source in &record.references {
                let mirrored = self
                    .records
                    .get(source)
                    .is_some_and(|s| s.dependencies.contains(id));
                if !mirrored {
                    violations.push(EdgeViolation {
                        from: source.clone(),
                        to: id.clone(),
                        missing: MissingSide::Dependency,
                    });
                }
            }
        }
        violations
    }

    /// Groups of assets that depend on each other circularly.
    ///
    /// Uses Tarjan's strongly connected components. Members are sorted by ID
    /// and cycles by their first member.
    #[must_use]
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let mut ids: Vec<&AssetId> = self.records.keys().collect();
        ids.sort();

        let mut graph: DiGraph<&AssetId, ()> = DiGraph::new();
        let node_map: HashMap<&AssetId, NodeIndex> =
            ids.iter().map(|id| (*id, graph.add_node(*id))).collect();

        for id in &ids {
            let from = node_map[*id];
            for target in &self.records[*id].dependencies {
                if let Some(&to) = node_map.get(target) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        let mut cycles: Vec<Cycle> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&n| graph.contains_edge(n, n))
            })
            .map(|component| {
                let mut assets: Vec<AssetId> =
                    component.into_iter().map(|n| graph[n].clone()).collect();
                assets.sort();
                Cycle { assets }
            })
            .collect();
        cycles.sort_by(|a, b| a.assets.cmp(&b.assets));
        cycles
    }

    // === Persistence ===

    /// Write the whole index to `store` as one versioned snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn persist<S: CacheStore + ?Sized>(&self, store: &S) -> Result<()> {
        let mut records: Vec<AssetRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));

        let snapshot = Snapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            fingerprint: self.fingerprint.unwrap_or(Fingerprint(0)),
            built_at: self.built_at.unwrap_or_else(Utc::now),
            records,
        };
        let bytes = serde_json::to_vec(&snapshot)?;
        store.write(INDEX_CACHE_KEY, &bytes)?;
        debug!(
            assets = snapshot.records.len(),
            bytes = bytes.len(),
            "Dependency index persisted"
        );
        Ok(())
    }

    /// Replace the index with the snapshot in `store`, if it is usable.
    ///
    /// The snapshot is accepted only if it exists, parses, has the current
    /// format version, matches `current` and satisfies the inverse-edge
    /// invariant. Otherwise the index is left untouched and the caller
    /// should [`rebuild`](Self::rebuild).
    pub fn load<S: CacheStore + ?Sized>(&mut self, store: &S, current: Fingerprint) -> LoadOutcome {
        let outcome = self.try_load(store, current);
        match &outcome {
            LoadOutcome::Loaded { assets } => info!(assets, "Dependency index loaded from cache"),
            other => info!(outcome = %other, "Cached dependency index not usable"),
        }
        outcome
    }

    fn try_load<S: CacheStore + ?Sized>(&mut self, store: &S, current: Fingerprint) -> LoadOutcome {
        let bytes = match store.read(INDEX_CACHE_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return LoadOutcome::Missing,
            Err(e) => return LoadOutcome::Corrupt(e.to_string()),
        };

        // Check the version before committing to the full record layout
        let header: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => return LoadOutcome::Corrupt(e.to_string()),
        };
        let found = header
            .get("format_version")
            .and_then(serde_json::Value::as_u64);
        if found != Some(u64::from(SNAPSHOT_FORMAT_VERSION)) {
            return LoadOutcome::VersionMismatch { found };
        }

        let snapshot: Snapshot = match serde_json::from_value(header) {
            Ok(snapshot) => snapshot,
            Err(e) => return LoadOutcome::Corrupt(e.to_string()),
        };
        if snapshot.fingerprint != current {
            return LoadOutcome::FingerprintMismatch {
                cached: snapshot.fingerprint,
                current,
            };
        }

        let mut records = HashMap::with_capacity(snapshot.records.len());
        for record in snapshot.records {
            if let Some(problem) = edge_list_problem(&record) {
                return LoadOutcome::Corrupt(format!("record {}: {problem}", record.id));
            }
            let id = record.id.clone();
            if records.insert(id.clone(), record).is_some() {
                return LoadOutcome::Corrupt(format!("duplicate record {id}"));
            }
        }

        let candidate = Self {
            records,
            fingerprint: Some(snapshot.fingerprint),
            built_at: Some(snapshot.built_at),
        };
        if let Some(violation) = candidate.verify_inverse_edges().first() {
            return LoadOutcome::Corrupt(format!(
                "edge {} -> {} has no inverse",
                violation.from, violation.to
            ));
        }

        let assets = candidate.len();
        *self = candidate;
        LoadOutcome::Loaded { assets }
    }
}

/// Repeated or self-referencing entries in a stored record's edge lists.
fn edge_list_problem(record: &AssetRecord) -> Option<String> {
    for (label, list) in [
        ("dependencies", &record.dependencies),
        ("references", &record.references),
    ] {
        if list.contains(&record.id) {
            return Some(format!("{label} contain the record itself"));
        }
        let mut seen = HashSet::with_capacity(list.len());
        if let Some(repeated) = list.iter().find(|id| !seen.insert(*id)) {
            return Some(format!("{label} repeat {repeated}"));
        }
    }
    None
}

/// Filter a raw dependency list down to canonical, known, unique targets.
///
/// Returns the kept targets in first-seen order and the number of unknown
/// targets dropped.
fn canonical_dependencies(
    id: &AssetId,
    raw: Vec<AssetId>,
    is_known: impl Fn(&AssetId) -> bool,
) -> (Vec<AssetId>, usize) {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut dropped = 0;
    for target in raw {
        if &target == id || seen.contains(&target) {
            continue;
        }
        if !is_known(&target) {
            dropped += 1;
            continue;
        }
        seen.insert(target.clone());
        kept.push(target);
    }
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::corpus::MemoryCorpus;

    fn ids(list: &[&str]) -> Vec<AssetId> {
        list.iter().map(|s| AssetId::new(*s)).collect()
    }

    fn record<'a>(index: &'a DependencyIndex, id: &str) -> &'a AssetRecord {
        index.lookup(&AssetId::new(id)).expect("record should exist")
    }

    /// hero -> sword, shield; sword -> steel; shield -> steel
    fn armory() -> MemoryCorpus {
        MemoryCorpus::new()
            .with_asset("hero", "Assets/Hero.prefab", &["sword", "shield"])
            .with_asset("sword", "Assets/Sword.asset", &["steel"])
            .with_asset("shield", "Assets/Shield.asset", &["steel"])
            .with_asset("steel", "Assets/Steel.mat", &[])
    }

    #[test]
    fn rebuild_derives_references_in_enumeration_order() {
        let mut index = DependencyIndex::new();
        index.rebuild(&armory());

        assert_eq!(record(&index, "hero").dependencies, ids(&["sword", "shield"]));
        assert_eq!(record(&index, "steel").references, ids(&["sword", "shield"]));
        assert!(record(&index, "hero").references.is_empty());
        assert!(index.verify_inverse_edges().is_empty());
    }

    #[test]
    fn rebuild_drops_unknown_duplicate_and_self_targets() {
        let corpus = MemoryCorpus::new()
            .with_asset("a", "a", &["b", "ghost", "b", "a", "c"])
            .with_asset("b", "b", &[])
            .with_asset("c", "c", &[]);
        let mut index = DependencyIndex::new();

        let stats = index.rebuild(&corpus);

        assert_eq!(record(&index, "a").dependencies, ids(&["b", "c"]));
        assert_eq!(stats.unresolved_references, 1);
        assert_eq!(stats.dependency_edges, 2);
        assert_eq!(stats.assets_indexed, 3);
    }

    #[test]
    fn rebuild_clears_previous_records() {
        let mut index = DependencyIndex::new();
        index.rebuild(&armory());

        let smaller = MemoryCorpus::new().with_asset("solo", "solo", &[]);
        index.rebuild(&smaller);

        assert_eq!(index.len(), 1);
        assert!(index.lookup(&AssetId::new("hero")).is_none());
        assert_eq!(index.fingerprint(), Some(Fingerprint(1)));
    }

    #[test]
    fn rebuild_marks_records_unchanged_with_hash() {
        let mut index = DependencyIndex::new();
        index.rebuild(&armory());

        let hero = record(&index, "hero");
        assert_eq!(hero.state, AssetState::Unchanged);
        assert!(hero.content_hash.is_some());
        assert_eq!(hero.name, "Hero.prefab");
    }

    #[test]
    fn refresh_moves_inverse_edges() {
        let mut corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);

        corpus.set_dependencies("hero", &["shield", "steel"]);
        let state = index.refresh(&corpus, &AssetId::new("hero"));

        assert_eq!(state, Some(AssetState::Changed));
        assert_eq!(record(&index, "hero").dependencies, ids(&["shield", "steel"]));
        assert!(record(&index, "sword").references.is_empty());
        assert_eq!(record(&index, "steel").references, ids(&["sword", "shield", "hero"]));
        assert!(index.verify_inverse_edges().is_empty());
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);
        corpus.set_dependencies("sword", &["hero"]);

        index.refresh(&corpus, &AssetId::new("sword"));
        let after_first = index.clone();
        index.refresh(&corpus, &AssetId::new("sword"));

        assert_eq!(index, after_first);
    }

    #[test]
    fn refresh_with_unchanged_content_reports_unchanged() {
        let corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);
        let before = index.clone();

        let state = index.refresh(&corpus, &AssetId::new("hero"));

        assert_eq!(state, Some(AssetState::Unchanged));
        assert_eq!(index, before);
    }

    #[test]
    fn refresh_creates_record_for_unindexed_target() {
        let mut corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);

        corpus.insert_asset("gem", "Assets/Gem.mat", &[]);
        corpus.set_dependencies("sword", &["steel", "gem"]);
        index.refresh(&corpus, &AssetId::new("sword"));

        let gem = record(&index, "gem");
        assert_eq!(gem.state, AssetState::NoData);
        assert_eq!(gem.name, "Gem.mat");
        assert_eq!(gem.references, ids(&["sword"]));
        assert!(gem.dependencies.is_empty());
        assert!(index.verify_inverse_edges().is_empty());
    }

    #[test]
    fn refresh_of_unindexed_asset_creates_nodata_record() {
        let mut corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);

        corpus.insert_asset("boots", "Assets/Boots.prefab", &["steel"]);
        let state = index.refresh(&corpus, &AssetId::new("boots"));

        assert_eq!(state, Some(AssetState::NoData));
        assert_eq!(record(&index, "boots").dependencies, ids(&["steel"]));
        assert!(record(&index, "steel").references.contains(&AssetId::new("boots")));
    }

    #[test]
    fn refresh_of_unknown_asset_is_noop() {
        let mut index = DependencyIndex::new();
        index.rebuild(&armory());
        let before = index.clone();

        assert_eq!(index.refresh(&armory(), &AssetId::new("nope")), None);
        assert_eq!(index, before);
    }

    #[test]
    fn refresh_marks_deleted_asset_missing_and_keeps_edges() {
        let mut corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);

        corpus.remove_asset("sword");
        let state = index.refresh(&corpus, &AssetId::new("sword"));

        assert_eq!(state, Some(AssetState::Missing));
        assert_eq!(record(&index, "sword").dependencies, ids(&["steel"]));
        assert!(index.verify_inverse_edges().is_empty());
    }

    #[test]
    fn refresh_drops_targets_that_left_the_corpus() {
        let mut corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);

        corpus.remove_asset("steel");
        index.refresh(&corpus, &AssetId::new("sword"));

        assert!(record(&index, "sword").dependencies.is_empty());
        assert_eq!(record(&index, "steel").references, ids(&["shield"]));
        assert!(index.verify_inverse_edges().is_empty());
    }

    #[test]
    fn restoring_content_returns_state_to_unchanged() {
        let mut corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);
        let hero = AssetId::new("hero");

        corpus.set_dependencies("hero", &["sword"]);
        assert_eq!(index.refresh(&corpus, &hero), Some(AssetState::Changed));

        corpus.set_dependencies("hero", &["sword", "shield"]);
        assert_eq!(index.refresh(&corpus, &hero), Some(AssetState::Unchanged));
    }

    #[test]
    fn find_cycles_reports_strongly_connected_groups() {
        let corpus = MemoryCorpus::new()
            .with_asset("a", "a", &["b"])
            .with_asset("b", "b", &["c"])
            .with_asset("c", "c", &["a"])
            .with_asset("d", "d", &["a"])
            .with_asset("x", "x", &["y"])
            .with_asset("y", "y", &["x"]);
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);

        let cycles = index.find_cycles();

        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].assets, ids(&["a", "b", "c"]));
        assert_eq!(cycles[1].assets, ids(&["x", "y"]));
    }

    #[test]
    fn find_cycles_empty_for_acyclic_graph() {
        let mut index = DependencyIndex::new();
        index.rebuild(&armory());

        assert!(index.find_cycles().is_empty());
    }

    #[test]
    fn persist_then_load_round_trips() {
        let corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);
        let store = MemoryCacheStore::new();

        index.persist(&store).expect("persist should succeed");
        let mut loaded = DependencyIndex::new();
        let outcome = loaded.load(&store, corpus.fingerprint());

        assert!(outcome.is_loaded());
        assert_eq!(loaded, index);
    }

    #[test]
    fn load_rejects_fingerprint_mismatch_without_touching_index() {
        let corpus = armory();
        let mut index = DependencyIndex::new();
        index.rebuild(&corpus);
        let store = MemoryCacheStore::new();
        index.persist(&store).expect("persist should succeed");

        let mut other = DependencyIndex::new();
        other.rebuild(&MemoryCorpus::new().with_asset("solo", "solo", &[]));
        let before = other.clone();
        let outcome = other.load(&store, Fingerprint(99));

        assert!(matches!(outcome, LoadOutcome::FingerprintMismatch { .. }));
        assert_eq!(other, before);
    }

    #[test]
    fn load_reports_missing_cache() {
        let mut index = DependencyIndex::new();
        let outcome = index.load(&MemoryCacheStore::new(), Fingerprint(0));

        assert_eq!(outcome, LoadOutcome::Missing);
        assert!(!outcome.is_loaded());
    }

    #[test]
    fn canonical_dependencies_counts_only_unknown_targets() {
        let (kept, dropped) = canonical_dependencies(
            &AssetId::new("a"),
            ids(&["a", "b", "b", "z"]),
            |t| t.as_str() != "z",
        );

        assert_eq!(kept, ids(&["b"]));
        assert_eq!(dropped, 1);
    }
}
