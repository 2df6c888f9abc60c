//! The top-level owner of the index and its collaborators.
//!
//! A [`Session`] is constructed once per process: it scans the corpus, loads
//! the cached index when the corpus fingerprint still matches, and otherwise
//! rebuilds and re-caches it. Everything else borrows the index through the
//! session, so there is exactly one index and one place that mutates it.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cache::{CacheStore, FileCacheStore, LoadOutcome};
use crate::config::Config;
use crate::corpus::{Corpus, FsCorpus};
use crate::error::Result;
use crate::index::DependencyIndex;
use crate::selection;
use crate::tree::{self, TreeNode};
use crate::types::{AssetId, Direction, IndexStats};

/// A corpus, its dependency index and the cache backing it.
#[derive(Debug)]
pub struct Session {
    config: Config,
    corpus: FsCorpus,
    store: FileCacheStore,
    index: DependencyIndex,
    load_outcome: LoadOutcome,
    build_stats: Option<IndexStats>,
}

impl Session {
    /// Open a session on the corpus at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the corpus root cannot be scanned. Cache problems
    /// never fail the session; they only force a rebuild.
    pub fn open(root: &Path, config: Config) -> Result<Self> {
        let corpus = FsCorpus::scan(root, &config.scan_options())?;
        let store = FileCacheStore::new(corpus.root().join(&config.cache_dir));

        let mut session = Self {
            config,
            corpus,
            store,
            index: DependencyIndex::new(),
            load_outcome: LoadOutcome::Missing,
            build_stats: None,
        };

        session.load_outcome = session
            .index
            .load(&session.store, session.corpus.fingerprint());
        if !session.load_outcome.is_loaded() {
            session.rebuild();
        }
        Ok(session)
    }

    /// Rebuild the index from scratch and write it to the cache.
    pub fn rebuild(&mut self) -> &IndexStats {
        let stats = self.index.rebuild(&self.corpus);
        persist_logged(&self.index, &self.store);
        self.build_stats.insert(stats)
    }

    /// Write the current index, including refreshed records, to the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be written.
    pub fn save(&self) -> Result<()> {
        self.index.persist(&self.store)
    }

    /// Resolve selected paths into root IDs.
    #[must_use]
    pub fn resolve<P: AsRef<str>>(&self, selected_paths: &[P]) -> Vec<AssetId> {
        selection::resolve(&self.corpus, selected_paths)
    }

    /// Resolve a selection and materialize its tree.
    pub fn materialize<P: AsRef<str>>(
        &mut self,
        selected_paths: &[P],
        direction: Direction,
        refresh_before_visit: bool,
    ) -> TreeNode<'_> {
        let roots = selection::resolve(&self.corpus, selected_paths);
        info!(
            selected = selected_paths.len(),
            roots = roots.len(),
            %direction,
            "Materializing tree"
        );
        tree::materialize(
            &mut self.index,
            &self.corpus,
            &roots,
            direction,
            refresh_before_visit,
        )
    }

    /// The dependency index.
    #[must_use]
    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    /// The scanned corpus.
    #[must_use]
    pub fn corpus(&self) -> &FsCorpus {
        &self.corpus
    }

    /// Configuration the session was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// What happened when the cached index was loaded at open.
    #[must_use]
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Statistics of the most recent rebuild, if the session performed one.
    #[must_use]
    pub fn build_stats(&self) -> Option<&IndexStats> {
        self.build_stats.as_ref()
    }

    /// Path of the cache file.
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.store.path_for(crate::cache::INDEX_CACHE_KEY)
    }
}

fn persist_logged<S: CacheStore + ?Sized>(index: &DependencyIndex, store: &S) {
    if let Err(e) = index.persist(store) {
        warn!(error = %e, "Failed to write index cache, continuing without it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const A: &str = "0000000000000000000000000000000a";
    const B: &str = "0000000000000000000000000000000b";

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(path, content).expect("failed to write file");
    }

    fn project() -> TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "Assets/A.prefab", &format!("ref: {{guid: {B}}}"));
        write(dir.path(), "Assets/A.prefab.meta", &format!("guid: {A}\n"));
        write(dir.path(), "Assets/B.mat", "plain");
        write(dir.path(), "Assets/B.mat.meta", &format!("guid: {B}\n"));
        dir
    }

    #[test]
    fn first_open_rebuilds_and_writes_cache() {
        let dir = project();

        let session = Session::open(dir.path(), Config::default()).expect("open");

        assert_eq!(session.load_outcome(), &LoadOutcome::Missing);
        assert!(session.build_stats().is_some());
        assert!(session.cache_path().exists());
        assert_eq!(session.index().len(), 2);
    }

    #[test]
    fn second_open_loads_from_cache() {
        let dir = project();
        let first = Session::open(dir.path(), Config::default()).expect("open");
        drop(first);

        let second = Session::open(dir.path(), Config::default()).expect("open");

        assert!(second.load_outcome().is_loaded());
        assert!(second.build_stats().is_none());
    }

    #[test]
    fn new_asset_invalidates_cache() {
        let dir = project();
        drop(Session::open(dir.path(), Config::default()).expect("open"));
        write(dir.path(), "Assets/C.txt", "x");
        write(
            dir.path(),
            "Assets/C.txt.meta",
            "guid: 0000000000000000000000000000000c\n",
        );

        let session = Session::open(dir.path(), Config::default()).expect("open");

        assert!(matches!(
            session.load_outcome(),
            LoadOutcome::FingerprintMismatch { .. }
        ));
        assert_eq!(session.index().len(), 3);
    }

    #[test]
    fn materialize_resolves_paths() {
        let dir = project();
        let mut session = Session::open(dir.path(), Config::default()).expect("open");

        let root = session.materialize(&["Assets/B.mat"], Direction::References, true);

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].display_name, "B.mat");
        assert_eq!(root.children[0].children[0].display_name, "A.prefab");
    }
}
