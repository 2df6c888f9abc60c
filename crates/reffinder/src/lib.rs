//! # reffinder: asset dependency and reference trees
//!
//! reffinder indexes a corpus of assets identified by stable GUIDs and
//! answers two dual questions: what does an asset depend on, and what
//! depends on it. Answers are materialized as trees rooted at a selection,
//! safe against dependency cycles.
//!
//! ## Design
//!
//! - **Index once, refresh on demand** - a full build scans every asset; a
//!   single asset can be re-scanned later without rebuilding
//! - **References are derived** - only dependencies are read from content;
//!   the inverse edges are always recomputed from them
//! - **Cheap restarts** - the index is cached as a versioned snapshot and
//!   reused while the corpus fingerprint matches
//! - **Produce less, never fail** - unknown targets, cycles and dangling
//!   references shrink the result instead of raising errors
//!
//! ## Quick Start
//!
//! ```no_run
//! use reffinder::{Config, Direction, Session};
//! use std::path::Path;
//!
//! let mut session = Session::open(Path::new("/path/to/project"), Config::default())?;
//!
//! let tree = session.materialize(&["Assets/Prefabs"], Direction::References, true);
//! for node in tree.iter().skip(1) {
//!     println!("{}{}", "  ".repeat(node.depth as usize), node.display_name);
//! }
//! # Ok::<(), reffinder::Error>(())
//! ```

pub mod cache;
pub mod config;
pub mod corpus;
mod error;
pub mod index;
pub mod output;
pub mod selection;
pub mod session;
pub mod tree;
mod types;

pub use cache::{CacheStore, FileCacheStore, LoadOutcome, MemoryCacheStore};
pub use config::Config;
pub use corpus::{AssetCatalog, AssetInfo, CatalogEntry, Corpus, FsCorpus, MemoryCorpus};
pub use error::{Error, Result, ScanIssue};
pub use index::DependencyIndex;
pub use selection::resolve;
pub use session::Session;
pub use tree::{materialize, TreeNode};
pub use types::{
    AssetId, AssetRecord, AssetState, Cycle, Direction, EdgeViolation, Fingerprint, IndexStats,
    MissingSide,
};
