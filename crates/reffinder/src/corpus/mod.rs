//! Collaborators the index reads assets from.
//!
//! The index never touches storage directly. It consumes a [`Corpus`] for
//! asset enumeration and per-asset dependency scans, and the selection
//! resolver consumes an [`AssetCatalog`] to turn user-selected paths into
//! asset IDs.
//!
//! Two implementations ship with the crate:
//! - [`FsCorpus`]: a directory tree where every asset has a `.meta` sidecar
//!   carrying its GUID
//! - [`MemoryCorpus`]: an in-memory corpus for tests and embedding

mod fs;
mod memory;

pub use fs::{FsCorpus, ScanOptions, DEFAULT_EXCLUDES};
pub use memory::MemoryCorpus;

use crate::error::ScanIssue;
use crate::types::{AssetId, Fingerprint};

/// Descriptive data for an asset that currently exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInfo {
    /// Display name (last path segment)
    pub name: String,
    /// Corpus-relative path
    pub path: String,
}

/// Source of assets and their raw dependency lists.
pub trait Corpus {
    /// Every asset in the corpus, in a stable order.
    fn asset_ids(&self) -> Vec<AssetId>;

    /// Name and path of an asset, or `None` if it does not currently exist.
    fn describe(&self, id: &AssetId) -> Option<AssetInfo>;

    /// Raw direct dependencies, read from the asset's current content.
    ///
    /// The list may contain duplicates, the asset itself, and IDs unknown to
    /// the corpus; the index filters those.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanIssue`] if the asset's content cannot be read.
    fn direct_dependencies(&self, id: &AssetId) -> Result<Vec<AssetId>, ScanIssue>;

    /// Hash of the asset's current content, or `None` if it does not exist.
    fn content_hash(&self, id: &AssetId) -> Option<u64>;

    /// Summary of the corpus used to validate a cached index.
    fn fingerprint(&self) -> Fingerprint;
}

/// A catalog entry found beneath a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// ID of the entry
    pub id: AssetId,
    /// Whether the entry is itself a folder
    pub is_folder: bool,
}

/// Maps selection paths to asset IDs.
pub trait AssetCatalog {
    /// ID of the asset or folder at `path`.
    fn id_for_path(&self, path: &str) -> Option<AssetId>;

    /// Whether `path` denotes a folder.
    fn is_folder(&self, path: &str) -> bool;

    /// Every entry beneath `folder`, recursively, folders included.
    fn descendants(&self, folder: &str) -> Vec<CatalogEntry>;
}

/// Last segment of a `/`-separated path.
pub(crate) fn display_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
