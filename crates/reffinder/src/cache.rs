//! Snapshot persistence for the dependency index.
//!
//! The index is stored as a single JSON blob under [`INDEX_CACHE_KEY`]. The
//! blob carries an explicit format version and the corpus fingerprint at
//! build time; a snapshot with any other version is rejected outright rather
//! than parsed on a best-effort basis.
//!
//! # Atomicity
//!
//! [`FileCacheStore`] writes each blob to a temporary file and renames it over
//! the target. If a crash interrupts the write the previous cache file stays
//! intact; at worst a stray `.tmp` file is left behind.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{AssetRecord, Fingerprint};

/// Key under which the dependency index snapshot is stored.
pub const INDEX_CACHE_KEY: &str = "dependency-index";

/// Current snapshot layout version. Bump on any incompatible change.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serialized form of the whole index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    pub format_version: u32,
    pub fingerprint: Fingerprint,
    pub built_at: DateTime<Utc>,
    pub records: Vec<AssetRecord>,
}

/// Result of trying to load the index from a cache store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The snapshot was accepted
    Loaded {
        /// Number of records loaded
        assets: usize,
    },
    /// Nothing is stored under the index key
    Missing,
    /// The blob could not be read or parsed, or its records are inconsistent
    Corrupt(String),
    /// The blob was written by an incompatible format version
    VersionMismatch {
        /// Version found in the blob, if any
        found: Option<u64>,
    },
    /// The corpus changed since the snapshot was built
    FingerprintMismatch {
        /// Fingerprint stored in the snapshot
        cached: Fingerprint,
        /// Fingerprint of the corpus now
        current: Fingerprint,
    },
}

impl LoadOutcome {
    /// Whether the index was replaced by the snapshot.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { assets } => write!(f, "loaded {assets} assets"),
            Self::Missing => write!(f, "no cached index"),
            Self::Corrupt(reason) => write!(f, "cached index is corrupt: {reason}"),
            Self::VersionMismatch { found: Some(v) } => write!(
                f,
                "cached index has format version {v}, expected {SNAPSHOT_FORMAT_VERSION}"
            ),
            Self::VersionMismatch { found: None } => {
                write!(f, "cached index has no format version")
            }
            Self::FingerprintMismatch { cached, current } => write!(
                f,
                "corpus changed since the cached index was built ({cached} != {current})"
            ),
        }
    }
}

/// Byte-oriented persistence medium keyed by an opaque string.
pub trait CacheStore {
    /// Read the blob stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// Cache store keeping one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    /// Store blobs under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CacheStore for FileCacheStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp_path = make_temp_path(&path);

        if let Err(e) = std::fs::write(&temp_path, bytes) {
            // Best-effort cleanup of temp file
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }

        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

/// Temp path alongside `path`, with `.tmp` appended to the extension.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

/// Cache store held in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryCacheStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.borrow_mut().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trips_blob() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileCacheStore::new(dir.path().join("cache"));

        store.write("index", b"hello").expect("write");

        assert_eq!(store.read("index").expect("read"), Some(b"hello".to_vec()));
        assert!(store.path_for("index").exists());
    }

    #[test]
    fn file_store_reports_missing_key_as_none() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileCacheStore::new(dir.path());

        assert_eq!(store.read("absent").expect("read"), None);
    }

    #[test]
    fn file_store_replaces_existing_blob_without_leftovers() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileCacheStore::new(dir.path());

        store.write("index", b"first").expect("write");
        store.write("index", b"second").expect("write");

        assert_eq!(store.read("index").expect("read"), Some(b"second".to_vec()));
        assert!(!make_temp_path(&store.path_for("index")).exists());
    }

    #[test]
    fn make_temp_path_appends_tmp_to_extension() {
        assert_eq!(
            make_temp_path(Path::new("/c/dependency-index.json")),
            PathBuf::from("/c/dependency-index.json.tmp")
        );
        assert_eq!(make_temp_path(Path::new("/c/index")), PathBuf::from("/c/index.tmp"));
    }

    #[test]
    fn memory_store_round_trips_blob() {
        let store = MemoryCacheStore::new();
        store.write("k", b"v").expect("write");

        assert_eq!(store.read("k").expect("read"), Some(b"v".to_vec()));
        assert_eq!(store.read("other").expect("read"), None);
    }

    #[test]
    fn load_outcome_display_explains_mismatch() {
        let outcome = LoadOutcome::VersionMismatch { found: Some(7) };
        assert!(outcome.to_string().contains("version 7"));
        assert!(!outcome.is_loaded());
        assert!(LoadOutcome::Loaded { assets: 3 }.is_loaded());
    }
}
