//! Filesystem corpus backed by `.meta` sidecar files.
//!
//! Every asset `X` has a sibling `X.meta` whose `guid:` line carries the
//! asset's stable ID. Text assets reference other assets by writing their
//! GUIDs (`{fileID: 100, guid: 1f2e..., type: 3}`), so an asset's direct
//! dependencies are the GUIDs mentioned in its content.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;
use xxhash_rust::xxh3::{xxh3_64, Xxh3};

use super::{display_name, AssetCatalog, AssetInfo, CatalogEntry, Corpus};
use crate::error::{Error, Result, ScanIssue};
use crate::types::{AssetId, Fingerprint};

const META_EXTENSION: &str = ".meta";

/// Directory names skipped by default (generated or build output).
pub const DEFAULT_EXCLUDES: &[&str] = &["Library", "Temp", "Logs", "obj", "Build"];

static META_GUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^guid:\s*([0-9a-fA-F]{32})\s*$")
        .unwrap_or_else(|_| panic!("invalid meta guid pattern"))
});

static GUID_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"guid:\s*([0-9a-fA-F]{32})").unwrap_or_else(|_| panic!("invalid guid pattern"))
});

/// Options controlling which parts of the tree are scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory names to skip anywhere in the tree
    pub exclude: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude: DEFAULT_EXCLUDES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct FsEntry {
    rel_path: String,
    is_folder: bool,
}

/// A corpus read from a directory of assets with `.meta` sidecars.
///
/// The set of assets is fixed when the corpus is scanned; asset content is
/// read fresh on every dependency scan, so refreshes see edits made after
/// the scan.
#[derive(Debug)]
pub struct FsCorpus {
    root: PathBuf,
    assets: Vec<AssetId>,
    entries: HashMap<AssetId, FsEntry>,
    by_path: HashMap<String, AssetId>,
    fingerprint: Fingerprint,
    issues: Vec<ScanIssue>,
}

impl FsCorpus {
    /// Walk `root` and collect every asset that has a valid meta file.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a readable directory. Problems with
    /// individual meta files are recorded in [`issues`](Self::issues).
    pub fn scan(root: &Path, options: &ScanOptions) -> Result<Self> {
        let root = root.canonicalize().map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("corpus root not found: {}", root.display()),
            ))
        })?;
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "corpus root is not a directory: {}",
                root.display()
            )));
        }

        let mut corpus = Self {
            root: root.clone(),
            assets: Vec::new(),
            entries: HashMap::new(),
            by_path: HashMap::new(),
            fingerprint: Fingerprint(0),
            issues: Vec::new(),
        };

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped(e.file_name(), &options.exclude));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "Failed to read directory entry, skipping");
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    corpus.issues.push(ScanIssue::new(path, e.to_string()));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let meta_path = entry.path();
            let Some(asset_path) = asset_path_for_meta(meta_path) else {
                continue;
            };
            corpus.register(meta_path, &asset_path);
        }

        corpus.fingerprint = fingerprint_of(&corpus.assets);
        debug!(
            root = %corpus.root.display(),
            assets = corpus.assets.len(),
            folders = corpus.entries.len() - corpus.assets.len(),
            issues = corpus.issues.len(),
            "Corpus scan completed"
        );
        Ok(corpus)
    }

    /// Root directory of the corpus.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Problems with individual meta files found during the scan.
    #[must_use]
    pub fn issues(&self) -> &[ScanIssue] {
        &self.issues
    }

    fn register(&mut self, meta_path: &Path, asset_path: &Path) {
        let is_folder = asset_path.is_dir();
        if !is_folder && !asset_path.is_file() {
            debug!(meta = %meta_path.display(), "Orphaned meta file, skipping");
            return;
        }

        let content = match std::fs::read_to_string(meta_path) {
            Ok(c) => c,
            Err(e) => {
                warn!(meta = %meta_path.display(), error = %e, "Cannot read meta file, skipping");
                self.issues.push(ScanIssue::new(meta_path, e.to_string()));
                return;
            }
        };
        let Some(guid) = META_GUID.captures(&content).map(|c| c[1].to_ascii_lowercase()) else {
            self.issues
                .push(ScanIssue::new(meta_path, "meta file has no guid line"));
            return;
        };

        let id = AssetId::new(guid);
        let rel_path = self.relative(asset_path);
        if let Some(existing) = self.entries.get(&id) {
            warn!(
                guid = %id,
                kept = %existing.rel_path,
                skipped = %rel_path,
                "Duplicate guid, keeping first path"
            );
            self.issues.push(ScanIssue::new(
                meta_path,
                format!("duplicate guid {id} (already used by {})", existing.rel_path),
            ));
            return;
        }

        if !is_folder {
            self.assets.push(id.clone());
        }
        self.by_path.insert(rel_path.clone(), id.clone());
        self.entries.insert(id, FsEntry { rel_path, is_folder });
    }

    /// Corpus-relative path with `/` separators.
    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Normalise a user-supplied path (absolute, relative, either separator).
    fn normalize(&self, path: &str) -> String {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            if let Ok(canonical) = candidate.canonicalize() {
                return self.relative(&canonical);
            }
            return self.relative(candidate);
        }
        let normalized = path
            .replace('\\', "/")
            .trim_start_matches("./")
            .trim_end_matches('/')
            .to_string();
        if normalized == "." {
            String::new()
        } else {
            normalized
        }
    }

    fn asset_file(&self, id: &AssetId) -> Option<PathBuf> {
        self.entries
            .get(id)
            .filter(|e| !e.is_folder)
            .map(|e| self.root.join(&e.rel_path))
    }
}

impl Corpus for FsCorpus {
    fn asset_ids(&self) -> Vec<AssetId> {
        self.assets.clone()
    }

    fn describe(&self, id: &AssetId) -> Option<AssetInfo> {
        let entry = self.entries.get(id).filter(|e| !e.is_folder)?;
        if !self.root.join(&entry.rel_path).is_file() {
            return None;
        }
        Some(AssetInfo {
            name: display_name(&entry.rel_path).to_string(),
            path: entry.rel_path.clone(),
        })
    }

    fn direct_dependencies(&self, id: &AssetId) -> std::result::Result<Vec<AssetId>, ScanIssue> {
        let Some(path) = self.asset_file(id) else {
            return Err(ScanIssue::new(id.as_str(), "asset not in corpus"));
        };
        let bytes = std::fs::read(&path).map_err(|e| ScanIssue::new(&path, e.to_string()))?;

        // Binary assets cannot reference other assets by guid
        let Ok(text) = std::str::from_utf8(&bytes) else {
            return Ok(Vec::new());
        };

        Ok(GUID_REFERENCE
            .captures_iter(text)
            .map(|c| AssetId::new(c[1].to_ascii_lowercase()))
            .collect())
    }

    fn content_hash(&self, id: &AssetId) -> Option<u64> {
        let path = self.asset_file(id)?;
        let content = std::fs::read(&path).ok()?;
        let mut meta_path = path.into_os_string();
        meta_path.push(META_EXTENSION);
        let meta = std::fs::read(PathBuf::from(meta_path)).unwrap_or_default();

        let mut hasher = Xxh3::new();
        hasher.update(&content);
        hasher.update(&meta);
        Some(hasher.digest())
    }

    fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

impl AssetCatalog for FsCorpus {
    fn id_for_path(&self, path: &str) -> Option<AssetId> {
        self.by_path.get(&self.normalize(path)).cloned()
    }

    fn is_folder(&self, path: &str) -> bool {
        match self.id_for_path(path).and_then(|id| self.entries.get(&id)) {
            Some(entry) => entry.is_folder,
            // Directories without a meta file, such as the top-level `Assets`
            None => self.root.join(self.normalize(path)).is_dir(),
        }
    }

    fn descendants(&self, folder: &str) -> Vec<CatalogEntry> {
        let folder = self.normalize(folder);
        let prefix = if folder.is_empty() {
            String::new()
        } else {
            format!("{folder}/")
        };
        let mut found: Vec<(&String, CatalogEntry)> = self
            .by_path
            .iter()
            .filter(|(path, _)| path.starts_with(&prefix))
            .filter_map(|(path, id)| {
                self.entries.get(id).map(|e| {
                    (
                        path,
                        CatalogEntry {
                            id: id.clone(),
                            is_folder: e.is_folder,
                        },
                    )
                })
            })
            .collect();
        found.sort_by(|a, b| a.0.cmp(b.0));
        found.into_iter().map(|(_, entry)| entry).collect()
    }
}

fn is_skipped(name: &std::ffi::OsStr, exclude: &[String]) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || exclude.iter().any(|e| e == name.as_ref())
}

fn asset_path_for_meta(meta_path: &Path) -> Option<PathBuf> {
    let name = meta_path.file_name()?.to_str()?;
    let asset_name = name.strip_suffix(META_EXTENSION)?;
    if asset_name.is_empty() {
        return None;
    }
    Some(meta_path.with_file_name(asset_name))
}

fn fingerprint_of(assets: &[AssetId]) -> Fingerprint {
    let mut sorted: Vec<&str> = assets.iter().map(AssetId::as_str).collect();
    sorted.sort_unstable();
    Fingerprint(xxh3_64(sorted.join("\n").as_bytes()))
}
