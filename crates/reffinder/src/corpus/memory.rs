//! In-memory corpus.

use std::collections::HashMap;

use xxhash_rust::xxh3::xxh3_64;

use super::{display_name, AssetCatalog, AssetInfo, CatalogEntry, Corpus};
use crate::error::ScanIssue;
use crate::types::{AssetId, Fingerprint};

#[derive(Debug, Clone)]
struct MemoryAsset {
    path: String,
    dependencies: Vec<AssetId>,
    content_hash: u64,
}

/// A corpus held entirely in memory.
///
/// Content hashes are derived from the dependency list, so changing an
/// asset's dependencies changes its hash and restoring them restores it.
/// The fingerprint is the asset count.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    order: Vec<AssetId>,
    assets: HashMap<AssetId, MemoryAsset>,
    folders: Vec<(String, AssetId)>,
}

impl MemoryCorpus {
    /// Create an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert_asset`](Self::insert_asset).
    #[must_use]
    pub fn with_asset(mut self, id: &str, path: &str, dependencies: &[&str]) -> Self {
        self.insert_asset(id, path, dependencies);
        self
    }

    /// Builder form of [`insert_folder`](Self::insert_folder).
    #[must_use]
    pub fn with_folder(mut self, id: &str, path: &str) -> Self {
        self.insert_folder(id, path);
        self
    }

    /// Add or replace an asset.
    pub fn insert_asset(&mut self, id: &str, path: &str, dependencies: &[&str]) {
        let id = AssetId::new(id);
        if !self.assets.contains_key(&id) {
            self.order.push(id.clone());
        }
        let dependencies: Vec<AssetId> = dependencies.iter().map(|d| AssetId::new(*d)).collect();
        let content_hash = hash_dependencies(&dependencies);
        self.assets.insert(
            id,
            MemoryAsset {
                path: path.to_string(),
                dependencies,
                content_hash,
            },
        );
    }

    /// Add a folder (a container that is not itself indexed).
    pub fn insert_folder(&mut self, id: &str, path: &str) {
        self.folders.push((path.to_string(), AssetId::new(id)));
    }

    /// Change what an asset's content declares. Returns `false` if the asset is unknown.
    pub fn set_dependencies(&mut self, id: &str, dependencies: &[&str]) -> bool {
        let Some(asset) = self.assets.get_mut(&AssetId::new(id)) else {
            return false;
        };
        asset.dependencies = dependencies.iter().map(|d| AssetId::new(*d)).collect();
        asset.content_hash = hash_dependencies(&asset.dependencies);
        true
    }

    /// Override an asset's content hash, as if its content changed without
    /// touching its dependencies. Returns `false` if the asset is unknown.
    pub fn set_content_hash(&mut self, id: &str, content_hash: u64) -> bool {
        let Some(asset) = self.assets.get_mut(&AssetId::new(id)) else {
            return false;
        };
        asset.content_hash = content_hash;
        true
    }

    /// Delete an asset. Returns `false` if it was not present.
    pub fn remove_asset(&mut self, id: &str) -> bool {
        let id = AssetId::new(id);
        self.order.retain(|existing| existing != &id);
        self.assets.remove(&id).is_some()
    }
}

fn hash_dependencies(dependencies: &[AssetId]) -> u64 {
    let joined = dependencies
        .iter()
        .map(AssetId::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    xxh3_64(joined.as_bytes())
}

impl Corpus for MemoryCorpus {
    fn asset_ids(&self) -> Vec<AssetId> {
        self.order.clone()
    }

    fn describe(&self, id: &AssetId) -> Option<AssetInfo> {
        self.assets.get(id).map(|asset| {
            let name = if asset.path.is_empty() {
                id.to_string()
            } else {
                display_name(&asset.path).to_string()
            };
            AssetInfo {
                name,
                path: asset.path.clone(),
            }
        })
    }

    fn direct_dependencies(&self, id: &AssetId) -> Result<Vec<AssetId>, ScanIssue> {
        self.assets
            .get(id)
            .map(|asset| asset.dependencies.clone())
            .ok_or_else(|| ScanIssue::new(id.as_str(), "asset not in corpus"))
    }

    fn content_hash(&self, id: &AssetId) -> Option<u64> {
        self.assets.get(id).map(|asset| asset.content_hash)
    }

    fn fingerprint(&self) -> Fingerprint {
        Fingerprint(self.order.len() as u64)
    }
}

impl AssetCatalog for MemoryCorpus {
    fn id_for_path(&self, path: &str) -> Option<AssetId> {
        let path = path.trim_end_matches('/');
        self.folders
            .iter()
            .find(|(folder, _)| folder == path)
            .map(|(_, id)| id.clone())
            .or_else(|| {
                self.order
                    .iter()
                    .find(|id| self.assets.get(*id).is_some_and(|a| a.path == path))
                    .cloned()
            })
    }

    fn is_folder(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        self.folders.iter().any(|(folder, _)| folder == path)
    }

    fn descendants(&self, folder: &str) -> Vec<CatalogEntry> {
        let prefix = format!("{}/", folder.trim_end_matches('/'));

        let mut found: Vec<(&str, CatalogEntry)> = self
            .folders
            .iter()
            .filter(|(path, _)| path.starts_with(&prefix))
            .map(|(path, id)| {
                (
                    path.as_str(),
                    CatalogEntry {
                        id: id.clone(),
                        is_folder: true,
                    },
                )
            })
            .collect();

        for id in &self.order {
            if let Some(asset) = self.assets.get(id) {
                if asset.path.starts_with(&prefix) {
                    found.push((
                        asset.path.as_str(),
                        CatalogEntry {
                            id: id.clone(),
                            is_folder: false,
                        },
                    ));
                }
            }
        }

        // Path order, like a directory walk
        found.sort_by(|a, b| a.0.cmp(b.0));
        found.into_iter().map(|(_, entry)| entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryCorpus {
        MemoryCorpus::new()
            .with_folder("f-ui", "Assets/UI")
            .with_folder("f-icons", "Assets/UI/Icons")
            .with_asset("hud", "Assets/UI/Hud.prefab", &["icon"])
            .with_asset("icon", "Assets/UI/Icons/Star.png", &[])
            .with_asset("hero", "Assets/Hero.prefab", &["hud"])
    }

    #[test]
    fn describe_uses_last_path_segment() {
        let corpus = sample();
        let info = corpus.describe(&AssetId::new("hud")).expect("known asset");

        assert_eq!(info.name, "Hud.prefab");
        assert_eq!(info.path, "Assets/UI/Hud.prefab");
    }

    #[test]
    fn describe_falls_back_to_id_without_path() {
        let corpus = MemoryCorpus::new().with_asset("a", "", &[]);

        assert_eq!(corpus.describe(&AssetId::new("a")).expect("known").name, "a");
    }

    #[test]
    fn set_dependencies_changes_content_hash() {
        let mut corpus = sample();
        let id = AssetId::new("hud");
        let before = corpus.content_hash(&id);

        assert!(corpus.set_dependencies("hud", &[]));
        assert_ne!(corpus.content_hash(&id), before);

        assert!(corpus.set_dependencies("hud", &["icon"]));
        assert_eq!(corpus.content_hash(&id), before);
    }

    #[test]
    fn set_content_hash_leaves_dependencies_alone() {
        let mut corpus = sample();
        let id = AssetId::new("hud");

        assert!(corpus.set_content_hash("hud", 7));
        assert!(!corpus.set_content_hash("nope", 7));

        assert_eq!(corpus.content_hash(&id), Some(7));
        assert_eq!(
            corpus.direct_dependencies(&id).expect("known"),
            vec![AssetId::new("icon")]
        );
    }

    #[test]
    fn remove_asset_drops_it_from_enumeration() {
        let mut corpus = sample();

        assert!(corpus.remove_asset("icon"));
        assert!(!corpus.asset_ids().contains(&AssetId::new("icon")));
        assert!(corpus.describe(&AssetId::new("icon")).is_none());
        assert!(corpus.direct_dependencies(&AssetId::new("icon")).is_err());
        assert_eq!(corpus.fingerprint(), Fingerprint(2));
    }

    #[test]
    fn descendants_are_recursive_and_path_ordered() {
        let corpus = sample();
        let ids: Vec<_> = corpus
            .descendants("Assets/UI")
            .into_iter()
            .map(|e| (e.id.0, e.is_folder))
            .collect();

        assert_eq!(
            ids,
            vec![
                ("hud".to_string(), false),
                ("f-icons".to_string(), true),
                ("icon".to_string(), false),
            ]
        );
    }

    #[test]
    fn id_for_path_resolves_assets_and_folders() {
        let corpus = sample();

        assert_eq!(corpus.id_for_path("Assets/Hero.prefab"), Some(AssetId::new("hero")));
        assert_eq!(corpus.id_for_path("Assets/UI/"), Some(AssetId::new("f-ui")));
        assert!(corpus.is_folder("Assets/UI"));
        assert!(!corpus.is_folder("Assets/Hero.prefab"));
        assert_eq!(corpus.id_for_path("Assets/Nope.prefab"), None);
    }
}
