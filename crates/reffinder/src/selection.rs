//! Expands a user selection into the root IDs of a tree.

use std::collections::HashSet;

use tracing::debug;

use crate::corpus::AssetCatalog;
use crate::types::AssetId;

/// Turn selected paths into an ordered list of asset IDs.
///
/// A folder contributes every non-folder asset beneath it, recursively,
/// skipping IDs already present anywhere in the result. A single asset is
/// appended as-is, even if it is already present, so selecting the same
/// asset twice yields it twice. Paths the catalog cannot resolve are skipped.
pub fn resolve<C, P>(catalog: &C, selected_paths: &[P]) -> Vec<AssetId>
where
    C: AssetCatalog + ?Sized,
    P: AsRef<str>,
{
    let mut result = Vec::new();
    let mut present: HashSet<AssetId> = HashSet::new();

    for path in selected_paths {
        let path = path.as_ref();
        if catalog.is_folder(path) {
            for entry in catalog.descendants(path) {
                if entry.is_folder || present.contains(&entry.id) {
                    continue;
                }
                present.insert(entry.id.clone());
                result.push(entry.id);
            }
        } else if let Some(id) = catalog.id_for_path(path) {
            present.insert(id.clone());
            result.push(id);
        } else {
            debug!(path, "Selected path is not a known asset, skipping");
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::MemoryCorpus;

    fn catalog() -> MemoryCorpus {
        MemoryCorpus::new()
            .with_folder("f-ui", "Assets/UI")
            .with_folder("f-icons", "Assets/UI/Icons")
            .with_asset("x", "Assets/UI/Hud.prefab", &[])
            .with_asset("y", "Assets/UI/Icons/Y.png", &[])
            .with_asset("z", "Assets/Z.prefab", &[])
    }

    fn strs(ids: &[AssetId]) -> Vec<&str> {
        ids.iter().map(AssetId::as_str).collect()
    }

    #[test]
    fn folder_expands_recursively_without_subfolders() {
        let ids = resolve(&catalog(), &["Assets/UI"]);

        assert_eq!(strs(&ids), vec!["x", "y"]);
    }

    #[test]
    fn direct_selection_keeps_duplicates() {
        let ids = resolve(&catalog(), &["Assets/Z.prefab", "Assets/Z.prefab"]);

        assert_eq!(strs(&ids), vec!["z", "z"]);
    }

    #[test]
    fn folder_skips_assets_already_selected() {
        let ids = resolve(&catalog(), &["Assets/UI/Hud.prefab", "Assets/UI"]);

        assert_eq!(strs(&ids), vec!["x", "y"]);
    }

    #[test]
    fn direct_selection_after_folder_is_not_deduplicated() {
        let ids = resolve(&catalog(), &["Assets/UI", "Assets/UI/Hud.prefab"]);

        assert_eq!(strs(&ids), vec!["x", "y", "x"]);
    }

    #[test]
    fn overlapping_folders_deduplicate() {
        let ids = resolve(&catalog(), &["Assets/UI/Icons", "Assets/UI"]);

        assert_eq!(strs(&ids), vec!["y", "x"]);
    }

    #[test]
    fn unknown_paths_are_skipped() {
        let ids = resolve(&catalog(), &["Assets/Missing.prefab", "Assets/Z.prefab"]);

        assert_eq!(strs(&ids), vec!["z"]);
    }

    #[test]
    fn empty_selection_yields_no_roots() {
        let ids = resolve::<_, &str>(&catalog(), &[]);

        assert!(ids.is_empty());
    }
}
