use crate::catalog::parse_catalog;
use crate::error::{IndexerError, Result};
use crate::scanner::DEFAULT_EXCLUDED_DIRS;
use chrono::Utc;
use janitor_protocol::{AssetRecord, CatalogIndex, CATALOG_SUFFIX};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Builds a [`CatalogIndex`] from every `.xcassets` directory under a project root.
pub struct CatalogIndexer {
    exclude_dirs: Vec<String>,
}

impl CatalogIndexer {
    pub fn new() -> Self {
        Self::with_excluded_dirs(DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()))
    }

    /// Directory names that are never searched for catalogs (vendored pods,
    /// build output). Their assets belong to code the usage scan never sees.
    pub fn with_excluded_dirs(dirs: impl IntoIterator<Item = String>) -> Self {
        Self {
            exclude_dirs: dirs.into_iter().collect(),
        }
    }

    /// Index every catalog under `project_path`.
    ///
    /// A project with no catalogs yields an empty index. A catalog that cannot
    /// be read is still listed but contributes no assets.
    pub fn index_project(&self, project_path: &str) -> Result<CatalogIndex> {
        let root = Path::new(project_path);
        if !root.exists() {
            return Err(IndexerError::ProjectNotFound(project_path.to_string()));
        }
        let root = root.canonicalize()?;

        let start = Instant::now();
        log::info!("Indexing asset catalogs under {}", root.display());

        let catalogs = self.find_catalogs(&root);
        let mut assets: Vec<AssetRecord> = Vec::new();
        for catalog in &catalogs {
            match parse_catalog(catalog) {
                Ok(parsed) => {
                    log::debug!("{}: {} assets", catalog.display(), parsed.len());
                    assets.extend(parsed);
                }
                Err(err) => log::warn!("Failed to parse catalog {}: {err}", catalog.display()),
            }
        }

        log::info!(
            "Indexed {} assets from {} catalogs in {} ms",
            assets.len(),
            catalogs.len(),
            start.elapsed().as_millis()
        );

        Ok(CatalogIndex {
            catalogs,
            assets,
            indexed_at: Utc::now(),
            project_path: project_path.to_string(),
        })
    }

    /// Case-insensitive `*` wildcard search over the index; no match is an
    /// empty result, not an error.
    pub fn find_assets<'a>(&self, pattern: &str, index: &'a CatalogIndex) -> Vec<&'a AssetRecord> {
        index.find_matching(pattern)
    }

    fn find_catalogs(&self, root: &Path) -> Vec<PathBuf> {
        let mut catalogs = Vec::new();
        let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Failed to read entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_dir() || entry.depth() == 0 {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if self.exclude_dirs.iter().any(|dir| *dir == name) {
                walker.skip_current_dir();
                continue;
            }
            if name.ends_with(CATALOG_SUFFIX) {
                catalogs.push(entry.path().to_path_buf());
                // Nested catalogs are not a thing; the parser walks the inside.
                walker.skip_current_dir();
            }
        }

        catalogs
    }
}

impl Default for CatalogIndexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use janitor_protocol::AssetKind;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn image_set(catalog: &Path, name: &str) {
        let dir = catalog.join(format!("{name}.imageset"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("Contents.json"),
            r#"{"images":[{"filename":"test.png","idiom":"universal","scale":"1x"}]}"#,
        )
        .unwrap();
    }

    fn index(root: &Path) -> CatalogIndex {
        CatalogIndexer::new()
            .index_project(root.to_str().unwrap())
            .unwrap()
    }

    #[test]
    fn empty_project_has_empty_index() {
        let temp = tempdir().unwrap();
        let index = index(temp.path());

        assert!(index.catalogs.is_empty());
        assert!(index.assets.is_empty());
        assert_eq!(index.project_path, temp.path().to_str().unwrap());
    }

    #[test]
    fn missing_project_is_reported() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing");
        let err = CatalogIndexer::new()
            .index_project(missing.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, IndexerError::ProjectNotFound(_)));
    }

    #[test]
    fn catalogs_are_found_at_any_depth() {
        let temp = tempdir().unwrap();
        let app = temp.path().join("App").join("Resources").join("Assets.xcassets");
        image_set(&app, "TestImage");
        let widget = temp.path().join("Widget").join("Media.xcassets");
        image_set(&widget, "TestImage");

        let index = index(temp.path());
        assert_eq!(index.catalogs.len(), 2);
        assert_eq!(index.assets.len(), 2);
        assert!(index.assets.iter().all(|a| a.name == "TestImage"));
        assert!(index.assets.iter().all(|a| a.kind == AssetKind::ImageSet));
        assert_ne!(index.assets[0].catalog_path, index.assets[1].catalog_path);
    }

    #[test]
    fn vendored_catalogs_are_skipped() {
        let temp = tempdir().unwrap();
        image_set(&temp.path().join("Pods/SomeKit/Assets.xcassets"), "vendor");
        image_set(&temp.path().join("Assets.xcassets"), "mine");

        let index = index(temp.path());
        let names: Vec<_> = index.assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["mine"]);
    }

    #[test]
    fn wildcard_search_filters_names() {
        let temp = tempdir().unwrap();
        let catalog = temp.path().join("Assets.xcassets");
        for name in ["AppIcon", "LaunchImage", "TestImage"] {
            image_set(&catalog, name);
        }
        let index = index(temp.path());

        let indexer = CatalogIndexer::new();
        let mut names: Vec<_> = indexer
            .find_assets("*Image", &index)
            .into_iter()
            .map(|a| a.name.clone())
            .collect();
        names.sort();
        assert_eq!(names, vec!["LaunchImage", "TestImage"]);
        assert!(indexer.find_assets("nothing*", &index).is_empty());
    }
}
