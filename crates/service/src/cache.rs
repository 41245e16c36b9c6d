use janitor_protocol::CatalogIndex;
use std::sync::Arc;

/// The most recent catalog index and the project path it was built for.
///
/// Lookups compare the path string exactly; `./App` and `App` are different
/// keys.
#[derive(Debug, Default)]
pub struct IndexCache {
    entry: Option<(String, Arc<CatalogIndex>)>,
}

impl IndexCache {
    pub fn get(&self, project_path: &str) -> Option<Arc<CatalogIndex>> {
        match &self.entry {
            Some((path, index)) if path == project_path => Some(Arc::clone(index)),
            _ => None,
        }
    }

    /// Replace whatever was cached.
    pub fn store(&mut self, project_path: &str, index: CatalogIndex) -> Arc<CatalogIndex> {
        let index = Arc::new(index);
        self.entry = Some((project_path.to_string(), Arc::clone(&index)));
        index
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn cached_path(&self) -> Option<&str> {
        self.entry.as_ref().map(|(path, _)| path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn index(project_path: &str) -> CatalogIndex {
        CatalogIndex {
            catalogs: Vec::new(),
            assets: Vec::new(),
            indexed_at: Utc::now(),
            project_path: project_path.to_string(),
        }
    }

    #[test]
    fn hit_requires_exact_path() {
        let mut cache = IndexCache::default();
        assert!(cache.get("/a").is_none());

        cache.store("/a", index("/a"));
        assert!(cache.get("/a").is_some());
        assert!(cache.get("/a/").is_none());
        assert!(cache.get("/b").is_none());
    }

    #[test]
    fn store_overwrites_the_single_entry() {
        let mut cache = IndexCache::default();
        cache.store("/a", index("/a"));
        cache.store("/b", index("/b"));
        assert_eq!(cache.cached_path(), Some("/b"));
        assert!(cache.get("/a").is_none());

        cache.invalidate();
        assert_eq!(cache.cached_path(), None);
    }
}
