//! Built scopes, memoised per IDL file.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use smol_str::SmolStr;

use super::Scope;
use crate::base::FileId;

/// Maps IDL file names to [`FileId`]s and built scopes.
///
/// Shared by every build of a generation run so that a file included from
/// several places is built once. Safe to share between threads.
#[derive(Debug, Default)]
pub struct ScopeCache {
    inner: RwLock<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    /// file name → FileId
    path_to_id: IndexMap<SmolStr, FileId>,
    /// FileId → built scope
    scopes: IndexMap<FileId, Arc<Scope>>,
    next_id: u32,
}

impl ScopeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or assign the FileId of a file name.
    pub fn file_id(&self, path: &str) -> FileId {
        // Fast path: read lock
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.path_to_id.get(path) {
                return id;
            }
        }

        let mut inner = self.inner.write();

        // Double-check
        if let Some(&id) = inner.path_to_id.get(path) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        inner.path_to_id.insert(path.into(), id);
        id
    }

    /// The built scope of a file name, if any.
    pub fn get(&self, path: &str) -> Option<Arc<Scope>> {
        let inner = self.inner.read();
        let id = inner.path_to_id.get(path)?;
        inner.scopes.get(id).cloned()
    }

    /// Store a freshly built scope.
    ///
    /// When another thread stored the same file first, its scope wins and is
    /// returned instead.
    pub fn insert(&self, scope: Scope) -> Arc<Scope> {
        let mut inner = self.inner.write();
        if let Some(existing) = inner.scopes.get(&scope.file()) {
            return Arc::clone(existing);
        }
        let file = scope.file();
        let scope = Arc::new(scope);
        inner.scopes.insert(file, Arc::clone(&scope));
        scope
    }

    /// Number of built scopes.
    pub fn len(&self) -> usize {
        self.inner.read().scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All built scopes, in build order.
    pub fn scopes(&self) -> Vec<Arc<Scope>> {
        self.inner.read().scopes.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Thrift;
    use crate::target::Package;

    fn empty_scope(cache: &ScopeCache, name: &str) -> Scope {
        let package = Package {
            namespace: name.into(),
            import_path: name.into(),
            alias: name.into(),
        };
        Scope::new(cache.file_id(name), Arc::new(Thrift::new(name)), package)
    }

    #[test]
    fn test_file_id_assignment() {
        let cache = ScopeCache::new();

        let id1 = cache.file_id("a.thrift");
        let id2 = cache.file_id("b.thrift");
        let id3 = cache.file_id("a.thrift");

        assert_ne!(id1, id2);
        assert_eq!(id1, id3);
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = ScopeCache::new();
        let first = cache.insert(empty_scope(&cache, "a.thrift"));
        let second = cache.insert(empty_scope(&cache, "a.thrift"));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a.thrift").is_some());
        assert!(cache.get("b.thrift").is_none());
    }
}
