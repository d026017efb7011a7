//! Import aliases of one generated file.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::Namespace;

/// One import of a generated file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub alias: SmolStr,
    pub path: SmolStr,
    pub used: bool,
}

/// Allocates collision-free aliases per import path and tracks which imports
/// are still referenced.
#[derive(Clone, Debug, Default)]
pub struct ImportManager {
    /// import path → import, in registration order
    entries: IndexMap<SmolStr, Import>,
    aliases: Namespace,
}

impl ImportManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` under an alias derived from `preferred`; the import
    /// starts out used. Registering a path twice returns its first alias.
    pub fn add(&mut self, preferred: &str, path: &str) -> SmolStr {
        if let Some(existing) = self.entries.get_mut(path) {
            existing.used = true;
            return existing.alias.clone();
        }
        let alias = self.aliases.add(preferred, path);
        self.entries.insert(
            path.into(),
            Import {
                alias: alias.clone(),
                path: path.into(),
                used: true,
            },
        );
        alias
    }

    pub fn alias(&self, path: &str) -> Option<&SmolStr> {
        self.entries.get(path).map(|i| &i.alias)
    }

    pub fn is_used(&self, path: &str) -> bool {
        self.entries.get(path).is_some_and(|i| i.used)
    }

    pub fn mark_used(&mut self, path: &str) {
        if let Some(import) = self.entries.get_mut(path) {
            import.used = true;
        }
    }

    pub fn mark_unused(&mut self, path: &str) {
        if let Some(import) = self.entries.get_mut(path) {
            import.used = false;
        }
    }

    pub fn used(&self) -> impl Iterator<Item = &Import> {
        self.entries.values().filter(|i| i.used)
    }

    pub fn unused(&self) -> impl Iterator<Item = &Import> {
        self.entries.values().filter(|i| !i.used)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
