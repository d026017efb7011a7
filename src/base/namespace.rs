//! Collision-free identifier allocation.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

use crate::error::NameConflict;

/// One naming namespace: a file's globals, a structure's members, an enum's
/// values or a function's parameters.
///
/// Names are handed out against a *logical key* (usually the IDL source name,
/// or a `$`-prefixed synthetic key such as `$get:user`). Asking again with the
/// same key yields the same allocation. Distinct keys never share a name;
/// conflicts are resolved by appending `_` until the candidate is free.
#[derive(Clone, Default)]
pub struct Namespace {
    /// allocated name → logical key
    by_name: FxHashMap<SmolStr, SmolStr>,
    /// logical key → allocated name
    by_key: FxHashMap<SmolStr, SmolStr>,
    /// allocation order, for deterministic iteration
    order: Vec<SmolStr>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a name derived from `candidate` for `key`.
    ///
    /// If `key` already owns a name, that name is returned unchanged.
    pub fn add(&mut self, candidate: &str, key: &str) -> SmolStr {
        if let Some(existing) = self.by_key.get(key) {
            return existing.clone();
        }

        let mut name = String::from(candidate);
        while self.by_name.contains_key(name.as_str()) {
            name.push('_');
        }

        let name = SmolStr::new(name);
        let key = SmolStr::new(key);
        self.by_name.insert(name.clone(), key.clone());
        self.by_key.insert(key, name.clone());
        self.order.push(name.clone());
        name
    }

    /// Reserve `name` literally for `key`.
    ///
    /// Reserving the same pair twice is a no-op.
    pub fn must_reserve(&mut self, name: &str, key: &str) -> Result<(), NameConflict> {
        if let Some(owner) = self.by_name.get(name) {
            if owner == key {
                return Ok(());
            }
            return Err(NameConflict {
                name: name.into(),
                key: key.into(),
                owner: owner.clone(),
            });
        }
        if let Some(held) = self.by_key.get(key) {
            return Err(NameConflict {
                name: name.into(),
                key: key.into(),
                owner: held.clone(),
            });
        }

        let name = SmolStr::new(name);
        let key = SmolStr::new(key);
        self.by_name.insert(name.clone(), key.clone());
        self.by_key.insert(key, name.clone());
        self.order.push(name);
        Ok(())
    }

    /// The name allocated for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&SmolStr> {
        self.by_key.get(key)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Allocated names in allocation order.
    pub fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("count", &self.order.len())
            .finish()
    }
}
