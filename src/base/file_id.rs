//! Identifiers for compiled IDL files.

use std::fmt;

/// A handle for one IDL file known to a [`ScopeCache`](crate::scope::ScopeCache).
///
/// Every file gets exactly one `FileId`, the first time it is compiled either
/// as a root or through an `include`. Scopes compare homes by `FileId` rather
/// than by path so that two spellings of the same include resolve to a single
/// declaration table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "idl#{}", self.0)
    }
}

impl From<u32> for FileId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}
