//! Foundation types shared by the scope builder and the targets.
//!
//! - [`FileId`] - handles for compiled IDL files
//! - [`Namespace`] - collision-free identifier allocation
//! - [`naming`] - identifier case conversions
//!
//! This module depends only on [`crate::error`].

mod file_id;
mod namespace;
pub mod naming;

pub use file_id::FileId;
pub use namespace::Namespace;
