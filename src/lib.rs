//! # thriftgen
//!
//! Scope construction for Thrift IDL code generators: name allocation,
//! reference resolution, struct expansion, type-name rendering and
//! unused-import pruning for Go, TypeScript and OpenAPI targets.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! compile → batch driver (rayon, shared cache, buffer pool)
//!   ↓
//! scope   → Scope, ScopeBuilder, expansion, type resolution
//!   ↓
//! target  → per-language naming and type rendering
//!   ↓
//! ast     → parsed IDL input (Thrift, StructLike, Type)
//!   ↓
//! base    → Primitives (FileId, Namespace, naming)
//! ```

// ============================================================================
// FOUNDATION
// ============================================================================

/// Foundation types: FileId, Namespace, identifier casing
pub mod base;

/// Error types shared by every stage
pub mod error;

/// Generator options
pub mod config;

// ============================================================================
// INPUT & TARGETS
// ============================================================================

/// Parsed IDL input
pub mod ast;

/// Language targets
pub mod target;

// ============================================================================
// SCOPES
// ============================================================================

pub mod scope;

pub mod compile;
pub mod pool;

pub use base::{FileId, Namespace};
pub use compile::{Built, Compiler, FileOutput};
pub use config::{Features, Language, PropertyNaming};
pub use error::{BuildError, ConfigError, GenerateError, ResolveError};
pub use scope::{Scope, ScopeBuilder, ScopeCache};
pub use target::Target;
