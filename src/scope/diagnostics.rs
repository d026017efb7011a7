//! Diagnostics: soft warnings raised while building a scope.
//!
//! Hard failures are [`BuildError`](crate::error::BuildError)s. Everything
//! recorded here is a problem in the input that the builder worked around:
//! the offending input is ignored or defaulted and generation continues.

use std::sync::Arc;

use smol_str::SmolStr;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Info,
}

/// A diagnostic about one IDL file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The IDL file the diagnostic is about (empty for run-wide diagnostics).
    pub file: SmolStr,
    pub severity: Severity,
    /// Warning code (e.g., "W0001").
    pub code: Option<Arc<str>>,
    /// The declaration the diagnostic is attached to, if any.
    pub owner: Option<SmolStr>,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn warning(file: impl Into<SmolStr>, message: impl Into<Arc<str>>) -> Self {
        Self {
            file: file.into(),
            severity: Severity::Warning,
            code: None,
            owner: None,
            message: message.into(),
        }
    }

    pub fn info(file: impl Into<SmolStr>, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Info,
            ..Self::warning(file, message)
        }
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<SmolStr>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

pub mod codes {
    /// An annotation expected to carry one value carries several.
    pub const MULTIPLE_ANNOTATION_VALUES: &str = "W0001";
    /// A structure declares a category other than struct/union/exception.
    pub const UNKNOWN_CATEGORY: &str = "W0002";
    /// A generator option was not recognized.
    pub const UNKNOWN_OPTION: &str = "W0003";
    /// Field reordering changed the layout of a structure.
    pub const FIELDS_REORDERED: &str = "I0001";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics while a scope is built, logging each one as it lands.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(
                file = %diagnostic.file,
                code = diagnostic.code.as_deref().unwrap_or(""),
                "{}",
                diagnostic.message
            ),
            Severity::Info => tracing::info!(
                file = %diagnostic.file,
                code = diagnostic.code.as_deref().unwrap_or(""),
                "{}",
                diagnostic.message
            ),
        }
        self.diagnostics.push(diagnostic);
    }

    /// Record an annotation that carries several values where one is expected.
    pub fn multiple_values(&mut self, file: &str, owner: &str, key: &str, count: usize) {
        self.add(
            Diagnostic::warning(
                file,
                format!("annotation '{key}' on '{owner}' has {count} values; ignoring it"),
            )
            .with_code(codes::MULTIPLE_ANNOTATION_VALUES)
            .with_owner(owner),
        );
    }

    /// Record a structure whose category is not struct, union or exception.
    pub fn unknown_category(&mut self, file: &str, owner: &str, category: &str) {
        self.add(
            Diagnostic::warning(
                file,
                format!("structure '{owner}' has unknown category '{category}'"),
            )
            .with_code(codes::UNKNOWN_CATEGORY)
            .with_owner(owner),
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builders() {
        let diag = Diagnostic::warning("a.thrift", "something odd")
            .with_code(codes::UNKNOWN_CATEGORY)
            .with_owner("User");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.code.as_deref(), Some("W0002"));
        assert_eq!(diag.owner.as_deref(), Some("User"));
    }

    #[test]
    fn test_collector_counts_and_take() {
        let mut collector = DiagnosticCollector::new();
        collector.multiple_values("a.thrift", "User.base", "thrift.expand", 2);
        collector.unknown_category("a.thrift", "Thing", "record");
        collector.add(Diagnostic::info("a.thrift", "reordered"));

        assert_eq!(collector.warning_count(), 2);
        assert_eq!(collector.diagnostics().len(), 3);

        let taken = collector.take();
        assert_eq!(taken.len(), 3);
        assert!(collector.diagnostics().is_empty());
        assert!(taken[0].message.contains("thrift.expand"));
    }
}
