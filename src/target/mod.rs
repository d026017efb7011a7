//! Target-language seam.
//!
//! Everything the scope builder needs to know about the output language goes
//! through [`Target`]: how base types are spelled, container syntax, how a
//! qualified name looks, how optional fields are wrapped, zero values,
//! literals, and how an IDL file maps to a package.

mod go;
mod openapi;
mod typescript;

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::ast::{Category, Thrift};
use crate::config::Language;

pub use go::Go;
pub use openapi::OpenApi;
pub use typescript::TypeScript;

/// Where a compiled IDL file lands in the output language.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Package {
    /// The declared namespace, or the file stem when none is declared.
    pub namespace: SmolStr,
    /// Import path of this package from the output root.
    pub import_path: SmolStr,
    /// Preferred import alias.
    pub alias: SmolStr,
}

/// Output language rules used while building and resolving a scope.
pub trait Target: fmt::Debug + Send + Sync {
    fn language(&self) -> Language;

    /// Map a file to its output package.
    fn package(&self, ast: &Thrift, prefix: &str) -> Package;

    /// Import path of `to` as written in a file of package `from`.
    fn import_path(&self, from: &Package, to: &Package) -> SmolStr {
        let _ = from;
        to.import_path.clone()
    }

    /// Spelling of a base category (`bool` .. `binary`).
    fn primitive(&self, category: Category) -> &'static str;

    fn list(&self, elem: &str) -> String;

    fn set(&self, elem: &str) -> String;

    fn map(&self, key: &str, value: &str) -> String;

    /// A declared type, optionally qualified by an import alias. `underlying`
    /// is the category after following typedefs.
    fn named(&self, qualifier: Option<&str>, name: &str, underlying: Category) -> String;

    /// Wrap a type for use as a structure field.
    fn field_type(&self, text: &str, underlying: Category, optional: bool) -> String {
        let _ = (underlying, optional);
        text.to_string()
    }

    /// Adjust a type for use as the right-hand side of a typedef.
    fn alias_type(&self, text: &str) -> String {
        text.to_string()
    }

    /// Value of a field with no declared default.
    fn zero_value(&self, underlying: Category, type_text: &str) -> String;

    fn int_literal(&self, value: i64, type_text: &str) -> String {
        let _ = type_text;
        value.to_string()
    }

    fn double_literal(&self, value: f64) -> String {
        let text = value.to_string();
        if text.contains(['.', 'e', 'E']) || !value.is_finite() {
            text
        } else {
            format!("{text}.0")
        }
    }

    fn string_literal(&self, value: &str) -> String {
        quote(value)
    }

    fn bool_literal(&self, value: bool) -> String {
        value.to_string()
    }

    fn list_literal(&self, type_text: &str, elems: &[String]) -> String;

    fn map_literal(&self, type_text: &str, pairs: &[(String, String)]) -> String;

    /// Reference to an enum value.
    fn enum_value(&self, qualifier: Option<&str>, enum_name: &str, value_name: &str) -> String;

    /// Reference to a constant.
    fn constant(&self, qualifier: Option<&str>, name: &str) -> String {
        qualify(qualifier, name)
    }

    /// Struct field binding tags, for languages that have them.
    fn binding_tags(&self, wire_name: &str, id: i32, requiredness: &str, omit_empty: bool) -> Option<SmolStr> {
        let _ = (wire_name, id, requiredness, omit_empty);
        None
    }
}

/// The built-in target for `language`.
pub fn for_language(language: Language) -> Arc<dyn Target> {
    match language {
        Language::Go => Arc::new(Go),
        Language::TypeScript => Arc::new(TypeScript),
        Language::OpenApi => Arc::new(OpenApi),
    }
}

pub(crate) fn qualify(qualifier: Option<&str>, name: &str) -> String {
    match qualifier {
        Some(q) => format!("{q}.{name}"),
        None => name.to_string(),
    }
}

/// Double-quoted string literal with C-style escapes.
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Last `.`-separated segment of a namespace, made into an identifier.
pub(crate) fn namespace_alias(namespace: &str) -> SmolStr {
    let last = namespace.rsplit('.').next().unwrap_or(namespace);
    let cleaned: String = last
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        SmolStr::new_inline("_")
    } else {
        cleaned.to_lowercase().into()
    }
}

fn join_path(prefix: &str, path: &str) -> SmolStr {
    if prefix.is_empty() {
        path.into()
    } else {
        format!("{prefix}/{path}").into()
    }
}
