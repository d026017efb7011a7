use smol_str::SmolStr;

use super::{join_path, namespace_alias, qualify, Package, Target};
use crate::ast::{Category, Thrift};
use crate::config::Language;

/// TypeScript interfaces.
#[derive(Clone, Copy, Debug, Default)]
pub struct TypeScript;

impl Target for TypeScript {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn package(&self, ast: &Thrift, prefix: &str) -> Package {
        let namespace = ast
            .namespace_for("ts")
            .or_else(|| ast.namespace_for("typescript"))
            .unwrap_or(ast.idl_name());
        let path = namespace.replace('.', "/");
        let import_path = if prefix.is_empty() {
            format!("./{path}").into()
        } else {
            join_path(prefix, &path)
        };
        Package {
            namespace: namespace.into(),
            import_path,
            alias: namespace_alias(namespace),
        }
    }

    /// Module paths are relative to the importing file. Prefixed packages
    /// are absolute and used as they are.
    fn import_path(&self, from: &Package, to: &Package) -> SmolStr {
        if !to.import_path.starts_with("./") {
            return to.import_path.clone();
        }
        relative_module_path(&from.namespace, &to.namespace).into()
    }

    fn primitive(&self, category: Category) -> &'static str {
        match category {
            Category::Bool => "boolean",
            Category::Byte
            | Category::I8
            | Category::I16
            | Category::I32
            | Category::I64
            | Category::Double => "number",
            Category::String => "string",
            Category::Binary => "Uint8Array",
            _ => "any",
        }
    }

    fn list(&self, elem: &str) -> String {
        format!("Array<{elem}>")
    }

    fn set(&self, elem: &str) -> String {
        format!("Set<{elem}>")
    }

    fn map(&self, key: &str, value: &str) -> String {
        format!("{{ [key: {key}]: {value} }}")
    }

    fn named(&self, qualifier: Option<&str>, name: &str, _underlying: Category) -> String {
        qualify(qualifier, name)
    }

    fn field_type(&self, text: &str, _underlying: Category, optional: bool) -> String {
        if optional {
            format!("{text} | undefined")
        } else {
            text.to_string()
        }
    }

    fn zero_value(&self, underlying: Category, _type_text: &str) -> String {
        match underlying {
            Category::Bool => "false",
            Category::Byte
            | Category::I8
            | Category::I16
            | Category::I32
            | Category::I64
            | Category::Double
            | Category::Enum => "0",
            Category::String => "\"\"",
            Category::Binary => "new Uint8Array()",
            Category::List => "[]",
            Category::Set => "new Set()",
            Category::Map => "{}",
            _ => "null",
        }
        .to_string()
    }

    fn list_literal(&self, type_text: &str, elems: &[String]) -> String {
        if type_text.starts_with("Set<") {
            format!("new Set([{}])", elems.join(", "))
        } else {
            format!("[{}]", elems.join(", "))
        }
    }

    fn map_literal(&self, _type_text: &str, pairs: &[(String, String)]) -> String {
        let body: Vec<String> = pairs.iter().map(|(k, v)| format!("[{k}]: {v}")).collect();
        format!("{{ {} }}", body.join(", "))
    }

    fn enum_value(&self, qualifier: Option<&str>, enum_name: &str, value_name: &str) -> String {
        let member = value_name
            .strip_prefix(enum_name)
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(value_name);
        format!("{}.{member}", qualify(qualifier, enum_name))
    }
}

/// Path from the module of namespace `from` to the module of namespace `to`:
/// `../<last>` between siblings, otherwise one `..` per segment of `from`.
fn relative_module_path(from: &str, to: &str) -> String {
    let target: Vec<&str> = to.split('.').collect();
    if from.is_empty() {
        return format!("./{}", target.join("/"));
    }
    let current: Vec<&str> = from.split('.').collect();
    if let (Some((_, current_parent)), Some((last, target_parent))) = (current.split_last(), target.split_last()) {
        if !current_parent.is_empty() && current_parent == target_parent {
            return format!("../{last}");
        }
    }
    let mut parts = vec![".."; current.len()];
    parts.extend(target);
    parts.join("/")
}
