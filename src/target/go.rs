use smol_str::SmolStr;

use super::{join_path, namespace_alias, qualify, Package, Target};
use crate::ast::{Category, Thrift};
use crate::config::Language;

/// Go output: `*alias.Type` pointers for structures, `[]T` and `map[K]V`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Go;

/// Optional scalars are generated as pointers so "unset" is representable.
fn needs_pointer(underlying: Category) -> bool {
    (underlying.is_base() && underlying != Category::Binary) || underlying == Category::Enum
}

impl Target for Go {
    fn language(&self) -> Language {
        Language::Go
    }

    fn package(&self, ast: &Thrift, prefix: &str) -> Package {
        let namespace: SmolStr = ast.namespace_for("go").unwrap_or(ast.idl_name()).into();
        Package {
            import_path: join_path(prefix, &namespace.replace('.', "/")),
            alias: namespace_alias(&namespace),
            namespace,
        }
    }

    fn primitive(&self, category: Category) -> &'static str {
        match category {
            Category::Bool => "bool",
            Category::Byte | Category::I8 => "int8",
            Category::I16 => "int16",
            Category::I32 => "int32",
            Category::I64 => "int64",
            Category::Double => "float64",
            Category::String => "string",
            Category::Binary => "[]byte",
            _ => "interface{}",
        }
    }

    fn list(&self, elem: &str) -> String {
        format!("[]{elem}")
    }

    fn set(&self, elem: &str) -> String {
        format!("[]{elem}")
    }

    fn map(&self, key: &str, value: &str) -> String {
        format!("map[{key}]{value}")
    }

    fn named(&self, qualifier: Option<&str>, name: &str, underlying: Category) -> String {
        let text = qualify(qualifier, name);
        if underlying.is_struct_like() {
            format!("*{text}")
        } else {
            text
        }
    }

    fn field_type(&self, text: &str, underlying: Category, optional: bool) -> String {
        if optional && needs_pointer(underlying) && !text.starts_with('*') {
            format!("*{text}")
        } else {
            text.to_string()
        }
    }

    fn alias_type(&self, text: &str) -> String {
        text.trim_start_matches('*').to_string()
    }

    fn zero_value(&self, underlying: Category, type_text: &str) -> String {
        match underlying {
            Category::Bool => "false".into(),
            Category::Byte
            | Category::I8
            | Category::I16
            | Category::I32
            | Category::I64
            | Category::Double => "0".into(),
            Category::String => "\"\"".into(),
            Category::Enum => format!("{type_text}(0)"),
            _ => "nil".into(),
        }
    }

    fn int_literal(&self, value: i64, type_text: &str) -> String {
        match type_text {
            "int8" | "int16" | "int32" | "int64" | "" => value.to_string(),
            other => format!("{other}({value})"),
        }
    }

    fn list_literal(&self, type_text: &str, elems: &[String]) -> String {
        format!("{}{{{}}}", type_text.trim_start_matches('*'), elems.join(", "))
    }

    fn map_literal(&self, type_text: &str, pairs: &[(String, String)]) -> String {
        let body: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        format!("{}{{{}}}", type_text.trim_start_matches('*'), body.join(", "))
    }

    fn enum_value(&self, qualifier: Option<&str>, _enum_name: &str, value_name: &str) -> String {
        qualify(qualifier, value_name)
    }

    fn binding_tags(&self, wire_name: &str, id: i32, requiredness: &str, omit_empty: bool) -> Option<SmolStr> {
        let thrift = match requiredness {
            "" => format!("{wire_name},{id}"),
            r => format!("{wire_name},{id},{r}"),
        };
        let json = if omit_empty {
            format!("{wire_name},omitempty")
        } else {
            wire_name.to_string()
        };
        Some(format!("thrift:\"{thrift}\" json:\"{json}\"").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_from_namespace() {
        let ast = Thrift::new("idl/base.thrift").with_namespace("go", "example.base");
        let pkg = Go.package(&ast, "github.com/acme/gen");
        assert_eq!(pkg.namespace, "example.base");
        assert_eq!(pkg.import_path, "github.com/acme/gen/example/base");
        assert_eq!(pkg.alias, "base");
    }

    #[test]
    fn test_package_without_namespace_uses_stem() {
        let pkg = Go.package(&Thrift::new("user.thrift"), "");
        assert_eq!(pkg.namespace, "user");
        assert_eq!(pkg.import_path, "user");
    }

    #[test]
    fn test_named_pointer_rules() {
        assert_eq!(Go.named(Some("base"), "User", Category::Struct), "*base.User");
        assert_eq!(Go.named(None, "Color", Category::Enum), "Color");
        assert_eq!(Go.field_type("Color", Category::Enum, true), "*Color");
        assert_eq!(Go.field_type("[]byte", Category::Binary, true), "[]byte");
        assert_eq!(Go.field_type("*base.User", Category::Struct, true), "*base.User");
        assert_eq!(Go.alias_type("*base.User"), "base.User");
    }

    #[test]
    fn test_binding_tags() {
        let tags = Go.binding_tags("user_id", 1, "required", false).unwrap();
        assert_eq!(tags, r#"thrift:"user_id,1,required" json:"user_id""#);
        let tags = Go.binding_tags("note", 2, "optional", true).unwrap();
        assert_eq!(tags, r#"thrift:"note,2,optional" json:"note,omitempty""#);
    }

    #[test]
    fn test_literals() {
        assert_eq!(Go.int_literal(3, "int32"), "3");
        assert_eq!(Go.int_literal(3, "Color"), "Color(3)");
        assert_eq!(
            Go.list_literal("[]int32", &["1".into(), "2".into()]),
            "[]int32{1, 2}"
        );
        assert_eq!(Go.zero_value(Category::Enum, "base.Color"), "base.Color(0)");
    }
}
