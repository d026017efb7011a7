use super::{quote, Package, Target};
use crate::ast::{Category, Thrift};
use crate::config::Language;

/// OpenAPI schema references.
///
/// Type text is a compact schema descriptor: `integer:int32`, `array<string>`,
/// `#/components/schemas/User` or `base.yaml#/components/schemas/User`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenApi;

impl Target for OpenApi {
    fn language(&self) -> Language {
        Language::OpenApi
    }

    fn package(&self, ast: &Thrift, _prefix: &str) -> Package {
        let stem = ast.idl_name();
        Package {
            namespace: stem.into(),
            import_path: format!("{stem}.yaml").into(),
            alias: stem.into(),
        }
    }

    fn primitive(&self, category: Category) -> &'static str {
        match category {
            Category::Bool => "boolean",
            Category::Byte | Category::I8 | Category::I16 | Category::I32 => "integer:int32",
            Category::I64 => "integer:int64",
            Category::Double => "number:double",
            Category::String => "string",
            Category::Binary => "string:binary",
            _ => "object",
        }
    }

    fn list(&self, elem: &str) -> String {
        format!("array<{elem}>")
    }

    fn set(&self, elem: &str) -> String {
        format!("array<{elem}>")
    }

    fn map(&self, _key: &str, value: &str) -> String {
        format!("object<{value}>")
    }

    fn named(&self, qualifier: Option<&str>, name: &str, _underlying: Category) -> String {
        match qualifier {
            Some(q) => format!("{q}.yaml#/components/schemas/{name}"),
            None => format!("#/components/schemas/{name}"),
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
            Category::String | Category::Binary => "\"\"",
            Category::List | Category::Set => "[]",
            Category::Map => "{}",
            _ => "null",
        }
        .to_string()
    }

    fn list_literal(&self, _type_text: &str, elems: &[String]) -> String {
        format!("[{}]", elems.join(", "))
    }

    fn map_literal(&self, _type_text: &str, pairs: &[(String, String)]) -> String {
        let body: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        format!("{{{}}}", body.join(", "))
    }

    /// Enum values appear in documents by their IDL name.
    fn enum_value(&self, _qualifier: Option<&str>, enum_name: &str, value_name: &str) -> String {
        let member = value_name
            .strip_prefix(enum_name)
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(value_name);
        quote(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_refs() {
        assert_eq!(
            OpenApi.named(Some("base"), "User", Category::Struct),
            "base.yaml#/components/schemas/User"
        );
        assert_eq!(OpenApi.named(None, "User", Category::Struct), "#/components/schemas/User");
        assert_eq!(OpenApi.list(OpenApi.primitive(Category::I64)), "array<integer:int64>");
    }

    #[test]
    fn test_package_is_file_stem() {
        let pkg = OpenApi.package(&Thrift::new("idl/user.thrift").with_namespace("go", "x.y"), "ignored");
        assert_eq!(pkg.namespace, "user");
        assert_eq!(pkg.import_path, "user.yaml");
    }

    #[test]
    fn test_enum_value_is_quoted_name() {
        assert_eq!(OpenApi.enum_value(None, "Color", "Color_RED"), "\"RED\"");
    }
}
