//! The parsed IDL tree.
//!
//! These types are the input of the scope builder. They are plain owned data,
//! produced by an external parser and never mutated here. With the
//! `interchange` feature they can be read from JSON or YAML.

mod annotations;
#[cfg(feature = "interchange")]
pub mod interchange;
mod types;

use std::sync::Arc;

use smol_str::SmolStr;

pub use annotations::{Annotation, Annotations};
pub use types::{split_qualified, Category, ConstValue, Reference, Type};

// ============================================================================
// FIELDS & STRUCTURES
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "snake_case"))]
pub enum Requiredness {
    #[default]
    Default,
    Required,
    Optional,
}

/// A field of a struct, union, exception, or a function argument or throw.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub id: i32,
    pub name: SmolStr,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub requiredness: Requiredness,
    #[cfg_attr(feature = "interchange", serde(rename = "type"))]
    pub field_type: Type,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub default: Option<ConstValue>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Annotations,
}

impl Field {
    pub fn new(id: i32, name: &str, field_type: Type) -> Self {
        Self {
            id,
            name: name.into(),
            requiredness: Requiredness::Default,
            field_type,
            default: None,
            annotations: Annotations::default(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.requiredness = Requiredness::Optional;
        self
    }

    pub fn required(mut self) -> Self {
        self.requiredness = Requiredness::Required;
        self
    }

    pub fn with_default(mut self, value: ConstValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
        self.annotations.push(key, value);
        self
    }
}

/// A struct, union or exception.
///
/// `category` is kept as the parser spelled it, so that unknown categories can
/// be reported instead of rejected.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct StructLike {
    pub category: SmolStr,
    pub name: SmolStr,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub fields: Vec<Field>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Annotations,
    /// Explicit expandable flag; when absent the `expandable` annotation decides.
    #[cfg_attr(feature = "interchange", serde(default))]
    pub expandable: Option<bool>,
}

impl StructLike {
    pub fn new(category: &str, name: &str) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            fields: Vec::new(),
            annotations: Annotations::default(),
            expandable: None,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
        self.annotations.push(key, value);
        self
    }

    pub fn expandable(mut self, flag: bool) -> Self {
        self.expandable = Some(flag);
        self
    }
}

// ============================================================================
// OTHER DECLARATIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumValue {
    pub name: SmolStr,
    pub value: i64,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Annotations,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Enum {
    pub name: SmolStr,
    pub values: Vec<EnumValue>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Annotations,
}

impl Enum {
    pub fn new(name: &str, values: &[(&str, i64)]) -> Self {
        Self {
            name: name.into(),
            values: values
                .iter()
                .map(|&(name, value)| EnumValue {
                    name: name.into(),
                    value,
                    annotations: Annotations::default(),
                })
                .collect(),
            annotations: Annotations::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Typedef {
    pub alias: SmolStr,
    #[cfg_attr(feature = "interchange", serde(rename = "type"))]
    pub target: Type,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Annotations,
}

impl Typedef {
    pub fn new(alias: &str, target: Type) -> Self {
        Self {
            alias: alias.into(),
            target,
            annotations: Annotations::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Constant {
    pub name: SmolStr,
    #[cfg_attr(feature = "interchange", serde(rename = "type"))]
    pub const_type: Type,
    pub value: ConstValue,
}

impl Constant {
    pub fn new(name: &str, const_type: Type, value: ConstValue) -> Self {
        Self {
            name: name.into(),
            const_type,
            value,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: SmolStr,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub oneway: bool,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub void: bool,
    pub function_type: Type,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub arguments: Vec<Field>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub throws: Vec<Field>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Annotations,
}

impl Function {
    pub fn new(name: &str, function_type: Type) -> Self {
        Self {
            name: name.into(),
            oneway: false,
            void: false,
            function_type,
            arguments: Vec::new(),
            throws: Vec::new(),
            annotations: Annotations::default(),
        }
    }

    /// A `void` function.
    pub fn void(name: &str) -> Self {
        Self {
            void: true,
            ..Self::new(name, Type::named("void", Category::Struct))
        }
    }

    pub fn oneway(mut self) -> Self {
        self.oneway = true;
        self
    }

    pub fn with_argument(mut self, field: Field) -> Self {
        self.arguments.push(field);
        self
    }

    pub fn with_throw(mut self, field: Field) -> Self {
        self.throws.push(field);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Service {
    pub name: SmolStr,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub extends: Option<SmolStr>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub extends_reference: Option<Reference>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub functions: Vec<Function>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Annotations,
}

impl Service {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            extends: None,
            extends_reference: None,
            functions: Vec::new(),
            annotations: Annotations::default(),
        }
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    pub fn extending(mut self, base: &str) -> Self {
        self.extends = Some(base.into());
        self
    }
}

/// `namespace <language> <name>`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Namespace {
    pub language: SmolStr,
    pub name: SmolStr,
}

/// `include "<path>"`, with the already-parsed included tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Include {
    pub path: SmolStr,
    /// Whether the parser saw a reference to this include.
    #[cfg_attr(feature = "interchange", serde(default = "used_by_default"))]
    pub used: bool,
    pub reference: Arc<Thrift>,
}

#[cfg(feature = "interchange")]
fn used_by_default() -> bool {
    true
}

impl Include {
    pub fn new(path: &str, reference: Arc<Thrift>) -> Self {
        Self {
            path: path.into(),
            used: true,
            reference,
        }
    }
}

// ============================================================================
// FILE
// ============================================================================

/// One parsed IDL file.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(default))]
pub struct Thrift {
    pub filename: SmolStr,
    pub includes: Vec<Include>,
    pub namespaces: Vec<Namespace>,
    pub typedefs: Vec<Typedef>,
    pub constants: Vec<Constant>,
    pub enums: Vec<Enum>,
    pub structs: Vec<StructLike>,
    pub unions: Vec<StructLike>,
    pub exceptions: Vec<StructLike>,
    pub services: Vec<Service>,
}

impl Thrift {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Structs, unions and exceptions in that order.
    pub fn struct_likes(&self) -> impl Iterator<Item = &StructLike> {
        self.structs
            .iter()
            .chain(self.unions.iter())
            .chain(self.exceptions.iter())
    }

    /// The namespace declared for `language`, falling back to `*`.
    pub fn namespace_for(&self, language: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|ns| ns.language == language)
            .or_else(|| self.namespaces.iter().find(|ns| ns.language == "*"))
            .map(|ns| ns.name.as_str())
    }

    /// The file stem, used as the IDL-side qualifier of this file (`base` for
    /// `idl/base.thrift`).
    pub fn idl_name(&self) -> &str {
        let base = self
            .filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filename);
        base.strip_suffix(".thrift").unwrap_or(base)
    }

    pub fn with_namespace(mut self, language: &str, name: &str) -> Self {
        self.namespaces.push(Namespace {
            language: language.into(),
            name: name.into(),
        });
        self
    }

    pub fn with_include(mut self, path: &str, reference: Arc<Thrift>) -> Self {
        self.includes.push(Include::new(path, reference));
        self
    }

    /// Add a structure to the list its category names. Unknown categories go
    /// to `structs` so the builder can report them.
    pub fn with_struct(mut self, structure: StructLike) -> Self {
        match structure.category.as_str() {
            "union" => self.unions.push(structure),
            "exception" => self.exceptions.push(structure),
            _ => self.structs.push(structure),
        }
        self
    }

    pub fn with_enum(mut self, enumeration: Enum) -> Self {
        self.enums.push(enumeration);
        self
    }

    pub fn with_typedef(mut self, typedef: Typedef) -> Self {
        self.typedefs.push(typedef);
        self
    }

    pub fn with_constant(mut self, constant: Constant) -> Self {
        self.constants.push(constant);
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idl_name_strips_dir_and_extension() {
        assert_eq!(Thrift::new("idl/base.thrift").idl_name(), "base");
        assert_eq!(Thrift::new("user.thrift").idl_name(), "user");
        assert_eq!(Thrift::new("plain").idl_name(), "plain");
    }

    #[test]
    fn test_namespace_for_falls_back_to_star() {
        let t = Thrift::new("a.thrift")
            .with_namespace("*", "all")
            .with_namespace("go", "example.a");
        assert_eq!(t.namespace_for("go"), Some("example.a"));
        assert_eq!(t.namespace_for("ts"), Some("all"));
        assert_eq!(Thrift::new("b.thrift").namespace_for("go"), None);
    }

    #[test]
    fn test_with_struct_sorts_by_category() {
        let t = Thrift::new("a.thrift")
            .with_struct(StructLike::new("struct", "S"))
            .with_struct(StructLike::new("union", "U"))
            .with_struct(StructLike::new("exception", "E"));
        let names: Vec<_> = t.struct_likes().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["S", "U", "E"]);
    }
}
