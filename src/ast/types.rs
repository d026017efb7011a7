//! Type descriptors and constant values.

use smol_str::SmolStr;

use super::Annotations;

/// The category of a type descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "snake_case"))]
pub enum Category {
    Bool,
    Byte,
    I8,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    Map,
    Set,
    List,
    Enum,
    Struct,
    Union,
    Exception,
    Typedef,
    Service,
}

impl Category {
    pub fn is_base(self) -> bool {
        matches!(
            self,
            Category::Bool
                | Category::Byte
                | Category::I8
                | Category::I16
                | Category::I32
                | Category::I64
                | Category::Double
                | Category::String
                | Category::Binary
        )
    }

    pub fn is_container(self) -> bool {
        matches!(self, Category::Map | Category::Set | Category::List)
    }

    pub fn is_struct_like(self) -> bool {
        matches!(self, Category::Struct | Category::Union | Category::Exception)
    }

    /// The IDL spelling of a base or container category.
    pub fn idl_name(self) -> &'static str {
        match self {
            Category::Bool => "bool",
            Category::Byte => "byte",
            Category::I8 => "i8",
            Category::I16 => "i16",
            Category::I32 => "i32",
            Category::I64 => "i64",
            Category::Double => "double",
            Category::String => "string",
            Category::Binary => "binary",
            Category::Map => "map",
            Category::Set => "set",
            Category::List => "list",
            Category::Enum => "enum",
            Category::Struct => "struct",
            Category::Union => "union",
            Category::Exception => "exception",
            Category::Typedef => "typedef",
            Category::Service => "service",
        }
    }
}

/// A resolved link from a type descriptor to a declaration in an included file.
///
/// `index` is the position of the include in the referring file's include
/// list (unused includes count), `name` the declaration's name in that file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Reference {
    pub index: i32,
    pub name: SmolStr,
}

/// A type descriptor as written in the IDL.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
pub struct Type {
    /// `i32`, `list`, `User` or a qualified `base.User`.
    pub name: SmolStr,
    pub category: Category,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub key_type: Option<Box<Type>>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub value_type: Option<Box<Type>>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub reference: Option<Reference>,
    #[cfg_attr(feature = "interchange", serde(default))]
    pub annotations: Annotations,
}

impl Type {
    fn bare(name: SmolStr, category: Category) -> Self {
        Self {
            name,
            category,
            key_type: None,
            value_type: None,
            reference: None,
            annotations: Annotations::default(),
        }
    }

    /// A base type such as `i32` or `string`.
    pub fn base(category: Category) -> Self {
        Self::bare(category.idl_name().into(), category)
    }

    pub fn list(elem: Type) -> Self {
        Self {
            value_type: Some(Box::new(elem)),
            ..Self::bare("list".into(), Category::List)
        }
    }

    pub fn set(elem: Type) -> Self {
        Self {
            value_type: Some(Box::new(elem)),
            ..Self::bare("set".into(), Category::Set)
        }
    }

    pub fn map(key: Type, value: Type) -> Self {
        Self {
            key_type: Some(Box::new(key)),
            value_type: Some(Box::new(value)),
            ..Self::bare("map".into(), Category::Map)
        }
    }

    /// A reference to a declared type, e.g. `Type::named("base.User", Category::Struct)`.
    pub fn named(name: &str, category: Category) -> Self {
        Self::bare(name.into(), category)
    }

    pub fn with_reference(mut self, index: i32, name: &str) -> Self {
        self.reference = Some(Reference {
            index,
            name: name.into(),
        });
        self
    }

    /// Split `base.User` into `(Some("base"), "User")`.
    pub fn split_name(&self) -> (Option<&str>, &str) {
        split_qualified(&self.name)
    }
}

/// Split a possibly qualified name at its last `.`.
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('.') {
        Some((qualifier, bare)) => (Some(qualifier), bare),
        None => (None, name),
    }
}

/// A constant value: a field default or the value of a `const`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "interchange", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "snake_case"))]
pub enum ConstValue {
    Int(i64),
    Double(f64),
    Literal(SmolStr),
    /// A reference to an enum value (`Color.RED`) or constant (`MAX`),
    /// optionally qualified by an include (`base.Color.RED`).
    Identifier(SmolStr),
    List(Vec<ConstValue>),
    Map(Vec<(ConstValue, ConstValue)>),
}
