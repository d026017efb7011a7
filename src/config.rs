//! Generator options.
//!
//! Options arrive as `name=value` strings (the form a generator plugin receives
//! them in). A bare `name` means `name=true`. They are parsed once into
//! [`Features`] before any scope is built and never change afterwards.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::scope::diagnostics::{codes, Diagnostic};

/// Output language of a generation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Go,
    TypeScript,
    OpenApi,
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "go" | "golang" => Ok(Language::Go),
            "ts" | "typescript" => Ok(Language::TypeScript),
            "openapi" => Ok(Language::OpenApi),
            other => Err(ConfigError::UnknownLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Go => "go",
            Language::TypeScript => "typescript",
            Language::OpenApi => "openapi",
        })
    }
}

/// How structure properties are spelled in generated interfaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PropertyNaming {
    /// Keep the IDL field name.
    Original,
    SnakeCase,
    #[default]
    LowerCamelCase,
}

impl FromStr for PropertyNaming {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(PropertyNaming::Original),
            "snake" | "snake_case" => Ok(PropertyNaming::SnakeCase),
            "lower_camel" | "lower_camel_case" => Ok(PropertyNaming::LowerCamelCase),
            other => Err(ConfigError::UnknownNaming(other.to_string())),
        }
    }
}

/// Feature and naming flags consumed by the scope builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Features {
    pub language: Language,
    /// Reserve and allocate `DeepEqual` / `Field<N>DeepEqual` methods.
    pub gen_deep_equal: bool,
    /// Allocate `Set<F>` accessors.
    pub generate_setter: bool,
    /// Reserve `CarryingUnknownFields`.
    pub keep_unknown_fields: bool,
    /// Arrange struct fields to reduce padding.
    pub reorder_fields: bool,
    /// Validate the value grammar of recognized boolean annotations.
    pub check_option_grammar: bool,
    /// Compute `thrift:"..." json:"..."` binding tags per field.
    pub gen_binding_tags: bool,
    /// Suffix names that look like generated helpers (`New*`, `*Args`, `*Result`).
    pub compatible_names: bool,
    /// Use the referenced type's name for `thrift.nested` fields.
    pub enable_nested_struct: bool,
    /// Flag `thrift.is_alias` structures so renderers skip reflection helpers.
    pub no_alias_type_reflection_method: bool,
    /// Enum value literals use the allocated Go name instead of the IDL name.
    pub typed_enum_string: bool,
    /// Build independent root files on the rayon pool.
    pub parallel_files: bool,
    pub property_naming: PropertyNaming,
    /// Module path prepended to every import path (Go).
    pub package_prefix: String,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            language: Language::Go,
            gen_deep_equal: false,
            generate_setter: true,
            keep_unknown_fields: false,
            reorder_fields: false,
            check_option_grammar: false,
            gen_binding_tags: true,
            compatible_names: false,
            enable_nested_struct: false,
            no_alias_type_reflection_method: false,
            typed_enum_string: false,
            parallel_files: false,
            property_naming: PropertyNaming::LowerCamelCase,
            package_prefix: String::new(),
        }
    }
}

impl Features {
    /// Parse `name=value` options on top of the defaults.
    ///
    /// Unknown names are returned as warnings and otherwise ignored.
    pub fn from_args<I, S>(args: I) -> Result<(Self, Vec<Diagnostic>), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut features = Features::default();
        let mut warnings = Vec::new();

        for arg in args {
            let arg = arg.as_ref();
            if arg.is_empty() {
                continue;
            }
            let (name, value) = arg.split_once('=').unwrap_or((arg, ""));

            match name {
                "language" | "target" => features.language = value.parse()?,
                "gen_deep_equal" => features.gen_deep_equal = parse_bool(name, value)?,
                "generate_setter" => features.generate_setter = parse_bool(name, value)?,
                "keep_unknown_fields" => features.keep_unknown_fields = parse_bool(name, value)?,
                "reorder_fields" => features.reorder_fields = parse_bool(name, value)?,
                "use_option" | "check_option_grammar" => {
                    features.check_option_grammar = parse_bool(name, value)?
                }
                "gen_binding_tags" => features.gen_binding_tags = parse_bool(name, value)?,
                "compatible_names" => features.compatible_names = parse_bool(name, value)?,
                "enable_nested_struct" => {
                    features.enable_nested_struct = parse_bool(name, value)?
                }
                "no_alias_type_reflection_method" => {
                    features.no_alias_type_reflection_method = parse_bool(name, value)?
                }
                "typed_enum_string" => features.typed_enum_string = parse_bool(name, value)?,
                "parallel_files" => features.parallel_files = parse_bool(name, value)?,
                "property_naming" => features.property_naming = value.parse()?,
                "snake_style_property_name" => {
                    if parse_bool(name, value)? {
                        features.property_naming = PropertyNaming::SnakeCase;
                    }
                }
                "lower_camel_case_property_name" => {
                    if parse_bool(name, value)? {
                        features.property_naming = PropertyNaming::LowerCamelCase;
                    }
                }
                "package_prefix" => features.package_prefix = value.trim_end_matches('/').into(),
                _ => {
                    tracing::warn!(option = name, "ignoring unknown option");
                    warnings.push(
                        Diagnostic::warning("", format!("unknown option '{name}'"))
                            .with_code(codes::UNKNOWN_OPTION),
                    );
                }
            }
        }

        Ok((features, warnings))
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "" | "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let f = Features::default();
        assert_eq!(f.language, Language::Go);
        assert!(f.generate_setter);
        assert!(!f.gen_deep_equal);
        assert_eq!(f.property_naming, PropertyNaming::LowerCamelCase);
    }

    #[test]
    fn test_from_args() {
        let (f, warnings) = Features::from_args([
            "gen_deep_equal",
            "generate_setter=false",
            "snake_style_property_name=true",
            "target=ts",
            "package_prefix=example.com/gen/",
        ])
        .unwrap();

        assert!(f.gen_deep_equal);
        assert!(!f.generate_setter);
        assert_eq!(f.property_naming, PropertyNaming::SnakeCase);
        assert_eq!(f.language, Language::TypeScript);
        assert_eq!(f.package_prefix, "example.com/gen");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_option_is_a_warning() {
        let (_, warnings) = Features::from_args(["frobnicate=1"]).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code.as_deref(), Some(codes::UNKNOWN_OPTION));
    }

    #[test]
    fn test_bad_bool_is_an_error() {
        let err = Features::from_args(["reorder_fields=maybe"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("golang".parse::<Language>().unwrap(), Language::Go);
        assert_eq!("openapi".parse::<Language>().unwrap(), Language::OpenApi);
        assert!("cobol".parse::<Language>().is_err());
    }
}
