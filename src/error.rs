//! Error types for scope building and resolution.

use smol_str::SmolStr;
use thiserror::Error;

/// A literal name could not be reserved in a [`Namespace`](crate::base::Namespace).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot reserve '{name}' for '{key}': held by '{owner}'")]
pub struct NameConflict {
    pub name: SmolStr,
    pub key: SmolStr,
    pub owner: SmolStr,
}

/// A type or value expression that does not lead to any known declaration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("{file}: cannot resolve type '{type_name}' of '{field}'")]
    UnresolvedType {
        file: SmolStr,
        field: SmolStr,
        type_name: SmolStr,
    },
    #[error("{file}: cannot resolve value '{value}' used by '{owner}'")]
    UnresolvedValue {
        file: SmolStr,
        owner: SmolStr,
        value: SmolStr,
    },
    #[error("{file}: container type '{type_name}' of '{owner}' is missing its element type")]
    MalformedType {
        file: SmolStr,
        owner: SmolStr,
        type_name: SmolStr,
    },
}

/// Failure to build the scope of one file.
///
/// Build errors are scoped to the offending file; a batch keeps going with its
/// siblings.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{file}: {source}")]
    NameConflict {
        file: SmolStr,
        #[source]
        source: NameConflict,
    },
    #[error("{file}: '{raw}' is not a valid identifier")]
    InvalidIdentifier { file: SmolStr, raw: SmolStr },
    #[error("{file}: annotation {key}=\"{value}\" on '{owner}' is malformed")]
    AnnotationGrammar {
        file: SmolStr,
        owner: SmolStr,
        key: SmolStr,
        value: SmolStr,
    },
    #[error("{file}: expanded field '{field}' of '{structure}' reuses field id {id}")]
    ExpandedIdCollision {
        file: SmolStr,
        structure: SmolStr,
        field: SmolStr,
        id: i32,
    },
    #[error("{file}: adjusted id of '{field}' in '{structure}' overflows i32")]
    ExpandedIdOverflow {
        file: SmolStr,
        structure: SmolStr,
        field: SmolStr,
    },
    #[error("circular include: {}", chain.join(" -> "))]
    CircularInclude { chain: Vec<SmolStr> },
    #[error("{file}: failed to build include '{path}': {source}")]
    Include {
        file: SmolStr,
        path: SmolStr,
        #[source]
        source: Box<BuildError>,
    },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl BuildError {
    /// The innermost error, following include chains.
    pub fn root_cause(&self) -> &BuildError {
        match self {
            BuildError::Include { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Failure to produce the output of one file.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("{file}: renderer failed")]
    Render { file: SmolStr },
}

/// A tree that could not be read or written.
#[cfg(feature = "interchange")]
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("invalid json tree: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid yaml tree: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Invalid generator option.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("option '{name}' expects true or false, got '{value}'")]
    InvalidBool { name: String, value: String },
    #[error("unknown target language '{0}'")]
    UnknownLanguage(String),
    #[error("unknown property naming style '{0}'")]
    UnknownNaming(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_error_display_nests() {
        let inner = BuildError::InvalidIdentifier {
            file: "base.thrift".into(),
            raw: "bad-name".into(),
        };
        let outer = BuildError::Include {
            file: "user.thrift".into(),
            path: "base.thrift".into(),
            source: Box::new(inner.clone()),
        };
        let text = outer.to_string();
        assert!(text.contains("user.thrift"));
        assert!(text.contains("bad-name"));
        assert_eq!(outer.root_cause(), &inner);
    }

    #[test]
    fn test_circular_include_display() {
        let err = BuildError::CircularInclude {
            chain: vec!["a.thrift".into(), "b.thrift".into(), "a.thrift".into()],
        };
        assert_eq!(
            err.to_string(),
            "circular include: a.thrift -> b.thrift -> a.thrift"
        );
    }

    #[test]
    fn test_resolve_error_converts() {
        let err: BuildError = ResolveError::UnresolvedType {
            file: "a.thrift".into(),
            field: "user".into(),
            type_name: "base.Missing".into(),
        }
        .into();
        assert!(matches!(err, BuildError::Resolve(_)));
        assert!(err.to_string().contains("base.Missing"));
    }
}
