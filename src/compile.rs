//! Batch driver: builds and renders many files in one run.
//!
//! Every root file is an isolated unit of work. A file that fails to build
//! or render reports its own error; its siblings are unaffected. Files that
//! several roots include are built once through the shared [`ScopeCache`].

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use smol_str::SmolStr;

use crate::ast::Thrift;
use crate::config::Features;
use crate::error::{BuildError, GenerateError};
use crate::pool::BufferPool;
use crate::scope::{Scope, ScopeBuilder, ScopeCache};
use crate::target::{self, Target};

/// The build result of one root file.
#[derive(Debug)]
pub struct Built {
    pub filename: SmolStr,
    pub result: Result<Arc<Scope>, BuildError>,
}

/// The rendered output of one root file.
#[derive(Debug)]
pub struct FileOutput {
    pub filename: SmolStr,
    pub result: Result<String, GenerateError>,
}

/// Owns everything shared by one generation run.
pub struct Compiler {
    features: Features,
    target: Arc<dyn Target>,
    cache: ScopeCache,
    pool: BufferPool,
}

impl Compiler {
    /// A compiler for the built-in target of `features.language`.
    pub fn new(features: Features) -> Self {
        let target = target::for_language(features.language);
        Self::with_target(features, target)
    }

    pub fn with_target(features: Features, target: Arc<dyn Target>) -> Self {
        Self {
            features,
            target,
            cache: ScopeCache::new(),
            pool: BufferPool::new(),
        }
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn target(&self) -> &dyn Target {
        self.target.as_ref()
    }

    /// Scopes built so far.
    pub fn cache(&self) -> &ScopeCache {
        &self.cache
    }

    fn builder(&self) -> ScopeBuilder<'_> {
        ScopeBuilder::new(&self.features, self.target.as_ref(), &self.cache)
    }

    /// Build one file and its includes.
    pub fn build(&self, ast: &Arc<Thrift>) -> Result<Arc<Scope>, BuildError> {
        self.builder().build(ast)
    }

    /// Build every root, in parallel when `parallel_files` is set. Results
    /// keep the order of `roots`.
    pub fn build_all(&self, roots: &[Arc<Thrift>]) -> Vec<Built> {
        let build_one = |ast: &Arc<Thrift>| {
            let result = self.build(ast);
            if let Err(err) = &result {
                tracing::warn!(file = %ast.filename, error = %err, "failed to build scope");
            }
            Built {
                filename: ast.filename.clone(),
                result,
            }
        };

        let built: Vec<Built> = if self.features.parallel_files {
            roots.par_iter().map(build_one).collect()
        } else {
            roots.iter().map(build_one).collect()
        };

        let failed = built.iter().filter(|b| b.result.is_err()).count();
        tracing::info!(
            files = built.len(),
            failed,
            cached = self.cache.len(),
            "built scopes"
        );
        built
    }

    /// Build every root and render each built scope into a pooled buffer.
    pub fn generate<R>(&self, roots: &[Arc<Thrift>], render: R) -> Vec<FileOutput>
    where
        R: Fn(&Scope, &mut String) -> fmt::Result + Sync,
    {
        let render_one = |built: Built| {
            let result = built
                .result
                .map_err(GenerateError::from)
                .and_then(|scope| self.render(&scope, &render));
            FileOutput {
                filename: built.filename,
                result,
            }
        };

        let built = self.build_all(roots);
        if self.features.parallel_files {
            built.into_par_iter().map(render_one).collect()
        } else {
            built.into_iter().map(render_one).collect()
        }
    }

    fn render<R>(&self, scope: &Scope, render: &R) -> Result<String, GenerateError>
    where
        R: Fn(&Scope, &mut String) -> fmt::Result,
    {
        let mut buf = self.pool.checkout();
        render(scope, &mut *buf).map_err(|_| GenerateError::Render {
            file: scope.filename().into(),
        })?;
        tracing::debug!(file = %scope.filename(), bytes = buf.len(), "rendered file");
        Ok(buf.to_output())
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("language", &self.features.language)
            .field("scopes", &self.cache.len())
            .field("pool", &self.pool)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;
    use crate::ast::{Category, Field, StructLike, Type};
    use crate::config::Language;

    fn shared() -> Arc<Thrift> {
        Arc::new(
            Thrift::new("shared.thrift")
                .with_namespace("go", "example.shared")
                .with_struct(StructLike::new("struct", "Shared")),
        )
    }

    fn root(name: &str, shared: &Arc<Thrift>) -> Arc<Thrift> {
        Arc::new(
            Thrift::new(name)
                .with_include("shared.thrift", Arc::clone(shared))
                .with_struct(
                    StructLike::new("struct", "Holder")
                        .with_field(Field::new(1, "s", Type::named("shared.Shared", Category::Struct))),
                ),
        )
    }

    fn broken() -> Arc<Thrift> {
        Arc::new(
            Thrift::new("broken.thrift").with_struct(
                StructLike::new("struct", "Holder")
                    .with_field(Field::new(1, "m", Type::named("Missing", Category::Struct))),
            ),
        )
    }

    #[test]
    fn test_failure_is_isolated_per_file() {
        let compiler = Compiler::new(Features::default());
        let shared = shared();
        let roots = vec![root("a.thrift", &shared), broken(), root("b.thrift", &shared)];
        let built = compiler.build_all(&roots);

        assert_eq!(built.len(), 3);
        assert!(built[0].result.is_ok());
        assert!(built[1].result.is_err());
        assert!(built[2].result.is_ok());
        // shared.thrift, a.thrift, b.thrift
        assert_eq!(compiler.cache().len(), 3);
    }

    #[test]
    fn test_parallel_build_shares_included_scopes() {
        let features = Features {
            parallel_files: true,
            ..Features::default()
        };
        let compiler = Compiler::new(features);
        let shared = shared();
        let roots: Vec<_> = (0..8).map(|i| root(&format!("r{i}.thrift"), &shared)).collect();
        let built = compiler.build_all(&roots);

        let first = built[0].result.as_ref().unwrap().includes()[0].as_ref().unwrap().scope.clone();
        for b in &built {
            let scope = b.result.as_ref().unwrap();
            let include = scope.includes()[0].as_ref().unwrap();
            assert!(Arc::ptr_eq(&include.scope, &first));
        }
    }

    #[test]
    fn test_generate_renders_through_pool() {
        let compiler = Compiler::new(Features::default());
        let shared = shared();
        let roots = vec![root("a.thrift", &shared), broken()];
        let outputs = compiler.generate(&roots, |scope, out| {
            write!(out, "package {}", scope.import_package())?;
            for st in scope.structs() {
                write!(out, "\ntype {} struct", st.name)?;
            }
            Ok(())
        });

        assert_eq!(outputs[0].result.as_deref(), Ok("package a\ntype Holder struct"));
        assert!(matches!(outputs[1].result, Err(GenerateError::Build(_))));
        assert_eq!(compiler.pool.idle(), 1);
    }

    #[test]
    fn test_render_error_names_the_file() {
        let compiler = Compiler::new(Features {
            language: Language::TypeScript,
            ..Features::default()
        });
        let outputs = compiler.generate(&[shared()], |_, _| Err(fmt::Error));
        assert_eq!(
            outputs[0].result,
            Err(GenerateError::Render {
                file: "shared.thrift".into()
            })
        );
        assert_eq!(compiler.target().language(), Language::TypeScript);
    }
}
