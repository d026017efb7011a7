//! Reference resolution: finding the declaration a type name points at.
//!
//! Lookups run against a [`Context`]: the file the type name was written in,
//! plus how that file is seen from the file being built ([`Home`]). A name is
//! searched in this order:
//!
//! 1. a structural [`Reference`] (include index + declaration name), when the
//!    parser recorded one
//! 2. unqualified names: the context file, then every transitively included
//!    file, breadth first
//! 3. qualified names (`base.User`): included files whose IDL name, import
//!    alias or namespace equals the qualifier

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::{DeclKind, Declared, Home, Include, Scope};
use crate::ast::{split_qualified, Category, Reference, StructLike, Thrift, Type};
use crate::error::ResolveError;

/// Typedef chains longer than this are treated as unresolvable.
const MAX_TYPEDEF_DEPTH: usize = 32;

// ============================================================================
// CONTEXT
// ============================================================================

/// The file a name is looked up from.
#[derive(Clone, Debug)]
pub struct Context<'a> {
    scope: &'a Scope,
    home: Home,
}

impl<'a> Context<'a> {
    /// The file being built.
    pub fn local(scope: &'a Scope) -> Self {
        Self {
            scope,
            home: Home::Local,
        }
    }

    /// An already built file.
    pub fn foreign(scope: &'a Arc<Scope>) -> Self {
        Self {
            scope,
            home: Home::Foreign(Arc::clone(scope)),
        }
    }

    /// The context in which a declaration with the given home is written.
    pub fn for_home(local: &'a Scope, home: &'a Home) -> Self {
        match home {
            Home::Local => Self::local(local),
            Home::Foreign(scope) => Self::foreign(scope),
        }
    }

    pub fn scope(&self) -> &'a Scope {
        self.scope
    }

    pub fn home(&self) -> &Home {
        &self.home
    }

    fn include_at(&self, index: i32) -> Option<&'a Include> {
        let index = usize::try_from(index).ok()?;
        self.scope.includes.get(index)?.as_ref()
    }

    /// Included files, direct ones first, each file once.
    fn transitive_includes(&self) -> Vec<&'a Include> {
        let mut seen = FxHashSet::default();
        seen.insert(self.scope.file());

        let mut queue: VecDeque<&'a Include> = self.scope.includes.iter().flatten().collect();
        let mut out = Vec::new();
        while let Some(include) = queue.pop_front() {
            if !seen.insert(include.scope.file()) {
                continue;
            }
            out.push(include);
            queue.extend(include.scope.includes.iter().flatten());
        }
        out
    }
}

// ============================================================================
// STRUCTURE REFERENCES
// ============================================================================

/// A structure definition found by [`resolve_struct_reference`].
#[derive(Clone, Debug)]
pub struct StructRef<'a> {
    pub ast: &'a StructLike,
    pub home: Home,
}

fn find_struct<'t>(ast: &'t Thrift, name: &str) -> Option<&'t StructLike> {
    ast.struct_likes().find(|s| s.name == name)
}

/// Locate the struct, union or exception a field type names.
///
/// Returns `None` when nothing matches; callers treat that as "not
/// expandable", never as an error.
pub fn resolve_struct_reference<'a>(ctx: &Context<'a>, ty: &Type) -> Option<StructRef<'a>> {
    let (qualifier, bare) = ty.split_name();
    let includes = ctx.transitive_includes();
    let foreign = |include: &'a Include, st: &'a StructLike| StructRef {
        ast: st,
        home: Home::Foreign(Arc::clone(&include.scope)),
    };

    if let Some(reference) = &ty.reference {
        let wanted = if reference.name.is_empty() {
            bare
        } else {
            reference.name.as_str()
        };
        if let Some(include) = ctx.include_at(reference.index) {
            let found = find_struct(&include.scope.ast, wanted)
                .or_else(|| find_struct(&include.scope.ast, bare));
            if let Some(st) = found {
                return Some(foreign(include, st));
            }
        }
        for include in &includes {
            if let Some(st) = find_struct(&include.scope.ast, bare) {
                return Some(foreign(include, st));
            }
        }
        return find_struct(&ctx.scope.ast, bare).map(|st| StructRef {
            ast: st,
            home: ctx.home.clone(),
        });
    }

    match qualifier {
        None => {
            if let Some(st) = find_struct(&ctx.scope.ast, bare) {
                return Some(StructRef {
                    ast: st,
                    home: ctx.home.clone(),
                });
            }
            includes
                .iter()
                .find_map(|inc| find_struct(&inc.scope.ast, bare).map(|st| foreign(inc, st)))
        }
        Some(q) => includes
            .iter()
            .filter(|inc| inc.matches_qualifier(q))
            .find_map(|inc| find_struct(&inc.scope.ast, bare).map(|st| foreign(inc, st)))
            .or_else(|| {
                // A file may qualify its own declarations.
                (q == ctx.scope.ast.idl_name())
                    .then(|| find_struct(&ctx.scope.ast, bare))
                    .flatten()
                    .map(|st| StructRef {
                        ast: st,
                        home: ctx.home.clone(),
                    })
            }),
    }
}

// ============================================================================
// DECLARATION LOOKUP
// ============================================================================

/// A declaration found by [`locate_declaration`].
#[derive(Clone, Debug)]
pub struct Located {
    pub home: Home,
    /// Allocated identifier in the declaring file.
    pub name: SmolStr,
    pub kind: DeclKind,
    /// Category after following typedefs.
    pub underlying: Category,
}

/// Find a top-level declaration by (possibly qualified) name, returning the
/// declaring file's context with it.
pub(crate) fn find_declaration<'a>(
    ctx: &Context<'a>,
    name: &str,
    reference: Option<&Reference>,
    accept: impl Fn(DeclKind) -> bool,
) -> Option<(Context<'a>, &'a Declared)> {
    let (qualifier, bare) = split_qualified(name);
    let lookup = |scope: &'a Scope, key: &str| scope.decls.get(key).filter(|d| accept(d.kind));

    if let Some(reference) = reference {
        if let Some(include) = ctx.include_at(reference.index) {
            let key = if reference.name.is_empty() {
                bare
            } else {
                reference.name.as_str()
            };
            if let Some(decl) = lookup(&include.scope, key) {
                return Some((Context::foreign(&include.scope), decl));
            }
        }
    }

    let includes = ctx.transitive_includes();
    match qualifier {
        None => {
            if let Some(decl) = lookup(ctx.scope, bare) {
                return Some((ctx.clone(), decl));
            }
            includes
                .into_iter()
                .find_map(|inc| lookup(&inc.scope, bare).map(|d| (Context::foreign(&inc.scope), d)))
        }
        Some(q) => {
            let found = includes
                .into_iter()
                .filter(|inc| inc.matches_qualifier(q))
                .find_map(|inc| lookup(&inc.scope, bare).map(|d| (Context::foreign(&inc.scope), d)));
            match found {
                Some(hit) => Some(hit),
                // A file may qualify its own declarations.
                None if q == ctx.scope.ast.idl_name() => {
                    lookup(ctx.scope, bare).map(|d| (ctx.clone(), d))
                }
                None => None,
            }
        }
    }
}

fn is_type_kind(kind: DeclKind) -> bool {
    matches!(
        kind,
        DeclKind::Structure(_) | DeclKind::Enum | DeclKind::Typedef
    )
}

/// Locate the declaration of a named (non-base, non-container) type.
///
/// The returned name comes from the declaring file's own allocation, not from
/// the IDL qualifier.
pub fn locate_declaration(ctx: &Context<'_>, ty: &Type, owner: &str) -> Result<Located, ResolveError> {
    let unresolved = || ResolveError::UnresolvedType {
        file: ctx.scope.filename().into(),
        field: owner.into(),
        type_name: ty.name.clone(),
    };

    let (declaring, decl) =
        find_declaration(ctx, &ty.name, ty.reference.as_ref(), is_type_kind).ok_or_else(unresolved)?;

    let underlying = match decl.kind {
        DeclKind::Structure(kind) => kind.category(),
        DeclKind::Enum => Category::Enum,
        _ => {
            let (_, bare) = ty.split_name();
            let key = match &ty.reference {
                Some(r) if !r.name.is_empty() => r.name.as_str(),
                _ => bare,
            };
            typedef_underlying(&declaring, key, 0).ok_or_else(unresolved)?
        }
    };

    tracing::trace!(
        file = %ctx.scope.filename(),
        owner,
        type_name = %ty.name,
        resolved = %decl.name,
        "located declaration"
    );

    Ok(Located {
        home: declaring.home.clone(),
        name: decl.name.clone(),
        kind: decl.kind,
        underlying,
    })
}

/// Follow a typedef to the category of the type it finally names.
fn typedef_underlying(ctx: &Context<'_>, alias: &str, depth: usize) -> Option<Category> {
    if depth > MAX_TYPEDEF_DEPTH {
        return None;
    }
    let typedef = ctx.scope.ast.typedefs.iter().find(|t| t.alias == alias)?;
    let target = &typedef.target;
    if target.category.is_base() || target.category.is_container() {
        return Some(target.category);
    }

    let (declaring, decl) = find_declaration(ctx, &target.name, target.reference.as_ref(), is_type_kind)?;
    match decl.kind {
        DeclKind::Structure(kind) => Some(kind.category()),
        DeclKind::Enum => Some(Category::Enum),
        _ => {
            let (_, bare) = target.split_name();
            typedef_underlying(&declaring, bare, depth + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Field, StructLike, Thrift, Typedef};
    use crate::config::Features;
    use crate::scope::{ScopeBuilder, ScopeCache};
    use crate::target::Go;

    fn build(root: Thrift) -> Arc<Scope> {
        let features = Features::default();
        let cache = ScopeCache::new();
        ScopeBuilder::new(&features, &Go, &cache)
            .build(&Arc::new(root))
            .unwrap()
    }

    fn base() -> Arc<Thrift> {
        Arc::new(
            Thrift::new("base.thrift")
                .with_namespace("go", "example.base")
                .with_struct(StructLike::new("struct", "MyData"))
                .with_struct(StructLike::new("union", "Choice"))
                .with_typedef(Typedef::new("Data", Type::named("MyData", Category::Struct))),
        )
    }

    fn other() -> Arc<Thrift> {
        Arc::new(
            Thrift::new("other.thrift")
                .with_namespace("go", "example.other")
                .with_struct(StructLike::new("struct", "MyData")),
        )
    }

    fn root() -> Thrift {
        Thrift::new("user.thrift")
            .with_namespace("go", "example.user")
            .with_include("base.thrift", base())
            .with_include("other.thrift", other())
            .with_struct(StructLike::new("struct", "Local"))
    }

    #[test]
    fn test_qualified_name_searches_includes() {
        let scope = build(root());
        let ctx = Context::local(&scope);

        let found = resolve_struct_reference(&ctx, &Type::named("base.MyData", Category::Struct)).unwrap();
        assert_eq!(found.ast.name, "MyData");
        assert_eq!(found.home.scope().unwrap().filename(), "base.thrift");

        let found = resolve_struct_reference(&ctx, &Type::named("other.MyData", Category::Struct)).unwrap();
        assert_eq!(found.home.scope().unwrap().filename(), "other.thrift");
    }

    #[test]
    fn test_reference_index_disambiguates() {
        let scope = build(root());
        let ctx = Context::local(&scope);

        let ty = Type::named("MyData", Category::Struct).with_reference(1, "MyData");
        let found = resolve_struct_reference(&ctx, &ty).unwrap();
        assert_eq!(found.home.scope().unwrap().filename(), "other.thrift");
    }

    #[test]
    fn test_unqualified_prefers_current_file() {
        let scope = build(root());
        let ctx = Context::local(&scope);

        let found = resolve_struct_reference(&ctx, &Type::named("Local", Category::Struct)).unwrap();
        assert!(found.home.is_local());

        let found = resolve_struct_reference(&ctx, &Type::named("Choice", Category::Union)).unwrap();
        assert_eq!(found.home.scope().unwrap().filename(), "base.thrift");
    }

    #[test]
    fn test_unresolved_is_none() {
        let scope = build(root());
        let ctx = Context::local(&scope);
        assert!(resolve_struct_reference(&ctx, &Type::named("base.Missing", Category::Struct)).is_none());
        assert!(resolve_struct_reference(&ctx, &Type::named("nowhere.MyData", Category::Struct)).is_none());
    }

    #[test]
    fn test_locate_uses_allocated_names_and_follows_typedefs() {
        let scope = build(root());
        let ctx = Context::local(&scope);

        let located = locate_declaration(&ctx, &Type::named("base.Data", Category::Typedef), "f").unwrap();
        assert_eq!(located.name, "Data");
        assert_eq!(located.kind, DeclKind::Typedef);
        assert_eq!(located.underlying, Category::Struct);
        assert_eq!(located.home.scope().unwrap().filename(), "base.thrift");
    }

    #[test]
    fn test_locate_unresolved_is_an_error() {
        let scope = build(root().with_struct(
            StructLike::new("struct", "Holder").with_field(Field::new(1, "x", Type::base(Category::I32))),
        ));
        let ctx = Context::local(&scope);
        let err = locate_declaration(&ctx, &Type::named("base.Nope", Category::Struct), "Holder.x").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnresolvedType {
                file: "user.thrift".into(),
                field: "Holder.x".into(),
                type_name: "base.Nope".into(),
            }
        );
    }

    /// `user.thrift` includes `mid.thrift`, which includes `deep.thrift`.
    fn chained() -> Thrift {
        let deep = Arc::new(
            Thrift::new("deep.thrift")
                .with_namespace("go", "example.deep")
                .with_struct(StructLike::new("struct", "Deep"))
                .with_enum(crate::ast::Enum::new("Level", &[("LOW", 0)])),
        );
        let mid = Arc::new(
            Thrift::new("mid.thrift")
                .with_namespace("go", "example.mid")
                .with_include("deep.thrift", deep),
        );
        Thrift::new("user.thrift")
            .with_namespace("go", "example.user")
            .with_include("mid.thrift", mid)
    }

    #[test]
    fn test_include_of_include_is_searched() {
        let scope = build(chained());
        let ctx = Context::local(&scope);

        for name in ["Deep", "deep.Deep"] {
            let found = resolve_struct_reference(&ctx, &Type::named(name, Category::Struct)).unwrap();
            assert_eq!(found.home.scope().unwrap().filename(), "deep.thrift", "{name}");
        }
        let located = locate_declaration(&ctx, &Type::named("deep.Level", Category::Enum), "f").unwrap();
        assert_eq!(located.kind, DeclKind::Enum);
        assert_eq!(located.home.scope().unwrap().filename(), "deep.thrift");
        assert!(resolve_struct_reference(&ctx, &Type::named("mid.Deep", Category::Struct)).is_none());
    }

    #[test]
    fn test_reference_miss_falls_back_to_includes_then_local() {
        let scope = build(root());
        let ctx = Context::local(&scope);

        // other.thrift (index 1) has no Choice; base.thrift has.
        let ty = Type::named("Choice", Category::Union).with_reference(1, "Choice");
        let found = resolve_struct_reference(&ctx, &ty).unwrap();
        assert_eq!(found.home.scope().unwrap().filename(), "base.thrift");
        let located = locate_declaration(&ctx, &ty, "f").unwrap();
        assert_eq!(located.home.scope().unwrap().filename(), "base.thrift");

        // Neither include has Local.
        let ty = Type::named("Local", Category::Struct).with_reference(0, "Local");
        assert!(resolve_struct_reference(&ctx, &ty).unwrap().home.is_local());
        assert!(locate_declaration(&ctx, &ty, "f").unwrap().home.is_local());

        // An index past the include list behaves the same.
        let ty = Type::named("Local", Category::Struct).with_reference(7, "Local");
        assert!(resolve_struct_reference(&ctx, &ty).unwrap().home.is_local());
    }

    #[test]
    fn test_self_qualified_name_resolves_locally() {
        let scope = build(root());
        let ctx = Context::local(&scope);
        let ty = Type::named("user.Local", Category::Struct);

        assert!(resolve_struct_reference(&ctx, &ty).unwrap().home.is_local());
        let located = locate_declaration(&ctx, &ty, "f").unwrap();
        assert!(located.home.is_local());
        assert_eq!(located.name, "Local");
    }
}
