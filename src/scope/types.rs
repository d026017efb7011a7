//! Type name and value resolution.
//!
//! Resolution happens in two steps. [`resolve_type`] turns an IDL type
//! descriptor into a [`TypeExpr`]: a structured form in which every named
//! type is located in its declaring file. Rendering then turns the expression
//! into target-language text, asking the scope being built for the import
//! alias of every foreign home it meets. Locating only reads scopes, so it
//! runs on the rayon pool; rendering mutates the import table and runs
//! sequentially, in declaration order.

use std::fmt;

use rayon::prelude::*;
use smol_str::SmolStr;

use super::reference::{find_declaration, locate_declaration, Context};
use super::{DeclKind, Home, Param, Scope, ServiceRef, Structure};
use crate::ast::{split_qualified, Category, ConstValue, Type};
use crate::error::{BuildError, ResolveError};
use crate::target::Target;

// ============================================================================
// RESOLVED TEXT
// ============================================================================

/// A rendered type plus the import aliases its text references.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub text: String,
    pub qualifiers: Vec<SmolStr>,
}

impl TypeName {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A rendered value expression plus the import aliases it references.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code {
    pub text: String,
    pub qualifiers: Vec<SmolStr>,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn push_qualifier(qualifiers: &mut Vec<SmolStr>, alias: Option<SmolStr>) -> Option<SmolStr> {
    if let Some(alias) = &alias {
        if !qualifiers.contains(alias) {
            qualifiers.push(alias.clone());
        }
    }
    alias
}

// ============================================================================
// TYPE EXPRESSIONS
// ============================================================================

/// A located type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    Primitive(Category),
    List(Box<TypeExpr>),
    Set(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Named {
        home: Home,
        /// Allocated identifier in the declaring file.
        name: SmolStr,
        /// Category after following typedefs.
        underlying: Category,
    },
}

impl TypeExpr {
    pub fn underlying(&self) -> Category {
        match self {
            TypeExpr::Primitive(c) => *c,
            TypeExpr::List(_) => Category::List,
            TypeExpr::Set(_) => Category::Set,
            TypeExpr::Map(..) => Category::Map,
            TypeExpr::Named { underlying, .. } => *underlying,
        }
    }

    fn element(&self) -> Option<&TypeExpr> {
        match self {
            TypeExpr::List(e) | TypeExpr::Set(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// Follow the IDL qualifier and references.
    Declared,
    /// Prefer a direct include declaring the bare name (function signatures).
    Requalified,
}

/// Locate `ty` as seen from `ctx`.
///
/// `owner` names the field or declaration the type belongs to, for errors.
pub fn resolve_type(ctx: &Context<'_>, ty: &Type, owner: &str) -> Result<TypeExpr, ResolveError> {
    resolve(ctx, ty, owner, Lookup::Declared)
}

fn resolve(ctx: &Context<'_>, ty: &Type, owner: &str, lookup: Lookup) -> Result<TypeExpr, ResolveError> {
    let element = |t: &Option<Box<Type>>| -> Result<TypeExpr, ResolveError> {
        let t = t.as_deref().ok_or_else(|| ResolveError::MalformedType {
            file: ctx.scope().filename().into(),
            owner: owner.into(),
            type_name: ty.name.clone(),
        })?;
        resolve(ctx, t, owner, lookup)
    };

    match ty.category {
        c if c.is_base() => Ok(TypeExpr::Primitive(c)),
        Category::List => Ok(TypeExpr::List(Box::new(element(&ty.value_type)?))),
        Category::Set => Ok(TypeExpr::Set(Box::new(element(&ty.value_type)?))),
        Category::Map => Ok(TypeExpr::Map(
            Box::new(element(&ty.key_type)?),
            Box::new(element(&ty.value_type)?),
        )),
        _ => {
            if lookup == Lookup::Requalified {
                if let Some(found) = requalify(ctx, ty, owner) {
                    return Ok(found);
                }
            }
            let located = locate_declaration(ctx, ty, owner)?;
            Ok(TypeExpr::Named {
                home: located.home,
                name: located.name,
                underlying: located.underlying,
            })
        }
    }
}

/// Search the direct includes for the bare name of a qualified type.
///
/// The IDL qualifier reflects source naming, which need not match any alias
/// of the generated code.
fn requalify(ctx: &Context<'_>, ty: &Type, owner: &str) -> Option<TypeExpr> {
    let (Some(_), bare) = ty.split_name() else {
        return None;
    };
    let bare_type = Type::named(bare, ty.category);
    ctx.scope().includes.iter().flatten().find_map(|include| {
        include.scope.declaration(bare)?;
        let located = locate_declaration(&Context::foreign(&include.scope), &bare_type, owner).ok()?;
        Some(TypeExpr::Named {
            home: located.home,
            name: located.name,
            underlying: located.underlying,
        })
    })
}

// ============================================================================
// VALUE EXPRESSIONS
// ============================================================================

#[derive(Clone, Debug)]
enum ValueExpr {
    Int(i64),
    Double(f64),
    Literal(SmolStr),
    Bool(bool),
    EnumValue {
        home: Home,
        enum_name: SmolStr,
        value_name: SmolStr,
    },
    Constant {
        home: Home,
        name: SmolStr,
    },
    List(Vec<ValueExpr>),
    Map(Vec<(ValueExpr, ValueExpr)>),
}

fn resolve_value(ctx: &Context<'_>, value: &ConstValue, owner: &str) -> Result<ValueExpr, ResolveError> {
    match value {
        ConstValue::Int(v) => Ok(ValueExpr::Int(*v)),
        ConstValue::Double(v) => Ok(ValueExpr::Double(*v)),
        ConstValue::Literal(s) => Ok(ValueExpr::Literal(s.clone())),
        ConstValue::Identifier(id) => resolve_identifier(ctx, id, owner),
        ConstValue::List(elems) => elems
            .iter()
            .map(|e| resolve_value(ctx, e, owner))
            .collect::<Result<_, _>>()
            .map(ValueExpr::List),
        ConstValue::Map(pairs) => pairs
            .iter()
            .map(|(k, v)| Ok((resolve_value(ctx, k, owner)?, resolve_value(ctx, v, owner)?)))
            .collect::<Result<_, ResolveError>>()
            .map(ValueExpr::Map),
    }
}

fn resolve_identifier(ctx: &Context<'_>, id: &str, owner: &str) -> Result<ValueExpr, ResolveError> {
    match id {
        "true" => return Ok(ValueExpr::Bool(true)),
        "false" => return Ok(ValueExpr::Bool(false)),
        _ => {}
    }

    if let Some((declaring, decl)) = find_declaration(ctx, id, None, |k| k == DeclKind::Constant) {
        return Ok(ValueExpr::Constant {
            home: declaring.home().clone(),
            name: decl.name.clone(),
        });
    }

    // `Color.RED` or `base.Color.RED`
    if let (Some(enum_path), member) = split_qualified(id) {
        if let Some((declaring, decl)) = find_declaration(ctx, enum_path, None, |k| k == DeclKind::Enum) {
            let (_, enum_source) = split_qualified(enum_path);
            let value = declaring
                .scope()
                .enumeration(enum_source)
                .and_then(|e| e.value(member));
            if let Some(value) = value {
                return Ok(ValueExpr::EnumValue {
                    home: declaring.home().clone(),
                    enum_name: decl.name.clone(),
                    value_name: value.name.clone(),
                });
            }
        }
    }

    Err(ResolveError::UnresolvedValue {
        file: ctx.scope().filename().into(),
        owner: owner.into(),
        value: id.into(),
    })
}

// ============================================================================
// RENDERING
// ============================================================================

/// Renders located expressions into the scope being built.
struct Renderer<'s> {
    scope: &'s mut Scope,
    target: &'s dyn Target,
}

impl Renderer<'_> {
    fn type_name(&mut self, expr: &TypeExpr) -> TypeName {
        let mut qualifiers = Vec::new();
        let text = self.type_text(expr, &mut qualifiers);
        TypeName { text, qualifiers }
    }

    fn type_text(&mut self, expr: &TypeExpr, qualifiers: &mut Vec<SmolStr>) -> String {
        match expr {
            TypeExpr::Primitive(c) => self.target.primitive(*c).to_string(),
            TypeExpr::List(e) => {
                let elem = self.type_text(e, qualifiers);
                self.target.list(&elem)
            }
            TypeExpr::Set(e) => {
                let elem = self.type_text(e, qualifiers);
                self.target.set(&elem)
            }
            TypeExpr::Map(k, v) => {
                let key = self.type_text(k, qualifiers);
                let value = self.type_text(v, qualifiers);
                self.target.map(&key, &value)
            }
            TypeExpr::Named {
                home,
                name,
                underlying,
            } => {
                let qualifier = self.qualifier(home, qualifiers);
                self.target.named(qualifier.as_deref(), name, *underlying)
            }
        }
    }

    fn qualifier(&mut self, home: &Home, qualifiers: &mut Vec<SmolStr>) -> Option<SmolStr> {
        push_qualifier(qualifiers, self.scope.use_home(home, self.target))
    }

    /// Render a value of type `ty`, whose rendered text is `type_text`.
    fn value(&mut self, value: &ValueExpr, ty: &TypeExpr, type_text: &str) -> Code {
        let mut qualifiers = Vec::new();
        let text = self.value_text(value, ty, type_text, &mut qualifiers);
        Code { text, qualifiers }
    }

    fn value_text(
        &mut self,
        value: &ValueExpr,
        ty: &TypeExpr,
        type_text: &str,
        qualifiers: &mut Vec<SmolStr>,
    ) -> String {
        match value {
            ValueExpr::Int(v) => match ty.underlying() {
                Category::Bool => self.target.bool_literal(*v != 0),
                Category::Double => self.target.double_literal(*v as f64),
                _ => self.target.int_literal(*v, type_text),
            },
            ValueExpr::Double(v) => self.target.double_literal(*v),
            ValueExpr::Literal(s) => self.target.string_literal(s),
            ValueExpr::Bool(b) => self.target.bool_literal(*b),
            ValueExpr::EnumValue {
                home,
                enum_name,
                value_name,
            } => {
                let q = self.qualifier(home, qualifiers);
                self.target.enum_value(q.as_deref(), enum_name, value_name)
            }
            ValueExpr::Constant { home, name } => {
                let q = self.qualifier(home, qualifiers);
                self.target.constant(q.as_deref(), name)
            }
            ValueExpr::List(elems) => {
                let elem_ty = ty.element().cloned().unwrap_or(TypeExpr::Primitive(Category::String));
                let elem_text = self.type_text(&elem_ty, qualifiers);
                let rendered: Vec<String> = elems
                    .iter()
                    .map(|e| self.value_text(e, &elem_ty, &elem_text, qualifiers))
                    .collect();
                self.target.list_literal(type_text, &rendered)
            }
            ValueExpr::Map(pairs) => {
                let (key_ty, value_ty) = match ty {
                    TypeExpr::Map(k, v) => (k.as_ref().clone(), v.as_ref().clone()),
                    _ => (
                        TypeExpr::Primitive(Category::String),
                        TypeExpr::Primitive(Category::String),
                    ),
                };
                let key_text = self.type_text(&key_ty, qualifiers);
                let value_text = self.type_text(&value_ty, qualifiers);
                let rendered: Vec<(String, String)> = pairs
                    .iter()
                    .map(|(k, v)| {
                        (
                            self.value_text(k, &key_ty, &key_text, qualifiers),
                            self.value_text(v, &value_ty, &value_text, qualifiers),
                        )
                    })
                    .collect();
                self.target.map_literal(type_text, &rendered)
            }
        }
    }
}

// ============================================================================
// RESOLUTION PASS
// ============================================================================

#[derive(Clone, Copy, Debug)]
enum Slot {
    Structs,
    Unions,
    Exceptions,
    Synthesized,
}

const SLOTS: [Slot; 4] = [Slot::Structs, Slot::Unions, Slot::Exceptions, Slot::Synthesized];

fn structures(scope: &Scope, slot: Slot) -> &[Structure] {
    match slot {
        Slot::Structs => &scope.structs,
        Slot::Unions => &scope.unions,
        Slot::Exceptions => &scope.exceptions,
        Slot::Synthesized => &scope.synthesized,
    }
}

fn structures_mut(scope: &mut Scope, slot: Slot) -> &mut Vec<Structure> {
    match slot {
        Slot::Structs => &mut scope.structs,
        Slot::Unions => &mut scope.unions,
        Slot::Exceptions => &mut scope.exceptions,
        Slot::Synthesized => &mut scope.synthesized,
    }
}

/// Position of one field: structure, declared field, expanded child.
#[derive(Clone, Copy, Debug)]
struct FieldJob {
    slot: Slot,
    structure: usize,
    field: usize,
    expanded: Option<usize>,
}

struct FieldPlan {
    job: FieldJob,
    ty: TypeExpr,
    default: Option<ValueExpr>,
}

fn field_jobs(scope: &Scope) -> Vec<FieldJob> {
    let mut jobs = Vec::new();
    for slot in SLOTS {
        for (s, st) in structures(scope, slot).iter().enumerate() {
            for (f, field) in st.fields.iter().enumerate() {
                jobs.push(FieldJob {
                    slot,
                    structure: s,
                    field: f,
                    expanded: None,
                });
                jobs.extend((0..field.expanded.len()).map(|e| FieldJob {
                    slot,
                    structure: s,
                    field: f,
                    expanded: Some(e),
                }));
            }
        }
    }
    jobs
}

fn plan_field(scope: &Scope, job: FieldJob) -> Result<FieldPlan, ResolveError> {
    let st = &structures(scope, job.slot)[job.structure];
    let declared = &st.fields[job.field];
    let field = match job.expanded {
        Some(e) => &declared.expanded[e],
        None => declared,
    };
    let ctx = match &field.origin {
        Some(origin) => Context::for_home(scope, &origin.home),
        None => Context::local(scope),
    };
    let owner = format!("{}.{}", st.ast.name, field.display_name);

    let ty = resolve_type(&ctx, &field.ast.field_type, &owner)?;
    let default = field
        .ast
        .default
        .as_ref()
        .map(|v| resolve_value(&ctx, v, &owner))
        .transpose()?;

    tracing::trace!(file = %scope.filename(), field = %owner, "resolved field type");
    Ok(FieldPlan { job, ty, default })
}

/// Resolve the types and default values of every field, typedef and
/// constant of `scope`.
pub(crate) fn resolve_types_and_values(scope: &mut Scope, target: &dyn Target) -> Result<(), BuildError> {
    let jobs = field_jobs(scope);
    let plans: Vec<FieldPlan> = {
        let shared: &Scope = scope;
        jobs.par_iter()
            .map(|job| plan_field(shared, *job))
            .collect::<Result<_, _>>()?
    };

    for plan in plans {
        let optional = {
            let declared = &structures(scope, plan.job.slot)[plan.job.structure].fields[plan.job.field];
            match plan.job.expanded {
                Some(e) => declared.expanded[e].is_optional(),
                None => declared.is_optional(),
            }
        };

        let mut renderer = Renderer { scope: &mut *scope, target };
        let underlying = plan.ty.underlying();
        let base = renderer.type_name(&plan.ty);
        let type_name = TypeName {
            text: target.field_type(&base.text, underlying, optional),
            qualifiers: base.qualifiers.clone(),
        };
        let (default_value, has_default) = match &plan.default {
            Some(value) => (renderer.value(value, &plan.ty, &base.text), true),
            None => (
                Code {
                    text: target.zero_value(underlying, &base.text),
                    qualifiers: Vec::new(),
                },
                false,
            ),
        };

        let declared = &mut structures_mut(scope, plan.job.slot)[plan.job.structure].fields[plan.job.field];
        let field = match plan.job.expanded {
            Some(e) => &mut declared.expanded[e],
            None => declared,
        };
        field.type_name = type_name;
        field.default_type_name = base;
        field.default_value = default_value;
        field.has_default = has_default;
    }

    resolve_typedefs(scope, target)?;
    resolve_constants(scope, target)?;
    Ok(())
}

fn resolve_typedefs(scope: &mut Scope, target: &dyn Target) -> Result<(), BuildError> {
    for i in 0..scope.typedefs.len() {
        let ast = scope.typedefs[i].ast.clone();
        let ty = resolve_type(&Context::local(scope), &ast.target, &ast.alias)?;
        let base = Renderer { scope: &mut *scope, target }.type_name(&ty);
        scope.typedefs[i].type_name = TypeName {
            text: target.alias_type(&base.text),
            qualifiers: base.qualifiers,
        };
    }
    Ok(())
}

fn resolve_constants(scope: &mut Scope, target: &dyn Target) -> Result<(), BuildError> {
    for i in 0..scope.constants.len() {
        let ast = scope.constants[i].ast.clone();
        let (ty, value) = {
            let ctx = Context::local(scope);
            let ty = resolve_type(&ctx, &ast.const_type, &ast.name)?;
            (ty, resolve_value(&ctx, &ast.value, &ast.name)?)
        };
        let mut renderer = Renderer { scope: &mut *scope, target };
        let type_name = renderer.type_name(&ty);
        let init = renderer.value(&value, &ty, &type_name.text);
        let constant = &mut scope.constants[i];
        constant.type_name = type_name;
        constant.init = init;
    }
    Ok(())
}

// ============================================================================
// SERVICES
// ============================================================================

/// Resolve every service's `extends`.
pub(crate) fn resolve_service_bases(scope: &mut Scope, target: &dyn Target) -> Result<(), BuildError> {
    for i in 0..scope.services.len() {
        let ast = scope.services[i].ast.clone();
        let Some(extends) = &ast.extends else {
            continue;
        };
        let (home, name) = {
            let ctx = Context::local(scope);
            let (declaring, decl) = find_declaration(&ctx, extends, ast.extends_reference.as_ref(), |k| {
                k == DeclKind::Service
            })
            .ok_or_else(|| ResolveError::UnresolvedType {
                file: scope.filename().into(),
                field: ast.name.clone(),
                type_name: extends.clone(),
            })?;
            (declaring.home().clone(), decl.name.clone())
        };
        let qualifier = scope.use_home(&home, target);
        scope.services[i].base = Some(ServiceRef {
            name,
            qualifier,
            home,
        });
    }
    Ok(())
}

/// Resolve argument, response and exception types of every function.
pub(crate) fn resolve_function_types(scope: &mut Scope, target: &dyn Target) -> Result<(), BuildError> {
    for s in 0..scope.services.len() {
        for f in 0..scope.services[s].functions.len() {
            let function = scope.services[s].functions[f].ast.clone();
            let owner = format!("{}.{}", scope.services[s].ast.name, function.name);

            let success_expands = scope.services[s].functions[f]
                .result_struct
                .as_ref()
                .and_then(|name| scope.synthesized.iter().find(|st| &st.name == name))
                .and_then(|st| st.field("success"))
                .is_some_and(|success| success.is_expandable);

            let (arguments, response, throws) = {
                let ctx = Context::local(scope);
                let arguments = function
                    .arguments
                    .iter()
                    .map(|a| resolve(&ctx, &a.field_type, &format!("{owner}.{}", a.name), Lookup::Requalified))
                    .collect::<Result<Vec<_>, _>>()?;
                let response = if function.void || function.oneway {
                    None
                } else if success_expands {
                    // The success slot was flattened; the signature keeps the declared type.
                    Some(resolve_type(&ctx, &function.function_type, &owner)?)
                } else {
                    Some(resolve(&ctx, &function.function_type, &owner, Lookup::Requalified)?)
                };
                let throws = function
                    .throws
                    .iter()
                    .map(|t| resolve(&ctx, &t.field_type, &format!("{owner}.{}", t.name), Lookup::Requalified))
                    .collect::<Result<Vec<_>, _>>()?;
                (arguments, response, throws)
            };

            let mut renderer = Renderer { scope: &mut *scope, target };
            let arguments: Vec<TypeName> = arguments.iter().map(|t| renderer.type_name(t)).collect();
            let response = response.map(|t| renderer.type_name(&t));
            let throws: Vec<TypeName> = throws.iter().map(|t| renderer.type_name(t)).collect();

            let resolved = &mut scope.services[s].functions[f];
            assign_params(&mut resolved.arguments, arguments);
            assign_params(&mut resolved.throws, throws);
            resolved.response = response;
        }
    }
    Ok(())
}

fn assign_params(params: &mut [Param], types: Vec<TypeName>) {
    for (param, ty) in params.iter_mut().zip(types) {
        param.type_name = ty;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ast::{Constant, Enum, Field, StructLike, Thrift, Typedef};
    use crate::config::Features;
    use crate::scope::{ScopeBuilder, ScopeCache};
    use crate::target::{Go, TypeScript};

    fn base() -> Arc<Thrift> {
        Arc::new(
            Thrift::new("base.thrift")
                .with_namespace("go", "example.base")
                .with_enum(Enum::new("Color", &[("RED", 1), ("BLUE", 2)]))
                .with_struct(StructLike::new("struct", "Item"))
                .with_constant(Constant::new(
                    "DEFAULT_NAME",
                    Type::base(Category::String),
                    ConstValue::Literal("anon".into()),
                )),
        )
    }

    fn build_with(target: &dyn Target, root: Thrift) -> Arc<Scope> {
        let features = Features::default();
        let cache = ScopeCache::new();
        ScopeBuilder::new(&features, target, &cache)
            .build(&Arc::new(root))
            .unwrap()
    }

    #[test]
    fn test_field_types_are_qualified_by_import_alias() {
        let root = Thrift::new("user.thrift")
            .with_namespace("go", "example.user")
            .with_include("base.thrift", base())
            .with_struct(
                StructLike::new("struct", "Holder")
                    .with_field(Field::new(1, "items", Type::list(Type::named("base.Item", Category::Struct))))
                    .with_field(Field::new(2, "color", Type::named("base.Color", Category::Enum)).optional())
                    .with_field(
                        Field::new(3, "tags", Type::map(Type::base(Category::String), Type::base(Category::I64))),
                    ),
            );
        let scope = build_with(&Go, root);
        let holder = scope.structure("Holder").unwrap();

        let items = holder.field("items").unwrap();
        assert_eq!(items.type_name.text, "[]*base.Item");
        assert_eq!(items.type_name.qualifiers, ["base"]);

        let color = holder.field("color").unwrap();
        assert_eq!(color.type_name.text, "*base.Color");
        assert_eq!(color.default_type_name.text, "base.Color");
        assert_eq!(color.default_value.text, "base.Color(0)");
        assert!(!color.has_default);

        assert_eq!(holder.field("tags").unwrap().type_name.text, "map[string]int64");
    }

    #[test]
    fn test_defaults_resolve_enum_values_and_constants() {
        let root = Thrift::new("user.thrift")
            .with_include("base.thrift", base())
            .with_struct(
                StructLike::new("struct", "Paint")
                    .with_field(
                        Field::new(1, "color", Type::named("base.Color", Category::Enum))
                            .with_default(ConstValue::Identifier("base.Color.BLUE".into())),
                    )
                    .with_field(
                        Field::new(2, "name", Type::base(Category::String))
                            .with_default(ConstValue::Identifier("base.DEFAULT_NAME".into())),
                    )
                    .with_field(
                        Field::new(3, "weights", Type::list(Type::base(Category::Double)))
                            .with_default(ConstValue::List(vec![ConstValue::Int(1), ConstValue::Double(0.5)])),
                    ),
            );
        let scope = build_with(&Go, root);
        let paint = scope.structure("Paint").unwrap();

        let color = paint.field("color").unwrap();
        assert!(color.has_default);
        assert_eq!(color.default_value.text, "base.Color_BLUE");
        assert_eq!(color.default_value.qualifiers, ["base"]);

        assert_eq!(paint.field("name").unwrap().default_value.text, "base.DEFAULTNAME");
        assert_eq!(paint.field("weights").unwrap().default_value.text, "[]float64{1.0, 0.5}");
    }

    #[test]
    fn test_unresolved_value_is_an_error() {
        let root = Thrift::new("user.thrift").with_struct(
            StructLike::new("struct", "S").with_field(
                Field::new(1, "c", Type::base(Category::I32)).with_default(ConstValue::Identifier("NOPE".into())),
            ),
        );
        let features = Features::default();
        let cache = ScopeCache::new();
        let err = ScopeBuilder::new(&features, &Go, &cache)
            .build(&Arc::new(root))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::Resolve(ResolveError::UnresolvedValue { ref value, .. }) if value == "NOPE"
        ));
    }

    #[test]
    fn test_container_without_element_is_malformed() {
        let mut broken = Type::list(Type::base(Category::I32));
        broken.value_type = None;
        let root = Thrift::new("user.thrift")
            .with_struct(StructLike::new("struct", "S").with_field(Field::new(1, "xs", broken)));
        let features = Features::default();
        let cache = ScopeCache::new();
        let err = ScopeBuilder::new(&features, &Go, &cache)
            .build(&Arc::new(root))
            .unwrap_err();
        assert!(matches!(err, BuildError::Resolve(ResolveError::MalformedType { .. })));
    }

    #[test]
    fn test_typedefs_and_constants() {
        let root = Thrift::new("user.thrift")
            .with_include("base.thrift", base())
            .with_typedef(Typedef::new("ItemRef", Type::named("base.Item", Category::Struct)))
            .with_constant(Constant::new(
                "LIMITS",
                Type::map(Type::base(Category::String), Type::base(Category::I32)),
                ConstValue::Map(vec![(ConstValue::Literal("a".into()), ConstValue::Int(1))]),
            ));
        let scope = build_with(&Go, root);

        let typedef = &scope.typedefs()[0];
        assert_eq!(typedef.type_name.text, "base.Item");
        assert_eq!(typedef.type_name.qualifiers, ["base"]);

        let constant = &scope.constants()[0];
        assert_eq!(constant.type_name.text, "map[string]int32");
        assert_eq!(constant.init.text, r#"map[string]int32{"a": 1}"#);
    }

    #[test]
    fn test_typescript_rendering() {
        let root = Thrift::new("user.thrift").with_include("base.thrift", base()).with_struct(
            StructLike::new("struct", "Holder")
                .with_field(Field::new(1, "item", Type::named("base.Item", Category::Struct)).optional())
                .with_field(Field::new(2, "ids", Type::set(Type::base(Category::I64)))),
        );
        let scope = build_with(&TypeScript, root);
        let holder = scope.structure("Holder").unwrap();
        assert_eq!(holder.field("item").unwrap().type_name.text, "base.Item | undefined");
        assert_eq!(holder.field("ids").unwrap().type_name.text, "Set<number>");
    }
}
