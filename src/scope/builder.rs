//! Scope construction.
//!
//! [`ScopeBuilder::build`] turns one parsed file (and, through the cache,
//! everything it includes) into an immutable [`Scope`]. Names are installed
//! in a fixed order: services with their synthesized argument and result
//! structures, then structs, unions and exceptions, then enums, typedefs and
//! constants. Allocation order decides which declaration keeps the plain
//! name when two candidates collide, so the order is part of the output.

use std::cmp::Reverse;
use std::sync::Arc;

use smol_str::SmolStr;

use super::diagnostics::{codes, Diagnostic, DiagnosticCollector};
use super::expand::{
    build_expanded_fields, check_expanded_ids, should_expand, ExpansionRecord, Flag, ALIAS_ANNOTATION,
    EXPANDABLE_ANNOTATION, EXPAND_ANNOTATION, NESTED_ANNOTATION,
};
use super::reference::{resolve_struct_reference, Context};
use super::{
    prune, types, Code, Constant, DeclKind, Declared, Enum, EnumValue, Field, FieldOrigin, Function, Param, Scope,
    ScopeCache, Service, StructKind, Structure, TypeName, Typedef,
};
use crate::ast::{self, Annotations, Category, Requiredness, StructLike, Thrift};
use crate::base::{naming, Namespace};
use crate::config::{Features, PropertyNaming};
use crate::error::{BuildError, NameConflict};
use crate::target::Target;

// ============================================================================
// SCOPE BUILDER
// ============================================================================

/// Builds scopes for one generation run.
#[derive(Debug)]
pub struct ScopeBuilder<'a> {
    features: &'a Features,
    target: &'a dyn Target,
    cache: &'a ScopeCache,
}

impl<'a> ScopeBuilder<'a> {
    pub fn new(features: &'a Features, target: &'a dyn Target, cache: &'a ScopeCache) -> Self {
        Self {
            features,
            target,
            cache,
        }
    }

    /// Build the scope of `ast` and of every file it includes.
    ///
    /// Scopes already in the cache are reused.
    pub fn build(&self, ast: &Arc<Thrift>) -> Result<Arc<Scope>, BuildError> {
        let mut in_progress = Vec::new();
        self.build_in(ast, &mut in_progress)
    }

    fn build_in(&self, ast: &Arc<Thrift>, in_progress: &mut Vec<SmolStr>) -> Result<Arc<Scope>, BuildError> {
        if let Some(scope) = self.cache.get(&ast.filename) {
            tracing::debug!(file = %ast.filename, "scope cache hit");
            return Ok(scope);
        }
        if in_progress.contains(&ast.filename) {
            let mut chain = in_progress.clone();
            chain.push(ast.filename.clone());
            return Err(BuildError::CircularInclude { chain });
        }

        in_progress.push(ast.filename.clone());
        let built = self.build_file(ast, in_progress);
        in_progress.pop();

        Ok(self.cache.insert(built?))
    }

    fn build_file(&self, ast: &Arc<Thrift>, in_progress: &mut Vec<SmolStr>) -> Result<Scope, BuildError> {
        tracing::debug!(file = %ast.filename, "building scope");

        let file = self.cache.file_id(&ast.filename);
        let package = self.target.package(ast, &self.features.package_prefix);
        let mut scope = Scope::new(file, Arc::clone(ast), package);
        let mut diags = DiagnosticCollector::new();

        if self.features.check_option_grammar {
            check_option_grammar(ast)?;
        }

        self.build_includes(&mut scope, in_progress)?;
        self.install_names(&mut scope, &mut diags)?;

        types::resolve_types_and_values(&mut scope, self.target)?;
        prune::prune(&mut scope);
        types::resolve_service_bases(&mut scope, self.target)?;
        types::resolve_function_types(&mut scope, self.target)?;

        scope.diagnostics = diags.take();
        Ok(scope)
    }

    fn build_includes(&self, scope: &mut Scope, in_progress: &mut Vec<SmolStr>) -> Result<(), BuildError> {
        let ast = Arc::clone(&scope.ast);
        for include in &ast.includes {
            if !include.used {
                scope.includes.push(None);
                continue;
            }
            let included = self
                .build_in(&include.reference, in_progress)
                .map_err(|err| match err {
                    BuildError::CircularInclude { .. } => err,
                    other => BuildError::Include {
                        file: ast.filename.clone(),
                        path: include.path.clone(),
                        source: Box::new(other),
                    },
                })?;
            let resolved = scope.include_scope(included, self.target);
            tracing::debug!(
                file = %ast.filename,
                include = %include.path,
                alias = %resolved.package_name,
                same_package = resolved.same_package,
                "resolved include"
            );
            scope.includes.push(Some(resolved));
        }
        Ok(())
    }

    // ========================================================================
    // NAME INSTALLATION
    // ========================================================================

    fn install_names(&self, scope: &mut Scope, diags: &mut DiagnosticCollector) -> Result<(), BuildError> {
        let ast = Arc::clone(&scope.ast);
        for service in &ast.services {
            self.build_service(scope, diags, service)?;
        }
        for st in ast.struct_likes() {
            self.build_struct_like(scope, diags, st, false)?;
        }
        for enumeration in &ast.enums {
            self.build_enum(scope, enumeration)?;
        }
        for typedef in &ast.typedefs {
            self.build_typedef(scope, typedef)?;
        }
        for constant in &ast.constants {
            let name = self.declared_name(scope, &constant.name, false)?;
            scope.decls.insert(
                constant.name.clone(),
                Declared {
                    name: name.clone(),
                    kind: DeclKind::Constant,
                },
            );
            scope.constants.push(Constant {
                ast: constant.clone(),
                name,
                type_name: TypeName::default(),
                init: Code::default(),
            });
        }
        Ok(())
    }

    /// Allocate the global identifier of a declaration.
    fn declared_name(&self, scope: &mut Scope, source: &str, synthesized: bool) -> Result<SmolStr, BuildError> {
        let mut candidate = identify(scope.filename(), source)?;
        if self.features.compatible_names
            && !synthesized
            && (candidate.starts_with("New") || candidate.ends_with("Args") || candidate.ends_with("Result"))
        {
            candidate.push('_');
        }
        Ok(scope.globals.add(&candidate, source))
    }

    fn build_service(
        &self,
        scope: &mut Scope,
        diags: &mut DiagnosticCollector,
        service: &ast::Service,
    ) -> Result<(), BuildError> {
        let file: SmolStr = scope.filename().into();
        let name = self.declared_name(scope, &service.name, false)?;
        scope.decls.insert(
            service.name.clone(),
            Declared {
                name: name.clone(),
                kind: DeclKind::Service,
            },
        );

        let mut members = Namespace::new();
        let mut functions = Vec::with_capacity(service.functions.len());
        for function in &service.functions {
            let function_name = members.add(&identify(&file, &function.name)?, &function.name);

            let args = synthesized_args(service, function);
            let args_struct = self.build_struct_like(scope, diags, &args, true)?;
            let result_struct = match synthesized_result(service, function) {
                Some(result) => {
                    let allocated = self.build_struct_like(scope, diags, &result, true)?;
                    if let Some(success) = scope
                        .synthesized
                        .last_mut()
                        .and_then(|st| st.fields.iter_mut().find(|f| f.ast.name == SUCCESS_FIELD))
                    {
                        success.is_response = true;
                    }
                    Some(allocated)
                }
                None => None,
            };

            let (params, arguments, throws) = function_params(&file, function)?;
            functions.push(Function {
                ast: function.clone(),
                name: function_name,
                params,
                args_struct,
                result_struct,
                arguments,
                response: None,
                throws,
            });
        }

        let client = format!("{name}Client");
        let processor = format!("{name}Processor");
        reserve(&file, &mut scope.globals, &client, &naming::synthetic(&format!("client:{}", service.name)))?;
        reserve(&file, &mut scope.globals, &processor, &naming::synthetic(&format!("processor:{}", service.name)))?;

        scope.services.push(Service {
            ast: service.clone(),
            name,
            client: client.into(),
            processor: processor.into(),
            functions,
            base: None,
        });
        Ok(())
    }

    /// Name a structure and its fields, detect expansions, and list it.
    ///
    /// Returns the structure's allocated identifier.
    fn build_struct_like(
        &self,
        scope: &mut Scope,
        diags: &mut DiagnosticCollector,
        st: &StructLike,
        synthesized: bool,
    ) -> Result<SmolStr, BuildError> {
        let file: SmolStr = scope.filename().into();
        let name = self.declared_name(scope, &st.name, synthesized)?;
        let constructor = format!("New{name}");
        let field_id_table = format!("fieldIDToName_{name}");
        reserve(&file, &mut scope.globals, &constructor, &naming::synthetic(&format!("new:{}", st.name)))?;
        reserve(&file, &mut scope.globals, &field_id_table, &naming::synthetic(&format!("ids:{}", st.name)))?;

        let Some(kind) = StructKind::from_category(&st.category) else {
            diags.unknown_category(&file, &st.name, &st.category);
            return Ok(name);
        };
        if !synthesized {
            scope.decls.insert(
                st.name.clone(),
                Declared {
                    name: name.clone(),
                    kind: DeclKind::Structure(kind),
                },
            );
        }

        report_flags(diags, &file, &st.name, &st.annotations, &[EXPANDABLE_ANNOTATION, ALIAS_ANNOTATION]);

        let mut members = Namespace::new();
        let methods = self.reserve_methods(&file, &mut members, kind, synthesized)?;

        let factory = FieldFactory {
            features: self.features,
            target: self.target,
            file: &file,
        };

        // Accessors first, so storage names never take an accessor's name.
        let accessors = st
            .fields
            .iter()
            .map(|f| {
                let stem = factory.stem(f)?;
                Ok(factory.reserve_accessors(&mut members, f, &f.name, &stem))
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        let ctx = Context::local(scope);
        let mut fields = Vec::with_capacity(st.fields.len());
        for (f, accessors) in st.fields.iter().zip(accessors) {
            let owner = format!("{}.{}", st.name, f.name);
            report_flags(diags, &file, &owner, &f.annotations, &[EXPAND_ANNOTATION, NESTED_ANNOTATION]);

            let mut field = factory.declared(&mut members, f, accessors)?;
            let referenced = if f.field_type.category.is_struct_like() {
                resolve_struct_reference(&ctx, &f.field_type)
            } else {
                None
            };
            if let Some(referenced) = referenced.filter(|r| should_expand(f, Some(r.ast))) {
                field.expanded = build_expanded_fields(&factory, &mut members, &st.name, f, &referenced)?;
                field.is_expandable = true;
                tracing::debug!(
                    file = %file,
                    structure = %st.name,
                    field = %f.name,
                    into = %referenced.ast.name,
                    count = field.expanded.len(),
                    "expanded field"
                );
            }
            fields.push(field);
        }

        check_expanded_ids(&file, &st.name, &fields)?;

        if self.features.reorder_fields && !synthesized {
            if let Some((before, after)) = reorder_fields(&mut fields) {
                diags.add(
                    Diagnostic::info(
                        file.clone(),
                        format!("arranged fields of '{}': {before} -> {after} bytes", st.name),
                    )
                    .with_code(codes::FIELDS_REORDERED)
                    .with_owner(st.name.clone()),
                );
            }
        }

        if let Some(record) = ExpansionRecord::from_fields(&fields) {
            scope.expansions.entry(st.name.clone()).or_insert(record);
        }

        let structure = Structure {
            ast: st.clone(),
            name: name.clone(),
            kind,
            constructor: constructor.into(),
            field_id_table: field_id_table.into(),
            methods,
            members,
            fields,
            is_alias: self.features.no_alias_type_reflection_method
                && Flag::read(&st.annotations, ALIAS_ANNOTATION).is_true(),
            synthesized,
        };
        let list = match (synthesized, kind) {
            (true, _) => &mut scope.synthesized,
            (false, StructKind::Struct) => &mut scope.structs,
            (false, StructKind::Union) => &mut scope.unions,
            (false, StructKind::Exception) => &mut scope.exceptions,
        };
        list.push(structure);
        Ok(name)
    }

    /// Reserve the structure's built-in method names.
    fn reserve_methods(
        &self,
        file: &str,
        members: &mut Namespace,
        kind: StructKind,
        synthesized: bool,
    ) -> Result<Vec<SmolStr>, BuildError> {
        let mut methods = vec!["Read", "Write", "String"];
        if !synthesized {
            if kind == StructKind::Union {
                methods.push("CountSetFields");
            }
            if kind == StructKind::Exception {
                methods.push("Error");
            }
            if self.features.keep_unknown_fields {
                methods.push("CarryingUnknownFields");
            }
            if self.features.gen_deep_equal {
                methods.push("DeepEqual");
            }
        }
        methods
            .into_iter()
            .map(|m| {
                reserve(file, members, m, &naming::synthetic(&format!("method:{m}")))?;
                Ok(SmolStr::new(m))
            })
            .collect()
    }

    fn build_enum(&self, scope: &mut Scope, enumeration: &ast::Enum) -> Result<(), BuildError> {
        let name = self.declared_name(scope, &enumeration.name, false)?;
        scope.decls.insert(
            enumeration.name.clone(),
            Declared {
                name: name.clone(),
                kind: DeclKind::Enum,
            },
        );

        let mut names = Namespace::new();
        let values = enumeration
            .values
            .iter()
            .map(|v| {
                let value_name = names.add(&format!("{name}_{}", v.name), &v.name);
                let literal = if self.features.typed_enum_string {
                    value_name.clone()
                } else {
                    v.name.clone()
                };
                EnumValue {
                    ast: v.clone(),
                    name: value_name,
                    literal,
                }
            })
            .collect();

        scope.enums.push(Enum {
            ast: enumeration.clone(),
            name,
            values,
        });
        Ok(())
    }

    fn build_typedef(&self, scope: &mut Scope, typedef: &ast::Typedef) -> Result<(), BuildError> {
        let file: SmolStr = scope.filename().into();
        let name = self.declared_name(scope, &typedef.alias, false)?;
        if typedef.target.category.is_struct_like() {
            let constructor = format!("New{name}");
            reserve(&file, &mut scope.globals, &constructor, &naming::synthetic(&format!("new:{}", typedef.alias)))?;
        }
        scope.decls.insert(
            typedef.alias.clone(),
            Declared {
                name: name.clone(),
                kind: DeclKind::Typedef,
            },
        );
        scope.typedefs.push(Typedef {
            ast: typedef.clone(),
            name,
            type_name: TypeName::default(),
        });
        Ok(())
    }
}

// ============================================================================
// FIELDS
// ============================================================================

/// Accessor names of one field.
#[derive(Debug)]
pub(crate) struct Accessors {
    getter: SmolStr,
    setter: Option<SmolStr>,
    isset: Option<SmolStr>,
    reader: SmolStr,
    writer: SmolStr,
    deep_equal: Option<SmolStr>,
}

/// Allocates field names inside one structure's namespace.
pub(crate) struct FieldFactory<'b> {
    features: &'b Features,
    target: &'b dyn Target,
    file: &'b str,
}

impl FieldFactory<'_> {
    pub(crate) fn file(&self) -> &str {
        self.file
    }

    fn is_nested(&self, f: &ast::Field) -> bool {
        self.features.enable_nested_struct
            && f.field_type.category.is_struct_like()
            && Flag::read(&f.annotations, NESTED_ANNOTATION).is_true()
    }

    /// Identifier stem of the field's accessors.
    fn stem(&self, f: &ast::Field) -> Result<String, BuildError> {
        if self.is_nested(f) {
            let (_, bare) = f.field_type.split_name();
            identify(self.file, bare)
        } else {
            identify(self.file, &f.name)
        }
    }

    fn reserve_accessors(&self, members: &mut Namespace, f: &ast::Field, key: &str, stem: &str) -> Accessors {
        let key_for = |kind: &str| naming::synthetic(&format!("{kind}:{key}"));
        let id = naming::id_suffix(f.id);
        let has_isset = f.requiredness == Requiredness::Optional || f.field_type.category.is_struct_like();

        let getter = members.add(&format!("Get{stem}"), &key_for("get"));
        let setter = self
            .features
            .generate_setter
            .then(|| members.add(&format!("Set{stem}"), &key_for("set")));
        let isset = has_isset.then(|| members.add(&format!("IsSet{stem}"), &key_for("isset")));
        let reader = members.add(&format!("ReadField{id}"), &key_for("read"));
        let writer = members.add(&format!("writeField{id}"), &key_for("write"));
        let deep_equal = self
            .features
            .gen_deep_equal
            .then(|| members.add(&format!("Field{id}DeepEqual"), &key_for("deepequal")));

        Accessors {
            getter,
            setter,
            isset,
            reader,
            writer,
            deep_equal,
        }
    }

    /// A declared field; accessors were reserved beforehand.
    pub(crate) fn declared(
        &self,
        members: &mut Namespace,
        f: &ast::Field,
        accessors: Accessors,
    ) -> Result<Field, BuildError> {
        self.field(members, f.clone(), &f.name, accessors, None)
    }

    /// A field inlined from `origin` into `structure` in place of `parent`.
    pub(crate) fn expanded(
        &self,
        members: &mut Namespace,
        structure: &str,
        parent: &ast::Field,
        adjusted: ast::Field,
        origin: FieldOrigin,
    ) -> Result<Field, BuildError> {
        let key = format!("{}.{}", parent.name, origin.original.name);
        let stem = self.stem(&adjusted)?;
        let accessors = self.reserve_accessors(members, &adjusted, &key, &stem);
        tracing::trace!(
            file = self.file,
            structure,
            field = %key,
            id = adjusted.id,
            "allocated expanded field"
        );
        self.field(members, adjusted, &naming::synthetic(&format!("expand:{key}")), accessors, Some(origin))
    }

    fn field(
        &self,
        members: &mut Namespace,
        f: ast::Field,
        key: &str,
        accessors: Accessors,
        origin: Option<FieldOrigin>,
    ) -> Result<Field, BuildError> {
        let display_name = origin
            .as_ref()
            .map(|o| o.original.name.clone())
            .unwrap_or_else(|| f.name.clone());
        let is_nested = self.is_nested(&f);
        let candidate = if is_nested {
            self.stem(&f)?
        } else {
            identify(self.file, &display_name)?
        };
        let name = members.add(&candidate, key);

        let tags = if self.features.gen_binding_tags {
            let requiredness = match f.requiredness {
                Requiredness::Default => "",
                Requiredness::Required => "required",
                Requiredness::Optional => "optional",
            };
            self.target.binding_tags(
                &display_name,
                f.id,
                requiredness,
                f.requiredness == Requiredness::Optional,
            )
        } else {
            None
        };

        Ok(Field {
            property_name: self.property_name(&display_name),
            display_name,
            name,
            getter: accessors.getter,
            setter: accessors.setter,
            isset: accessors.isset,
            reader: accessors.reader,
            writer: accessors.writer,
            deep_equal: accessors.deep_equal,
            is_nested,
            is_response: false,
            is_expandable: false,
            expanded: Vec::new(),
            origin,
            tags,
            type_name: TypeName::default(),
            default_type_name: TypeName::default(),
            default_value: Code::default(),
            has_default: f.default.is_some(),
            ast: f,
        })
    }

    fn property_name(&self, source: &str) -> SmolStr {
        match self.features.property_naming {
            PropertyNaming::Original => source.into(),
            PropertyNaming::SnakeCase => naming::snakify(source).into(),
            PropertyNaming::LowerCamelCase => naming::lower_camel_case(source).into(),
        }
    }
}

// ============================================================================
// SERVICE FUNCTIONS
// ============================================================================

const SUCCESS_FIELD: &str = "success";

/// `$<Service>_<function>_args`: the function's arguments as a structure.
fn synthesized_args(service: &ast::Service, function: &ast::Function) -> StructLike {
    let mut args = StructLike::new("struct", &naming::synthetic(&format!("{}_{}_args", service.name, function.name)));
    args.fields = function.arguments.clone();
    args.expandable = Some(false);
    args
}

/// `$<Service>_<function>_result`: response and declared exceptions, all
/// optional. Oneway functions have none.
fn synthesized_result(service: &ast::Service, function: &ast::Function) -> Option<StructLike> {
    if function.oneway {
        return None;
    }
    let mut result = StructLike::new("struct", &naming::synthetic(&format!("{}_{}_result", service.name, function.name)));
    result.expandable = Some(false);
    if !function.void {
        result
            .fields
            .push(ast::Field::new(0, SUCCESS_FIELD, function.function_type.clone()).optional());
    }
    result
        .fields
        .extend(function.throws.iter().map(|t| t.clone().optional()));
    Some(result)
}

/// Allocate the function's parameter namespace: receiver, context and error
/// slots first, then arguments and exceptions.
fn function_params(file: &str, function: &ast::Function) -> Result<(Namespace, Vec<Param>, Vec<Param>), BuildError> {
    let mut params = Namespace::new();
    let mut fixed = vec![("p", "$receiver"), ("ctx", "$ctx"), ("err", "$err")];
    if !function.void {
        fixed.extend([("r", "$r"), ("_result", "$result")]);
    }
    for (name, key) in fixed {
        reserve(file, &mut params, name, key)?;
    }

    let mut param = |f: &ast::Field, key: String| -> Result<Param, BuildError> {
        let candidate = naming::parameter_name(&identify(file, &f.name)?);
        Ok(Param {
            name: params.add(&candidate, &key),
            source: f.name.clone(),
            type_name: TypeName::default(),
        })
    };
    let arguments = function
        .arguments
        .iter()
        .map(|a| param(a, a.name.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    let throws = function
        .throws
        .iter()
        .map(|t| param(t, naming::synthetic(&format!("throw:{}", t.name))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((params, arguments, throws))
}

// ============================================================================
// HELPERS
// ============================================================================

fn identify(file: &str, raw: &str) -> Result<String, BuildError> {
    naming::identify(raw).map_err(|err| BuildError::InvalidIdentifier {
        file: file.into(),
        raw: err.0.into(),
    })
}

fn reserve(file: &str, ns: &mut Namespace, name: &str, key: &str) -> Result<(), BuildError> {
    ns.must_reserve(name, key)
        .map_err(|source: NameConflict| BuildError::NameConflict {
            file: file.into(),
            source,
        })
}

/// Record boolean annotations given several values.
fn report_flags(diags: &mut DiagnosticCollector, file: &str, owner: &str, annotations: &Annotations, keys: &[&str]) {
    for key in keys {
        if let Flag::Ambiguous(count) = Flag::read(annotations, key) {
            diags.multiple_values(file, owner, key, count);
        }
    }
}

/// Reject recognized boolean annotations whose value is neither `true` nor
/// `false`.
fn check_option_grammar(ast: &Thrift) -> Result<(), BuildError> {
    let check = |owner: &str, annotations: &Annotations, keys: &[&str]| -> Result<(), BuildError> {
        for key in keys {
            for value in annotations.get(key).unwrap_or_default() {
                if !value.eq_ignore_ascii_case("true") && !value.eq_ignore_ascii_case("false") {
                    return Err(BuildError::AnnotationGrammar {
                        file: ast.filename.clone(),
                        owner: owner.into(),
                        key: (*key).into(),
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    };

    for st in ast.struct_likes() {
        check(&st.name, &st.annotations, &[EXPANDABLE_ANNOTATION, ALIAS_ANNOTATION])?;
        for f in &st.fields {
            check(&format!("{}.{}", st.name, f.name), &f.annotations, &[EXPAND_ANNOTATION, NESTED_ANNOTATION])?;
        }
    }
    Ok(())
}

// ============================================================================
// FIELD LAYOUT
// ============================================================================

/// Size and alignment of a field in generated Go structs.
fn field_layout(field: &Field) -> (usize, usize) {
    let category = field.ast.field_type.category;
    let size = match category {
        _ if field.is_optional() && (category.is_base() && category != Category::Binary) => 8,
        Category::Bool | Category::Byte | Category::I8 => 1,
        Category::I16 => 2,
        Category::I32 => 4,
        Category::I64 | Category::Double | Category::Enum => 8,
        Category::String => 16,
        Category::Binary | Category::List | Category::Set => 24,
        _ => 8,
    };
    (size, size.min(8))
}

fn struct_size(fields: &[Field]) -> usize {
    let mut offset = 0usize;
    let mut max_align = 1usize;
    for field in fields {
        let (size, align) = field_layout(field);
        offset = offset.next_multiple_of(align) + size;
        max_align = max_align.max(align);
    }
    offset.next_multiple_of(max_align)
}

/// Order fields by decreasing alignment, keeping declaration order within a
/// class. Returns the sizes before and after when the order changed.
fn reorder_fields(fields: &mut [Field]) -> Option<(usize, usize)> {
    let before = struct_size(fields);
    let original: Vec<i32> = fields.iter().map(Field::id).collect();
    fields.sort_by_key(|f| Reverse(field_layout(f).1));
    let changed = fields.iter().map(Field::id).ne(original);
    changed.then(|| (before, struct_size(fields)))
}
