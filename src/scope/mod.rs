//! Scopes: the resolved, name-assigned view of one IDL file.
//!
//! A [`Scope`] is built once per file by [`ScopeBuilder`], memoised in a
//! [`ScopeCache`], and read-only afterwards. It owns:
//!
//! - allocated identifiers for every declaration (see [`Namespace`])
//! - the file's includes, each pointing at the included file's scope
//! - resolved type names for every field, typedef and constant
//! - expansion records for structures that inline other structures
//!
//! ## Build pipeline
//!
//! ```text
//! includes → names (services, structures, enums, typedefs, constants)
//!          → expansion (per field, while naming)
//!          → type/value resolution (rayon)
//!          → unused-import pruning
//!          → service bases, function signatures
//! ```

pub mod diagnostics;

mod builder;
mod cache;
mod expand;
mod imports;
mod prune;
mod reference;
mod types;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::ast::{self, Category, StructLike, Thrift};
use crate::base::{FileId, Namespace};
use crate::target::{Package, Target};

pub use builder::ScopeBuilder;
pub use cache::ScopeCache;
pub use diagnostics::{Diagnostic, Severity};
pub use expand::{
    adjusted_id, should_expand, struct_is_expandable, Expansion, ExpansionRecord, Flag, ALIAS_ANNOTATION,
    EXPANDABLE_ANNOTATION, EXPAND_ANNOTATION, ID_OFFSET, NESTED_ANNOTATION,
};
pub use imports::{Import, ImportManager};
pub use reference::{locate_declaration, resolve_struct_reference, Context, Located, StructRef};
pub use types::{resolve_type, Code, TypeExpr, TypeName};

// ============================================================================
// HOMES & INCLUDES
// ============================================================================

/// The file a declaration lives in, seen from the file being built.
#[derive(Clone)]
pub enum Home {
    /// The file being built.
    Local,
    /// An already built file.
    Foreign(Arc<Scope>),
}

impl Home {
    pub fn scope(&self) -> Option<&Arc<Scope>> {
        match self {
            Home::Local => None,
            Home::Foreign(scope) => Some(scope),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Home::Local)
    }
}

impl fmt::Debug for Home {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Home::Local => f.write_str("Local"),
            Home::Foreign(scope) => write!(f, "Foreign({})", scope.filename()),
        }
    }
}

impl PartialEq for Home {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Home::Local, Home::Local) => true,
            (Home::Foreign(a), Home::Foreign(b)) => a.file() == b.file(),
            _ => false,
        }
    }
}

/// An included file as seen from the including file.
#[derive(Clone)]
pub struct Include {
    /// Import alias in the including file (the included file's own package
    /// alias when both share a package).
    pub package_name: SmolStr,
    /// Import path as written in the including file.
    pub import_path: SmolStr,
    /// The include's file stem; IDL sources qualify names with it.
    pub idl_name: SmolStr,
    /// The included file's declared namespace.
    pub namespace: SmolStr,
    /// Whether both files land in the same output package.
    pub same_package: bool,
    pub scope: Arc<Scope>,
}

impl Include {
    /// Whether an IDL qualifier refers to this include.
    pub fn matches_qualifier(&self, qualifier: &str) -> bool {
        self.idl_name == qualifier || self.package_name == qualifier || self.namespace == qualifier
    }
}

impl fmt::Debug for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Include")
            .field("package_name", &self.package_name)
            .field("import_path", &self.import_path)
            .field("same_package", &self.same_package)
            .finish()
    }
}

// ============================================================================
// STRUCTURES & FIELDS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructKind {
    Struct,
    Union,
    Exception,
}

impl StructKind {
    pub fn from_category(category: &str) -> Option<Self> {
        match category {
            "struct" => Some(StructKind::Struct),
            "union" => Some(StructKind::Union),
            "exception" => Some(StructKind::Exception),
            _ => None,
        }
    }

    pub fn category(self) -> Category {
        match self {
            StructKind::Struct => Category::Struct,
            StructKind::Union => Category::Union,
            StructKind::Exception => Category::Exception,
        }
    }
}

/// Where an expanded field came from.
#[derive(Clone, Debug)]
pub struct FieldOrigin {
    /// The child field as declared, with its original id.
    pub original: ast::Field,
    /// Source name of the parent field that was expanded.
    pub parent_field: SmolStr,
    /// The file declaring the expanded structure.
    pub home: Home,
}

/// A structure field with its allocated names and resolved types.
#[derive(Clone, Debug)]
pub struct Field {
    /// The source field; for expanded fields a copy carrying the adjusted id.
    pub ast: ast::Field,
    /// Storage identifier.
    pub name: SmolStr,
    /// Name shown to users (the source name).
    pub display_name: SmolStr,
    pub property_name: SmolStr,
    pub getter: SmolStr,
    pub setter: Option<SmolStr>,
    pub isset: Option<SmolStr>,
    pub reader: SmolStr,
    pub writer: SmolStr,
    pub deep_equal: Option<SmolStr>,
    pub is_nested: bool,
    /// The `success` field of a synthesized result structure.
    pub is_response: bool,
    /// The field is replaced by [`Field::expanded`] in generated code.
    pub is_expandable: bool,
    pub expanded: Vec<Field>,
    pub origin: Option<FieldOrigin>,
    pub tags: Option<SmolStr>,
    pub type_name: TypeName,
    pub default_type_name: TypeName,
    pub default_value: Code,
    pub has_default: bool,
}

impl Field {
    pub fn id(&self) -> i32 {
        self.ast.id
    }

    pub fn is_optional(&self) -> bool {
        self.ast.requiredness == ast::Requiredness::Optional
    }

    /// Accessor names allocated for this field.
    pub fn accessors(&self) -> impl Iterator<Item = &SmolStr> {
        [Some(&self.getter), self.setter.as_ref(), self.isset.as_ref()]
            .into_iter()
            .flatten()
            .chain([&self.reader, &self.writer])
            .chain(self.deep_equal.as_ref())
    }
}

/// A struct, union or exception, declared or synthesized for a function.
#[derive(Clone, Debug)]
pub struct Structure {
    pub ast: StructLike,
    pub name: SmolStr,
    pub kind: StructKind,
    /// `New<Name>`, reserved in the file's globals.
    pub constructor: SmolStr,
    /// `fieldIDToName_<Name>`, reserved in the file's globals.
    pub field_id_table: SmolStr,
    /// Built-in methods reserved before any field accessor.
    pub methods: Vec<SmolStr>,
    pub members: Namespace,
    pub fields: Vec<Field>,
    pub is_alias: bool,
    pub synthesized: bool,
}

impl Structure {
    /// Look up a declared field by source name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.ast.name == name)
    }

    /// Declared fields followed by their expansions, in declaration order.
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .flat_map(|f| std::iter::once(f).chain(f.expanded.iter()))
    }

    /// Fields as generated code sees them: expanded fields replace their parent.
    pub fn flattened_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().flat_map(|f| {
            let own = (!f.is_expandable).then_some(f);
            own.into_iter().chain(f.expanded.iter())
        })
    }
}

// ============================================================================
// OTHER DECLARATIONS
// ============================================================================

#[derive(Clone, Debug)]
pub struct EnumValue {
    pub ast: ast::EnumValue,
    /// `<Enum>_<VALUE>`.
    pub name: SmolStr,
    /// How the value is spelled in string conversions.
    pub literal: SmolStr,
}

#[derive(Clone, Debug)]
pub struct Enum {
    pub ast: ast::Enum,
    pub name: SmolStr,
    pub values: Vec<EnumValue>,
}

impl Enum {
    pub fn value(&self, source: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.ast.name == source)
    }
}

#[derive(Clone, Debug)]
pub struct Typedef {
    pub ast: ast::Typedef,
    pub name: SmolStr,
    pub type_name: TypeName,
}

#[derive(Clone, Debug)]
pub struct Constant {
    pub ast: ast::Constant,
    pub name: SmolStr,
    pub type_name: TypeName,
    pub init: Code,
}

/// A function argument or declared exception with its resolved type.
#[derive(Clone, Debug)]
pub struct Param {
    /// Name in the function's parameter namespace.
    pub name: SmolStr,
    pub source: SmolStr,
    pub type_name: TypeName,
}

#[derive(Clone, Debug)]
pub struct Function {
    pub ast: ast::Function,
    pub name: SmolStr,
    /// Parameter namespace: receiver, context, arguments and throws.
    pub params: Namespace,
    /// Allocated name of the synthesized argument structure.
    pub args_struct: SmolStr,
    /// Allocated name of the synthesized result structure (none when oneway).
    pub result_struct: Option<SmolStr>,
    pub arguments: Vec<Param>,
    pub response: Option<TypeName>,
    pub throws: Vec<Param>,
}

/// A service's resolved base service.
#[derive(Clone, Debug)]
pub struct ServiceRef {
    pub name: SmolStr,
    pub qualifier: Option<SmolStr>,
    pub home: Home,
}

#[derive(Clone, Debug)]
pub struct Service {
    pub ast: ast::Service,
    pub name: SmolStr,
    pub client: SmolStr,
    pub processor: SmolStr,
    pub functions: Vec<Function>,
    pub base: Option<ServiceRef>,
}

/// Kind of a top-level declaration, as recorded in a file's declaration table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Structure(StructKind),
    Enum,
    Typedef,
    Constant,
    Service,
}

/// A top-level declaration: allocated name and kind, keyed by source name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declared {
    pub name: SmolStr,
    pub kind: DeclKind,
}

// ============================================================================
// SCOPE
// ============================================================================

/// The resolved view of one IDL file.
pub struct Scope {
    file: FileId,
    ast: Arc<Thrift>,
    package: Package,
    /// Index-stable: position `i` is `ast.includes[i]`, `None` when unused.
    /// Includes discovered during resolution are appended.
    includes: Vec<Option<Include>>,
    imports: ImportManager,
    globals: Namespace,
    decls: IndexMap<SmolStr, Declared>,
    structs: Vec<Structure>,
    unions: Vec<Structure>,
    exceptions: Vec<Structure>,
    synthesized: Vec<Structure>,
    enums: Vec<Enum>,
    typedefs: Vec<Typedef>,
    constants: Vec<Constant>,
    services: Vec<Service>,
    expansions: IndexMap<SmolStr, ExpansionRecord>,
    diagnostics: Vec<Diagnostic>,
}

impl Scope {
    fn new(file: FileId, ast: Arc<Thrift>, package: Package) -> Self {
        Self {
            file,
            ast,
            package,
            includes: Vec::new(),
            imports: ImportManager::new(),
            globals: Namespace::new(),
            decls: IndexMap::new(),
            structs: Vec::new(),
            unions: Vec::new(),
            exceptions: Vec::new(),
            synthesized: Vec::new(),
            enums: Vec::new(),
            typedefs: Vec::new(),
            constants: Vec::new(),
            services: Vec::new(),
            expansions: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn filename(&self) -> &str {
        &self.ast.filename
    }

    pub fn ast(&self) -> &Arc<Thrift> {
        &self.ast
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Declared namespace, or the file stem.
    pub fn namespace(&self) -> &str {
        &self.package.namespace
    }

    pub fn import_path(&self) -> &str {
        &self.package.import_path
    }

    pub fn import_package(&self) -> &str {
        &self.package.alias
    }

    pub fn includes(&self) -> &[Option<Include>] {
        &self.includes
    }

    pub fn imports(&self) -> &ImportManager {
        &self.imports
    }

    /// Whether the include's import survived pruning.
    pub fn is_include_used(&self, include: &Include) -> bool {
        include.same_package || self.imports.is_used(&include.import_path)
    }

    pub fn globals(&self) -> &Namespace {
        &self.globals
    }

    /// A top-level declaration by source name.
    pub fn declaration(&self, source: &str) -> Option<&Declared> {
        self.decls.get(source)
    }

    pub fn structs(&self) -> &[Structure] {
        &self.structs
    }

    pub fn unions(&self) -> &[Structure] {
        &self.unions
    }

    pub fn exceptions(&self) -> &[Structure] {
        &self.exceptions
    }

    /// Argument and result structures of service functions.
    pub fn synthesized(&self) -> &[Structure] {
        &self.synthesized
    }

    /// Structs, unions and exceptions.
    pub fn struct_likes(&self) -> impl Iterator<Item = &Structure> {
        self.structs
            .iter()
            .chain(self.unions.iter())
            .chain(self.exceptions.iter())
    }

    /// Every structure including synthesized ones.
    pub fn all_structures(&self) -> impl Iterator<Item = &Structure> {
        self.struct_likes().chain(self.synthesized.iter())
    }

    /// A structure by source name (or synthetic key for synthesized ones).
    pub fn structure(&self, name: &str) -> Option<&Structure> {
        self.all_structures().find(|s| s.ast.name == name)
    }

    pub fn enums(&self) -> &[Enum] {
        &self.enums
    }

    pub fn enumeration(&self, source: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.ast.name == source)
    }

    pub fn typedefs(&self) -> &[Typedef] {
        &self.typedefs
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn service(&self, source: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.ast.name == source)
    }

    /// The expansion record of a structure, if any of its fields expand.
    pub fn expansion(&self, structure: &str) -> Option<Expansion<'_>> {
        let record = self.expansions.get(structure)?;
        let structure = self.structure(structure)?;
        Some(Expansion::new(record, structure))
    }

    pub fn is_field_expanded(&self, structure: &str, field: &str) -> bool {
        self.expansions
            .get(structure)
            .is_some_and(|r| r.is_expanded(field))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Import alias for a foreign home, adding the include when the file is
    /// not included yet. Same-package homes are not qualified.
    fn use_home(&mut self, home: &Home, target: &dyn Target) -> Option<SmolStr> {
        let scope = home.scope()?;
        if scope.import_path() == self.import_path() {
            return None;
        }
        let path = target.import_path(&self.package, scope.package());
        if let Some(alias) = self.imports.alias(&path).cloned() {
            self.imports.mark_used(&path);
            return Some(alias);
        }
        let include = self.include_scope(Arc::clone(scope), target);
        tracing::debug!(
            file = %self.filename(),
            include = %include.import_path,
            alias = %include.package_name,
            "appended include for foreign type"
        );
        let alias = include.package_name.clone();
        self.includes.push(Some(include));
        Some(alias)
    }

    /// Describe `scope` as an include of this file, registering its import.
    fn include_scope(&mut self, scope: Arc<Scope>, target: &dyn Target) -> Include {
        let same_package = scope.import_path() == self.import_path();
        let import_path = target.import_path(&self.package, scope.package());
        let package_name = if same_package {
            SmolStr::from(scope.import_package())
        } else {
            self.imports.add(scope.import_package(), &import_path)
        };
        Include {
            package_name,
            import_path,
            idl_name: scope.ast.idl_name().into(),
            namespace: scope.namespace().into(),
            same_package,
            scope,
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("file", &self.file)
            .field("filename", &self.filename())
            .field("namespace", &self.namespace())
            .field("includes", &self.includes.len())
            .field("structures", &self.all_structures().count())
            .field("enums", &self.enums.len())
            .field("services", &self.services.len())
            .finish()
    }
}
