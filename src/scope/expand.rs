//! Field expansion: inlining a referenced structure's fields into the parent.
//!
//! A struct-typed field expands when it is annotated `thrift.expand="true"`
//! or when the structure it references is expandable. Each child field of the
//! referenced structure becomes a field of the parent with the id
//! `child.id + parent.id * ID_OFFSET` and accessor names allocated in the
//! parent's namespace. Expansion is one level deep.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::builder::FieldFactory;
use super::reference::StructRef;
use super::{Field, FieldOrigin, Structure};
use crate::ast::{self, Annotations, StructLike};
use crate::base::Namespace;
use crate::error::BuildError;

/// Field annotation forcing expansion.
pub const EXPAND_ANNOTATION: &str = "thrift.expand";
/// Structure annotation marking every reference to it as expanding.
pub const EXPANDABLE_ANNOTATION: &str = "expandable";
pub const NESTED_ANNOTATION: &str = "thrift.nested";
pub const ALIAS_ANNOTATION: &str = "thrift.is_alias";

/// Multiplier applied to the parent field id when numbering expanded fields.
pub const ID_OFFSET: i32 = 1000;

// ============================================================================
// FLAGS
// ============================================================================

/// A boolean annotation as written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Unset,
    True,
    False,
    /// Several values were given; treated as false.
    Ambiguous(usize),
}

impl Flag {
    pub fn read(annotations: &Annotations, key: &str) -> Self {
        match annotations.get(key) {
            None | Some([]) => Flag::Unset,
            Some([value]) if value.eq_ignore_ascii_case("true") => Flag::True,
            Some([_]) => Flag::False,
            Some(values) => Flag::Ambiguous(values.len()),
        }
    }

    pub fn is_true(self) -> bool {
        self == Flag::True
    }
}

/// Whether references to `st` expand by default.
pub fn struct_is_expandable(st: &StructLike) -> bool {
    st.expandable
        .unwrap_or_else(|| Flag::read(&st.annotations, EXPANDABLE_ANNOTATION).is_true())
}

/// Whether `field` expands, given the structure its type resolved to.
///
/// Explicit annotation and expandable target are independent: either is
/// enough. Unresolved references never expand.
pub fn should_expand(field: &ast::Field, referenced: Option<&StructLike>) -> bool {
    if !field.field_type.category.is_struct_like() {
        return false;
    }
    let Some(referenced) = referenced else {
        return false;
    };
    Flag::read(&field.annotations, EXPAND_ANNOTATION).is_true() || struct_is_expandable(referenced)
}

/// Id of an expanded field, `None` on overflow.
pub fn adjusted_id(child: i32, parent: i32) -> Option<i32> {
    parent.checked_mul(ID_OFFSET)?.checked_add(child)
}

// ============================================================================
// EXPANDED FIELDS
// ============================================================================

/// Synthesize the expanded fields of `parent` from `referenced`.
pub(crate) fn build_expanded_fields(
    factory: &FieldFactory<'_>,
    members: &mut Namespace,
    structure: &str,
    parent: &ast::Field,
    referenced: &StructRef<'_>,
) -> Result<Vec<Field>, BuildError> {
    referenced
        .ast
        .fields
        .iter()
        .map(|child| {
            let id = adjusted_id(child.id, parent.id).ok_or_else(|| BuildError::ExpandedIdOverflow {
                file: factory.file().into(),
                structure: structure.into(),
                field: child.name.clone(),
            })?;
            let mut adjusted = child.clone();
            adjusted.id = id;
            let origin = FieldOrigin {
                original: child.clone(),
                parent_field: parent.name.clone(),
                home: referenced.home.clone(),
            };
            factory.expanded(members, structure, parent, adjusted, origin)
        })
        .collect()
}

/// Reject expanded ids that reuse a declared or another expanded id.
///
/// An expanded field is replaced by its children, so its own id is free.
pub(crate) fn check_expanded_ids(file: &str, structure: &str, fields: &[Field]) -> Result<(), BuildError> {
    let mut seen: FxHashSet<i32> = fields.iter().filter(|f| !f.is_expandable).map(Field::id).collect();
    for expanded in fields.iter().flat_map(|f| f.expanded.iter()) {
        if !seen.insert(expanded.id()) {
            return Err(BuildError::ExpandedIdCollision {
                file: file.into(),
                structure: structure.into(),
                field: expanded.display_name.clone(),
                id: expanded.id(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// EXPANSION RECORDS
// ============================================================================

/// Which fields of one structure were expanded, by source name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionRecord {
    expanded: IndexMap<SmolStr, bool>,
}

impl ExpansionRecord {
    /// The record of a structure's fields, or `None` when nothing expanded.
    pub(crate) fn from_fields(fields: &[Field]) -> Option<Self> {
        if !fields.iter().any(|f| f.is_expandable) {
            return None;
        }
        let expanded = fields
            .iter()
            .map(|f| (f.ast.name.clone(), f.is_expandable))
            .collect();
        Some(Self { expanded })
    }

    pub fn is_expanded(&self, field: &str) -> bool {
        self.expanded.get(field).copied().unwrap_or(false)
    }

    /// `(field, expanded)` pairs in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&SmolStr, bool)> {
        self.expanded.iter().map(|(name, &flag)| (name, flag))
    }
}

/// Expansion lookup result: the record plus the structure it describes.
#[derive(Clone, Copy, Debug)]
pub struct Expansion<'s> {
    record: &'s ExpansionRecord,
    structure: &'s Structure,
}

impl<'s> Expansion<'s> {
    pub(crate) fn new(record: &'s ExpansionRecord, structure: &'s Structure) -> Self {
        Self { record, structure }
    }

    pub fn record(&self) -> &'s ExpansionRecord {
        self.record
    }

    pub fn is_expanded(&self, field: &str) -> bool {
        self.record.is_expanded(field)
    }

    /// All expanded fields of the structure, in declaration order.
    pub fn fields(&self) -> Vec<&'s Field> {
        self.structure
            .fields
            .iter()
            .filter(|f| f.is_expandable)
            .flat_map(|f| f.expanded.iter())
            .collect()
    }

    /// Expanded fields replacing one declared field.
    pub fn fields_of(&self, field: &str) -> &'s [Field] {
        self.structure
            .field(field)
            .map(|f| f.expanded.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Category, Type};
    use rstest::rstest;

    #[rstest]
    #[case(&["true"], Flag::True)]
    #[case(&["TRUE"], Flag::True)]
    #[case(&["false"], Flag::False)]
    #[case(&["yes"], Flag::False)]
    #[case(&["true", "true"], Flag::Ambiguous(2))]
    fn test_flag_read(#[case] values: &[&str], #[case] expected: Flag) {
        let mut annos = Annotations::new();
        for v in values {
            annos.push(EXPAND_ANNOTATION, v);
        }
        assert_eq!(Flag::read(&annos, EXPAND_ANNOTATION), expected);
        assert_eq!(Flag::read(&annos, "other"), Flag::Unset);
    }

    #[test]
    fn test_struct_is_expandable_prefers_flag() {
        let st = StructLike::new("struct", "Base").with_annotation(EXPANDABLE_ANNOTATION, "true");
        assert!(struct_is_expandable(&st));
        assert!(!struct_is_expandable(&st.clone().expandable(false)));
        assert!(struct_is_expandable(&StructLike::new("struct", "B").expandable(true)));
    }

    #[test]
    fn test_should_expand_is_an_or() {
        let plain = StructLike::new("struct", "Plain");
        let expandable = StructLike::new("struct", "Base").expandable(true);
        let field = ast::Field::new(1, "base", Type::named("Base", Category::Struct));
        let annotated = field.clone().with_annotation(EXPAND_ANNOTATION, "true");

        assert!(should_expand(&field, Some(&expandable)));
        assert!(should_expand(&annotated, Some(&plain)));
        assert!(!should_expand(&field, Some(&plain)));
        assert!(!should_expand(&annotated, None));

        let scalar = ast::Field::new(2, "n", Type::base(Category::I32)).with_annotation(EXPAND_ANNOTATION, "true");
        assert!(!should_expand(&scalar, Some(&plain)));
    }

    #[test]
    fn test_adjusted_id() {
        assert_eq!(adjusted_id(1, 3), Some(3001));
        assert_eq!(adjusted_id(2, 0), Some(2));
        assert_eq!(adjusted_id(-1, 2), Some(1999));
        assert_eq!(adjusted_id(1, i32::MAX / 10), None);
    }
}
