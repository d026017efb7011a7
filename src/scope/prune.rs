//! Unused-import pruning.
//!
//! Rendering a type marks its import used. Expansion can leave an import
//! whose only reference was the replaced field; such imports are flipped
//! back to unused here, after every field, typedef and constant is resolved.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::Scope;

/// Mark unused every import no resolved type name refers to.
///
/// Returns the aliases that were pruned. Same-package includes are never
/// imported and are ignored.
pub(crate) fn prune(scope: &mut Scope) -> Vec<SmolStr> {
    let mut used: FxHashSet<&SmolStr> = FxHashSet::default();
    for st in scope.all_structures() {
        for field in st.flattened_fields() {
            used.extend(&field.type_name.qualifiers);
            used.extend(&field.default_type_name.qualifiers);
            used.extend(&field.default_value.qualifiers);
        }
    }
    for typedef in &scope.typedefs {
        used.extend(&typedef.type_name.qualifiers);
    }
    for constant in &scope.constants {
        used.extend(&constant.type_name.qualifiers);
        used.extend(&constant.init.qualifiers);
    }

    let stale: Vec<(SmolStr, SmolStr)> = scope
        .includes
        .iter()
        .flatten()
        .filter(|inc| !inc.same_package && scope.imports.is_used(&inc.import_path))
        .filter(|inc| !used.contains(&inc.package_name))
        .map(|inc| (inc.import_path.clone(), inc.package_name.clone()))
        .collect();

    let mut pruned = Vec::new();
    for (path, alias) in stale {
        if !scope.imports.is_used(&path) {
            continue;
        }
        scope.imports.mark_unused(&path);
        tracing::debug!(file = %scope.filename(), alias = %alias, path = %path, "pruned unused import");
        pruned.push(alias);
    }
    pruned
}
