//! View factories: one pair of static constructors per catalog class.

use std::collections::BTreeSet;

use widgen_catalog::{simple_name, Catalog};

use crate::quirks::{ClassAlias, QuirksTable};
use crate::types::{decapitalize, java_identifier};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactoryEntry {
    pub function_name: String,
    /// Binary name of the constructed class.
    pub class: String,
}

/// Factories for the catalog, in catalog order. Excluded classes get none; when
/// two classes derive the same name the first keeps it and the later one is
/// dropped with a warning (a `__classAlias` quirk can rename it).
pub fn build_factories(catalog: &Catalog, quirks: &QuirksTable) -> Vec<FactoryEntry> {
    let mut taken = BTreeSet::new();
    let mut out = Vec::new();
    for class in catalog.classes() {
        let function_name = match quirks.alias(class) {
            Some(ClassAlias::Exclude) => continue,
            Some(ClassAlias::Rename(name)) => name.clone(),
            None => java_identifier(&decapitalize(simple_name(class))),
        };
        if !taken.insert(function_name.clone()) {
            tracing::warn!(
                target: "widgen.gen",
                class = %class,
                name = %function_name,
                "factory name already taken; class skipped"
            );
            continue;
        }
        out.push(FactoryEntry {
            function_name,
            class: class.clone(),
        });
    }
    out
}
