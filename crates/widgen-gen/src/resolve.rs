//! Grouping by attribute name and override elimination.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use widgen_catalog::{is_strict_subclass, ClassLoader};
use widgen_classfile::FieldType;

use crate::classify::AttributeCandidate;

/// Every candidate sharing one derived name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeGroup {
    pub name: String,
    pub candidates: Vec<AttributeCandidate>,
}

/// Group candidates by name, in name order. Candidate order inside a group is
/// the input order.
pub fn group_candidates(
    candidates: impl IntoIterator<Item = AttributeCandidate>,
) -> Vec<AttributeGroup> {
    let mut groups: BTreeMap<String, Vec<AttributeCandidate>> = BTreeMap::new();
    for candidate in candidates {
        groups
            .entry(candidate.name.clone())
            .or_default()
            .push(candidate);
    }
    groups
        .into_iter()
        .map(|(name, candidates)| AttributeGroup { name, candidates })
        .collect()
}

/// Drops declarations shadowed by a more derived declaration of the same
/// value type.
pub struct OverrideResolver<'a> {
    loader: &'a dyn ClassLoader,
    root: &'a str,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(loader: &'a dyn ClassLoader, root: &'a str) -> Self {
        Self { loader, root }
    }

    /// The surviving candidates, ordered by declaring class then value type.
    ///
    /// Root declarations always survive: they are the branch every widget
    /// without a more specific declaration falls back to.
    pub fn resolve(&self, group: AttributeGroup) -> AttributeGroup {
        let AttributeGroup { name, candidates } = group;

        // `setX(int)` and `setX(Integer)` on one class test the same value.
        let mut slots: BTreeMap<(String, FieldType), AttributeCandidate> = BTreeMap::new();
        for candidate in candidates {
            match slots.entry((candidate.declaring_class.clone(), candidate.value_type.clone())) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
                Entry::Occupied(mut slot) => {
                    let (kept, dropped) = if prefer(&candidate, slot.get()) {
                        let old = slot.insert(candidate);
                        (slot.get().descriptor.clone(), old.descriptor)
                    } else {
                        (slot.get().descriptor.clone(), candidate.descriptor)
                    };
                    tracing::trace!(
                        target: "widgen.gen",
                        attribute = %name,
                        class = %slot.key().0,
                        kept = %kept,
                        dropped = %dropped,
                        "collapsed overloads with the same value type"
                    );
                }
            }
        }

        let pool: Vec<AttributeCandidate> = slots.into_values().collect();
        let survivors = pool
            .iter()
            .filter(|candidate| {
                if candidate.declaring_class == self.root {
                    return true;
                }
                let shadowed_by = pool.iter().find(|other| {
                    other.value_type == candidate.value_type
                        && is_strict_subclass(
                            self.loader,
                            &other.declaring_class,
                            &candidate.declaring_class,
                        )
                });
                if let Some(other) = shadowed_by {
                    tracing::trace!(
                        target: "widgen.gen",
                        attribute = %name,
                        shadowed = %candidate.declaring_class,
                        by = %other.declaring_class,
                        "override eliminated"
                    );
                }
                shadowed_by.is_none()
            })
            .cloned()
            .collect();

        AttributeGroup {
            name,
            candidates: survivors,
        }
    }
}

/// Between two same-class overloads, prefer the one declared with the boxed
/// type itself, then the smaller descriptor.
fn prefer(new: &AttributeCandidate, old: &AttributeCandidate) -> bool {
    let new_exact = new.param_type == new.value_type;
    let old_exact = old.param_type == old.value_type;
    match (new_exact, old_exact) {
        (true, false) => true,
        (false, true) => false,
        _ => new.descriptor < old.descriptor,
    }
}
