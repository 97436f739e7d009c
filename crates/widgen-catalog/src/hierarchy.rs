//! Subtype queries over superclass chains and interface links.
//!
//! Everything here walks [`ClassStub::super_binary_name`] (and, for
//! [`type_depth`] and [`super_interfaces`], [`ClassStub::interfaces`]) links
//! through a [`ClassLoader`]; there is no precomputed closure. Chains are short (widget
//! libraries are a few levels deep) and every walk is bounded by
//! [`MAX_DEPTH`] so a cyclic or corrupt index cannot hang a run.

use std::collections::{BTreeMap, BTreeSet};

use crate::index::ClassLoader;
use crate::stub::ClassStub;

const MAX_DEPTH: usize = 256;

/// Implicit top of every chain; archives rarely ship it.
const OBJECT: &str = "java.lang.Object";

/// Result of walking a class's superclass chain towards a root.
#[derive(Debug)]
pub enum Ancestry<'a> {
    /// Proper ancestors, nearest first, ending with the root.
    Descends(Vec<&'a ClassStub>),
    /// The chain ended without meeting the root.
    Unrelated,
    /// A link in the chain could not be loaded.
    Missing(String),
}

/// Walk from `class`'s direct superclass up to and including `root`.
pub fn ancestors_up_to<'a>(
    loader: &'a dyn ClassLoader,
    class: &ClassStub,
    root: &str,
) -> Ancestry<'a> {
    let mut out = Vec::new();
    let mut next = class.super_binary_name.clone();
    while let Some(name) = next {
        if out.len() >= MAX_DEPTH {
            return Ancestry::Unrelated;
        }
        let Some(stub) = loader.load(&name) else {
            if name == OBJECT {
                return Ancestry::Unrelated;
            }
            return Ancestry::Missing(name);
        };
        out.push(stub);
        if name == root {
            return Ancestry::Descends(out);
        }
        next = stub.super_binary_name.clone();
    }
    Ancestry::Unrelated
}

/// Whether `sub` is a proper subclass of `sup`. Unresolvable links answer
/// `false`.
pub fn is_strict_subclass(loader: &dyn ClassLoader, sub: &str, sup: &str) -> bool {
    let mut current = loader.load(sub).and_then(|s| s.super_binary_name.clone());
    let mut steps = 0;
    while let Some(name) = current {
        if name == sup {
            return true;
        }
        steps += 1;
        if steps >= MAX_DEPTH {
            return false;
        }
        current = loader.load(&name).and_then(|s| s.super_binary_name.clone());
    }
    false
}

/// Length of the superclass chain above `name`, as far as it can be followed.
/// Unknown classes are 0.
pub fn class_depth(loader: &dyn ClassLoader, name: &str) -> usize {
    let mut depth = 0;
    let mut current = loader.load(name).and_then(|s| s.super_binary_name.clone());
    while let Some(next) = current {
        if depth >= MAX_DEPTH {
            break;
        }
        depth += 1;
        current = loader.load(&next).and_then(|s| s.super_binary_name.clone());
    }
    depth
}

/// Longest path above `name` over superclass and interface links. A subtype
/// is always deeper than each of its supertypes, so sorting by descending
/// depth puts every type before the types it is assignable to. Unknown types
/// are 0; a link to one still counts.
pub fn type_depth(loader: &dyn ClassLoader, name: &str) -> usize {
    type_depth_in(loader, name, &mut BTreeMap::new(), 0)
}

fn type_depth_in(
    loader: &dyn ClassLoader,
    name: &str,
    memo: &mut BTreeMap<String, usize>,
    level: usize,
) -> usize {
    if let Some(depth) = memo.get(name) {
        return *depth;
    }
    let Some(stub) = loader.load(name) else {
        return 0;
    };
    if level >= MAX_DEPTH {
        return 0;
    }
    let depth = stub
        .super_binary_name
        .iter()
        .chain(&stub.interfaces)
        .map(|parent| 1 + type_depth_in(loader, parent, memo, level + 1))
        .max()
        .unwrap_or(0);
    memo.insert(name.to_string(), depth);
    depth
}

/// `interface` and all of its transitive super-interfaces that can be loaded,
/// in sorted order. Names that cannot be loaded are returned in `missing`.
pub fn super_interfaces<'a>(
    loader: &'a dyn ClassLoader,
    interface: &str,
) -> (Vec<&'a ClassStub>, Vec<String>) {
    let mut seen = BTreeSet::new();
    let mut missing = Vec::new();
    let mut pending = vec![interface.to_string()];
    while let Some(name) = pending.pop() {
        if !seen.insert(name.clone()) {
            continue;
        }
        match loader.load(&name) {
            Some(stub) => pending.extend(stub.interfaces.iter().cloned()),
            None => missing.push(name),
        }
    }
    let found = seen.iter().filter_map(|name| loader.load(name)).collect();
    missing.sort();
    (found, missing)
}
