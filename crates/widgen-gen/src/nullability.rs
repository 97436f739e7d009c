//! Nullability of setter parameters.
//!
//! The generator asks a [`NullabilityOracle`] once per candidate parameter
//! while classifying and again for each wrapper parameter it annotates.
//! [`AnnotationOracle`] reads parameter annotations recorded in the class
//! file, [`TableOracle`] answers from a user-supplied table, and
//! [`OracleChain`] takes the first definite answer.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use widgen_catalog::{simple_name, ClassStub, MethodStub};

use crate::types::java_type;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Nullability {
    Nullable,
    NonNull,
    Unknown,
}

/// One parameter of one declared method.
#[derive(Clone, Copy, Debug)]
pub struct MemberKey<'a> {
    pub class: &'a ClassStub,
    pub method: &'a MethodStub,
    pub param: usize,
}

impl MemberKey<'_> {
    /// `pkg.Class#method(pkg.ParamType)`, the form used by override tables.
    pub fn table_key(&self) -> String {
        let params: Vec<String> = self.method.parsed.params.iter().map(java_type).collect();
        format!(
            "{}#{}({})",
            self.class.canonical_name(),
            self.method.name,
            params.join(",")
        )
    }
}

pub trait NullabilityOracle {
    fn nullability(&self, key: &MemberKey<'_>) -> Nullability;
}

/// Matches parameter annotations by binary name or by simple name.
#[derive(Clone, Debug)]
pub struct AnnotationOracle {
    nullable: BTreeSet<String>,
    non_null: BTreeSet<String>,
}

/// Simple names recognized as nullable when nothing else is configured.
pub const DEFAULT_NULLABLE_ANNOTATIONS: &[&str] = &["Nullable", "CheckForNull", "NullableDecl"];
pub const DEFAULT_NON_NULL_ANNOTATIONS: &[&str] = &["NonNull", "NotNull", "Nonnull"];

impl Default for AnnotationOracle {
    fn default() -> Self {
        Self::new(
            DEFAULT_NULLABLE_ANNOTATIONS.iter().copied(),
            DEFAULT_NON_NULL_ANNOTATIONS.iter().copied(),
        )
    }
}

impl AnnotationOracle {
    pub fn new<N, M>(nullable: N, non_null: M) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            nullable: nullable.into_iter().map(Into::into).collect(),
            non_null: non_null.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(set: &BTreeSet<String>, annotation: &str) -> bool {
        set.contains(annotation) || set.contains(simple_name(annotation))
    }
}

impl NullabilityOracle for AnnotationOracle {
    fn nullability(&self, key: &MemberKey<'_>) -> Nullability {
        let annotations = key.method.parameter_annotations(key.param);
        if annotations.iter().any(|a| Self::matches(&self.nullable, a)) {
            Nullability::Nullable
        } else if annotations.iter().any(|a| Self::matches(&self.non_null, a)) {
            Nullability::NonNull
        } else {
            Nullability::Unknown
        }
    }
}

/// Explicit answers keyed by [`MemberKey::table_key`]; a bare
/// `pkg.Class#method` key covers every overload.
#[derive(Clone, Debug, Default)]
pub struct TableOracle {
    entries: BTreeMap<String, Nullability>,
}

impl TableOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, nullability: Nullability) {
        self.entries.insert(key.into(), nullability);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NullabilityOracle for TableOracle {
    fn nullability(&self, key: &MemberKey<'_>) -> Nullability {
        let exact = key.table_key();
        if let Some(answer) = self.entries.get(&exact) {
            return *answer;
        }
        let any_overload = format!("{}#{}", key.class.canonical_name(), key.method.name);
        self.entries
            .get(&any_overload)
            .copied()
            .unwrap_or(Nullability::Unknown)
    }
}

/// Asks each oracle in turn; the first answer other than `Unknown` wins.
#[derive(Default)]
pub struct OracleChain {
    oracles: Vec<Box<dyn NullabilityOracle>>,
}

impl OracleChain {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, oracle: impl NullabilityOracle + 'static) -> Self {
        self.oracles.push(Box::new(oracle));
        self
    }
}

impl NullabilityOracle for OracleChain {
    fn nullability(&self, key: &MemberKey<'_>) -> Nullability {
        self.oracles
            .iter()
            .map(|o| o.nullability(key))
            .find(|n| *n != Nullability::Unknown)
            .unwrap_or(Nullability::Unknown)
    }
}
