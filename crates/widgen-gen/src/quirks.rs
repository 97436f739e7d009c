//! Manual overrides of default generation.
//!
//! A [`QuirksTable`] is keyed by the canonical name of the declaring class.
//! Per class it can rename or exclude the class's factory and attach a
//! strategy to individual methods. Method keys are `method:Type`, where the
//! type is the declared parameter type or the value type, by canonical or
//! simple name, or a bare `method` covering every overload. The most specific
//! key wins.

use std::collections::BTreeMap;
use std::fmt;

use widgen_catalog::{canonical_name, simple_name};
use widgen_classfile::FieldType;

use crate::classify::AttributeCandidate;
use crate::types::java_type;

/// Reserved method key holding a class-level alias.
pub const CLASS_ALIAS_KEY: &str = "__classAlias";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassAlias {
    /// Use this factory name instead of the derived one.
    Rename(String),
    /// Generate nothing for the class.
    Exclude,
}

/// What a quirk does to one candidate's branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuirkOutcome {
    /// Emit this code verbatim in place of the default branch.
    Replace(String),
    /// Emit no branch and no wrapper for the candidate.
    Skip,
}

/// A strategy consulted before default generation. `None` keeps the default.
pub type QuirkFn = Box<dyn Fn(&AttributeCandidate) -> Option<QuirkOutcome> + Send + Sync>;

#[derive(Default)]
struct ClassQuirks {
    alias: Option<ClassAlias>,
    methods: BTreeMap<String, QuirkFn>,
}

#[derive(Default)]
pub struct QuirksTable {
    classes: BTreeMap<String, ClassQuirks>,
}

impl fmt::Debug for QuirksTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (class, quirks) in &self.classes {
            let keys: Vec<&String> = quirks.methods.keys().collect();
            map.entry(class, &(&quirks.alias, keys));
        }
        map.finish()
    }
}

impl QuirksTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn class_mut(&mut self, class: &str) -> &mut ClassQuirks {
        self.classes.entry(canonical_name(class)).or_default()
    }

    pub fn set_alias(&mut self, class: &str, alias: ClassAlias) {
        self.class_mut(class).alias = Some(alias);
    }

    /// Attach a strategy to `key` on `class`.
    pub fn insert(&mut self, class: &str, key: impl Into<String>, quirk: QuirkFn) {
        self.class_mut(class).methods.insert(key.into(), quirk);
    }

    /// Replace the branch for `key` with `code`.
    pub fn replace(&mut self, class: &str, key: impl Into<String>, code: impl Into<String>) {
        let code = code.into();
        self.insert(
            class,
            key,
            Box::new(move |_: &AttributeCandidate| Some(QuirkOutcome::Replace(code.clone()))),
        );
    }

    /// Drop the branch and wrapper for `key`.
    pub fn skip(&mut self, class: &str, key: impl Into<String>) {
        self.insert(class, key, Box::new(|_: &AttributeCandidate| Some(QuirkOutcome::Skip)));
    }

    pub fn alias(&self, class: &str) -> Option<&ClassAlias> {
        self.classes
            .get(&canonical_name(class))
            .and_then(|q| q.alias.as_ref())
    }

    pub fn is_excluded(&self, class: &str) -> bool {
        matches!(self.alias(class), Some(ClassAlias::Exclude))
    }

    /// The outcome for `candidate`, if any quirk claims it.
    pub fn apply(&self, candidate: &AttributeCandidate) -> Option<QuirkOutcome> {
        let quirks = self
            .classes
            .get(&canonical_name(&candidate.declaring_class))?;
        let method = &candidate.method_name;
        let mut keys = Vec::new();
        for ty in [&candidate.param_type, &candidate.value_type] {
            keys.push(format!("{method}:{}", java_type(ty)));
            if let FieldType::Object(name) = ty {
                keys.push(format!("{method}:{}", simple_name(name)));
            }
        }
        keys.push(method.clone());
        keys.iter()
            .find_map(|key| quirks.methods.get(key))
            .and_then(|quirk| quirk(candidate))
    }
}
