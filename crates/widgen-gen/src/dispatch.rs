//! Dispatch table construction.
//!
//! Each resolved [`AttributeGroup`] becomes one [`DispatchCase`]: the `case`
//! of the generated `set` method's `switch` over attribute names. Subtype
//! branches come first, most specific target and value first, followed by the
//! root branches. The same pass collects the [`WrapperEntry`] set, one per
//! surviving (name, value type) pair; wrapper parameters are annotated from a
//! fresh oracle query per declaration.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use widgen_catalog::{canonical_name, class_depth, type_depth, ClassLoader};
use widgen_classfile::FieldType;

use crate::classify::{AttributeCandidate, AttributeKind};
use crate::listener::{listener_wrapper, ListenerWrapper};
use crate::nullability::{MemberKey, Nullability, NullabilityOracle};
use crate::quirks::{QuirkOutcome, QuirksTable};
use crate::resolve::AttributeGroup;
use crate::types::{java_identifier, java_type};

/// Runtime test on the dispatched value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueTest {
    /// Boxed type the value must be an instance of.
    pub ty: FieldType,
    /// `null` passes the test too.
    pub accepts_null: bool,
}

/// What a matching branch does with the target and value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// `target.method((ParamType) arg)`.
    Setter {
        method: String,
        param_type: FieldType,
    },
    /// Install a forwarding wrapper around a non-null value, or a typed
    /// `null`.
    Listener {
        method: String,
        wrapper: ListenerWrapper,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Branch {
    Generated {
        /// Binary name the target must be an instance of; `None` for the
        /// root, which every target is.
        target: Option<String>,
        /// `None` when the branch is taken unconditionally.
        value: Option<ValueTest>,
        invocation: Invocation,
    },
    /// Code supplied by a quirk, emitted as is.
    Verbatim(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminator {
    /// Falls out of the case; the attribute was not handled.
    Unhandled,
    /// The last branch always returns.
    Exhaustive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchCase {
    pub name: String,
    pub branches: Vec<Branch>,
    pub terminator: Terminator,
}

/// A static forwarding function `name(ParamType arg)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapperEntry {
    /// Attribute name passed to the runtime.
    pub attribute: String,
    /// Java method name; the attribute name unless it is a reserved word.
    pub function_name: String,
    pub param_type: FieldType,
    pub nullability: Nullability,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchTable {
    pub cases: Vec<DispatchCase>,
    /// Sorted by attribute name, then parameter type.
    pub wrappers: Vec<WrapperEntry>,
}

pub struct DispatchBuilder<'a> {
    loader: &'a dyn ClassLoader,
    root: &'a str,
    oracle: &'a dyn NullabilityOracle,
    quirks: &'a QuirksTable,
}

type SubtypeKey = (Reverse<usize>, Reverse<usize>, String, String);
type RootKey = (bool, Reverse<usize>, String);

impl<'a> DispatchBuilder<'a> {
    pub fn new(
        loader: &'a dyn ClassLoader,
        root: &'a str,
        oracle: &'a dyn NullabilityOracle,
        quirks: &'a QuirksTable,
    ) -> Self {
        Self {
            loader,
            root,
            oracle,
            quirks,
        }
    }

    /// Build cases for resolved groups, in group order. Groups left without a
    /// branch produce neither a case nor wrappers.
    pub fn build(&self, groups: &[AttributeGroup]) -> DispatchTable {
        let mut table = DispatchTable::default();
        for group in groups {
            if let Some((case, wrappers)) = self.build_case(group) {
                table.cases.push(case);
                table.wrappers.extend(wrappers);
            }
        }
        table
    }

    fn build_case(&self, group: &AttributeGroup) -> Option<(DispatchCase, Vec<WrapperEntry>)> {
        let mut subtype: Vec<(SubtypeKey, Branch)> = Vec::new();
        let mut root: Vec<(RootKey, Branch, bool)> = Vec::new();
        let mut wrappers: BTreeMap<String, (&FieldType, Vec<&AttributeCandidate>)> =
            BTreeMap::new();

        for candidate in &group.candidates {
            let branch = match self.quirks.apply(candidate) {
                Some(QuirkOutcome::Skip) => {
                    tracing::debug!(
                        target: "widgen.gen",
                        class = %candidate.declaring_class,
                        method = %candidate.method_name,
                        "quirk skipped attribute"
                    );
                    continue;
                }
                Some(QuirkOutcome::Replace(code)) => Branch::Verbatim(code),
                None => match self.generated_branch(candidate) {
                    Some(branch) => branch,
                    None => continue,
                },
            };

            wrappers
                .entry(java_type(&candidate.value_type))
                .or_insert_with(|| (&candidate.value_type, Vec::new()))
                .1
                .push(candidate);

            let value_depth = self.value_depth(&candidate.value_type);
            if candidate.declaring_class == self.root {
                let is_listener = candidate.kind == AttributeKind::Listener;
                let generated = matches!(branch, Branch::Generated { .. });
                root.push((
                    (is_listener, Reverse(value_depth), java_type(&candidate.value_type)),
                    branch,
                    is_listener && generated,
                ));
            } else {
                subtype.push((
                    (
                        Reverse(class_depth(self.loader, &candidate.declaring_class)),
                        Reverse(value_depth),
                        canonical_name(&candidate.declaring_class),
                        java_type(&candidate.value_type),
                    ),
                    branch,
                ));
            }
        }

        if subtype.is_empty() && root.is_empty() {
            return None;
        }

        subtype.sort_by(|a, b| a.0.cmp(&b.0));
        root.sort_by(|a, b| a.0.cmp(&b.0));

        // A lone generated root listener handles every remaining value,
        // `null` included, so it closes the case.
        let root_listeners = root.iter().filter(|(key, ..)| key.0).count();
        let exhaustive =
            root_listeners == 1 && root.last().is_some_and(|(_, _, generated)| *generated);

        let mut branches: Vec<Branch> = subtype.into_iter().map(|(_, branch)| branch).collect();
        branches.extend(root.into_iter().map(|(_, branch, _)| branch));
        if exhaustive {
            if let Some(Branch::Generated { value, .. }) = branches.last_mut() {
                *value = None;
            }
        }

        let wrappers = wrappers
            .into_values()
            .map(|(value_type, candidates)| self.wrapper_entry(&group.name, value_type, &candidates))
            .collect();

        Some((
            DispatchCase {
                name: group.name.clone(),
                branches,
                terminator: if exhaustive {
                    Terminator::Exhaustive
                } else {
                    Terminator::Unhandled
                },
            },
            wrappers,
        ))
    }

    fn generated_branch(&self, candidate: &AttributeCandidate) -> Option<Branch> {
        let target = (candidate.declaring_class != self.root)
            .then(|| candidate.declaring_class.clone());
        let invocation = match candidate.kind {
            AttributeKind::Setter => Invocation::Setter {
                method: candidate.method_name.clone(),
                param_type: candidate.param_type.clone(),
            },
            AttributeKind::Listener => {
                let FieldType::Object(interface) = &candidate.param_type else {
                    return None;
                };
                Invocation::Listener {
                    method: candidate.method_name.clone(),
                    wrapper: listener_wrapper(self.loader, interface)?,
                }
            }
        };
        Some(Branch::Generated {
            target,
            value: Some(ValueTest {
                ty: candidate.value_type.clone(),
                accepts_null: candidate.accepts_null(),
            }),
            invocation,
        })
    }

    /// Depth over superclass and interface links, so a value type always
    /// sorts ahead of anything it is assignable to.
    fn value_depth(&self, ty: &FieldType) -> usize {
        ty.class_name()
            .map_or(0, |name| type_depth(self.loader, name))
    }

    /// One wrapper for candidates sharing a value type. The parameter stays
    /// primitive only when every candidate declares the primitive.
    fn wrapper_entry(
        &self,
        attribute: &str,
        value_type: &FieldType,
        candidates: &[&AttributeCandidate],
    ) -> WrapperEntry {
        let primitive = candidates
            .iter()
            .map(|c| &c.param_type)
            .find(|ty| ty.is_primitive())
            .filter(|_| candidates.iter().all(|c| c.param_type.is_primitive()));
        let param_type = primitive.unwrap_or(value_type).clone();

        let answers: Vec<Nullability> = candidates
            .iter()
            .map(|c| self.wrapper_nullability(c))
            .collect();
        let nullability = if answers.contains(&Nullability::Nullable) {
            Nullability::Nullable
        } else if answers.iter().all(|n| *n == Nullability::NonNull) {
            Nullability::NonNull
        } else {
            Nullability::Unknown
        };

        WrapperEntry {
            attribute: attribute.to_string(),
            function_name: java_identifier(attribute),
            param_type,
            nullability,
        }
    }

    /// Contract of one declaration's parameter, asked of the oracle again
    /// for the wrapper. Values the branch forwards as `null` are nullable
    /// whatever the oracle says; primitives are never asked about.
    fn wrapper_nullability(&self, candidate: &AttributeCandidate) -> Nullability {
        if candidate.accepts_null() {
            return Nullability::Nullable;
        }
        if candidate.param_type.is_primitive() {
            return Nullability::NonNull;
        }
        let declared = candidate
            .descriptor
            .find(')')
            .map(|end| &candidate.descriptor[..=end])
            .and_then(|params| {
                let class = self.loader.load(&candidate.declaring_class)?;
                let method = class.find_method(&candidate.method_name, params)?;
                Some((class, method))
            });
        match declared {
            Some((class, method)) => self.oracle.nullability(&MemberKey {
                class,
                method,
                param: 0,
            }),
            None => candidate.nullability,
        }
    }
}
