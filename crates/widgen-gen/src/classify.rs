//! Method classification: which declared methods become attributes.

use std::collections::BTreeSet;

use serde::Serialize;
use widgen_catalog::{ancestors_up_to, Ancestry, ClassLoader, ClassStub, MethodStub};
use widgen_classfile::FieldType;

use crate::listener::listener_wrapper;
use crate::nullability::{MemberKey, Nullability, NullabilityOracle};
use crate::types::{boxed, decapitalize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeKind {
    Setter,
    Listener,
}

/// A method that passed classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeCandidate {
    /// Derived attribute name (`text` for `setText`, `onClick` for
    /// `setOnClickListener`).
    pub name: String,
    pub kind: AttributeKind,
    /// Binary name of the class declaring the method.
    pub declaring_class: String,
    pub method_name: String,
    pub descriptor: String,
    /// The declared parameter type.
    pub param_type: FieldType,
    /// The type a dispatched value is tested against: the parameter type with
    /// primitives boxed.
    pub value_type: FieldType,
    pub nullability: Nullability,
}

impl AttributeCandidate {
    /// Whether `null` is forwarded to the method. Listeners always accept
    /// `null`; it uninstalls the callback.
    pub fn accepts_null(&self) -> bool {
        match self.kind {
            AttributeKind::Listener => true,
            AttributeKind::Setter => {
                !self.param_type.is_primitive() && self.nullability == Nullability::Nullable
            }
        }
    }
}

/// `setText` is `text`, `setOnClickListener` is the listener `onClick`.
/// Anything else is not an attribute.
pub fn derive_attribute_name(method_name: &str) -> Option<(String, AttributeKind)> {
    let rest = method_name.strip_prefix("set")?;
    if let Some(event) = rest
        .strip_prefix("On")
        .and_then(|r| r.strip_suffix("Listener"))
    {
        if !event.is_empty() {
            return Some((format!("on{event}"), AttributeKind::Listener));
        }
    }
    if !rest.chars().next()?.is_uppercase() {
        return None;
    }
    Some((decapitalize(rest), AttributeKind::Setter))
}

/// Turns the declared methods of one class into attribute candidates.
pub struct Classifier<'a> {
    loader: &'a dyn ClassLoader,
    root: &'a str,
    oracle: &'a dyn NullabilityOracle,
    /// Classes whose own candidates are generated; only these make a
    /// redeclaration redundant.
    members: BTreeSet<String>,
}

impl<'a> Classifier<'a> {
    pub fn new(
        loader: &'a dyn ClassLoader,
        root: &'a str,
        oracle: &'a dyn NullabilityOracle,
        members: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut members: BTreeSet<String> = members.into_iter().collect();
        members.insert(root.to_string());
        Self {
            loader,
            root,
            oracle,
            members,
        }
    }

    /// Candidates for the methods `class` declares, in declaration order.
    /// Methods that an ancestor (up to and including the root) already
    /// declares as an attribute are left out: the ancestor's branch covers
    /// them.
    pub fn classify(&self, class: &ClassStub) -> Vec<AttributeCandidate> {
        let ancestors = if class.binary_name == self.root {
            Vec::new()
        } else {
            match ancestors_up_to(self.loader, class, self.root) {
                Ancestry::Descends(chain) => chain,
                Ancestry::Unrelated => Vec::new(),
                Ancestry::Missing(name) => {
                    tracing::debug!(
                        target: "widgen.gen",
                        class = %class.binary_name,
                        missing = %name,
                        "incomplete superclass chain; redundancy check skipped"
                    );
                    Vec::new()
                }
            }
        };

        let mut out = Vec::new();
        for method in &class.methods {
            let Some(candidate) = self.candidate(class, method) else {
                continue;
            };
            let params = method.params_descriptor();
            let redundant = ancestors.iter().find(|ancestor| {
                self.members.contains(&ancestor.binary_name)
                    && ancestor
                        .find_method(&method.name, &params)
                        .is_some_and(|m| self.shape(m).is_some())
            });
            if let Some(ancestor) = redundant {
                tracing::trace!(
                    target: "widgen.gen",
                    class = %class.binary_name,
                    method = %method.name,
                    ancestor = %ancestor.binary_name,
                    "redeclared attribute elided"
                );
                continue;
            }
            out.push(candidate);
        }
        out
    }

    /// Name, kind and parameter of an attribute-shaped method.
    fn shape<'m>(&self, method: &'m MethodStub) -> Option<(String, AttributeKind, &'m FieldType)> {
        let access = method.access;
        if !access.is_public()
            || access.is_static()
            || access.is_bridge()
            || access.is_synthetic()
            || method.deprecated
        {
            return None;
        }
        let [param] = method.parsed.params.as_slice() else {
            return None;
        };
        let (name, kind) = derive_attribute_name(&method.name)?;
        Some((name, kind, param))
    }

    fn candidate(&self, class: &ClassStub, method: &MethodStub) -> Option<AttributeCandidate> {
        let (name, kind, param) = self.shape(method)?;

        if let Some(type_name) = param.class_name() {
            if !self.is_accessible(type_name) {
                tracing::trace!(
                    target: "widgen.gen",
                    class = %class.binary_name,
                    method = %method.name,
                    param = type_name,
                    "parameter type is not public"
                );
                return None;
            }
        }

        if kind == AttributeKind::Listener {
            let FieldType::Object(interface) = param else {
                return None;
            };
            listener_wrapper(self.loader, interface)?;
        }

        let nullability = if param.is_primitive() {
            Nullability::NonNull
        } else {
            self.oracle.nullability(&MemberKey {
                class,
                method,
                param: 0,
            })
        };

        Some(AttributeCandidate {
            name,
            kind,
            declaring_class: class.binary_name.clone(),
            method_name: method.name.clone(),
            descriptor: method.descriptor.clone(),
            param_type: param.clone(),
            value_type: boxed(param),
            nullability,
        })
    }

    /// A type is accessible when it and every enclosing class are public.
    /// Types missing from the index are assumed accessible.
    fn is_accessible(&self, binary_name: &str) -> bool {
        match self.loader.load(binary_name) {
            Some(stub) if !stub.is_public() => return false,
            Some(_) => {}
            None => tracing::trace!(
                target: "widgen.gen",
                class = binary_name,
                "unresolved parameter type assumed accessible"
            ),
        }
        match binary_name.rsplit_once('$') {
            Some((outer, _)) => self.is_accessible(outer),
            None => true,
        }
    }
}
