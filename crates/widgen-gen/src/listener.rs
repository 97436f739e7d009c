//! Callback interfaces behind `setOn<Name>Listener` attributes.
//!
//! A listener value is never installed directly: the dispatch branch wraps it
//! in an anonymous implementation of the same interface that forwards every
//! abstract method and then requests a re-render. This module computes the set
//! of methods that wrapper has to implement.

use std::collections::BTreeMap;

use widgen_catalog::{super_interfaces, ClassLoader, MethodStub};
use widgen_classfile::{FieldType, ReturnType};

/// One abstract interface method the wrapper overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerMethod {
    pub name: String,
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

impl ListenerMethod {
    /// Names of the forwarded parameters: `a0`, `a1`, ...
    pub fn param_names(&self) -> Vec<String> {
        (0..self.params.len()).map(|i| format!("a{i}")).collect()
    }
}

/// The anonymous forwarding class installed for a non-null listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerWrapper {
    /// Binary name of the callback interface.
    pub interface: String,
    /// Sorted by name, then parameter descriptor.
    pub methods: Vec<ListenerMethod>,
}

/// `equals`, `hashCode` and `toString` may be redeclared abstract on an
/// interface but are always implemented by `Object`.
fn is_object_method(method: &MethodStub) -> bool {
    matches!(
        (method.name.as_str(), method.descriptor.as_str()),
        ("equals", "(Ljava/lang/Object;)Z")
            | ("hashCode", "()I")
            | ("toString", "()Ljava/lang/String;")
    )
}

/// Build the wrapper for `interface`, or `None` when it is not a loadable
/// interface with at least one abstract method. An interface whose
/// super-interfaces cannot all be loaded is rejected too: the wrapper could
/// not be shown to implement every abstract method.
pub fn listener_wrapper(loader: &dyn ClassLoader, interface: &str) -> Option<ListenerWrapper> {
    let stub = loader.load(interface)?;
    if !stub.is_interface() {
        tracing::trace!(target: "widgen.gen", interface, "listener parameter is not an interface");
        return None;
    }

    let (interfaces, missing) = super_interfaces(loader, interface);
    if !missing.is_empty() {
        tracing::warn!(
            target: "widgen.gen",
            interface,
            missing = ?missing,
            "skipping listener with unresolvable super-interfaces"
        );
        return None;
    }

    let mut methods = BTreeMap::new();
    for iface in interfaces {
        for method in &iface.methods {
            if !method.access.is_abstract() || method.access.is_static() || is_object_method(method)
            {
                continue;
            }
            methods
                .entry((method.name.clone(), method.params_descriptor()))
                .or_insert_with(|| ListenerMethod {
                    name: method.name.clone(),
                    params: method.parsed.params.clone(),
                    return_type: method.parsed.return_type.clone(),
                });
        }
    }

    if methods.is_empty() {
        tracing::debug!(target: "widgen.gen", interface, "listener interface has no abstract methods");
        return None;
    }

    Some(ListenerWrapper {
        interface: interface.to_string(),
        methods: methods.into_values().collect(),
    })
}
