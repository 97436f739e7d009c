//! The generated compilation unit, as data.
//!
//! A [`Document`] is assembled once from the factory list and the dispatch
//! table and never mutated afterwards; [`crate::render`] turns it into Java
//! source.

use crate::dispatch::{DispatchCase, DispatchTable, WrapperEntry};
use crate::factory::FactoryEntry;

/// Fully qualified names of the runtime the generated class calls into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeNames {
    /// Interface the generated class implements.
    pub attribute_setter: String,
    /// Parameter type of the child-rendering factory overload.
    pub renderable: String,
    /// Return type of the no-argument factory.
    pub view_class_result: String,
    /// Static method constructing a view from its class.
    pub construct: String,
    /// Static method recording an attribute value.
    pub apply_attribute: String,
    /// Static method requesting a re-render.
    pub render: String,
    pub nullable_annotation: Option<String>,
    pub non_null_annotation: Option<String>,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            attribute_setter: "widgen.runtime.Dsl.AttributeSetter<Object>".to_string(),
            renderable: "widgen.runtime.Dsl.Renderable".to_string(),
            view_class_result: "widgen.runtime.BaseDsl.ViewClassResult".to_string(),
            construct: "widgen.runtime.BaseDsl.v".to_string(),
            apply_attribute: "widgen.runtime.BaseDsl.attr".to_string(),
            render: "widgen.runtime.Dsl.render".to_string(),
            nullable_annotation: None,
            non_null_annotation: None,
        }
    }
}

/// The single `set(root, name, arg, old)` method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchMethod {
    /// Binary name of the root type.
    pub root: String,
    pub cases: Vec<DispatchCase>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Declaration {
    Factory(FactoryEntry),
    Wrapper(WrapperEntry),
    Dispatch(DispatchMethod),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Comment lines at the top of the file.
    pub header: Vec<String>,
    pub package: Option<String>,
    pub class_name: String,
    pub runtime: RuntimeNames,
    /// Factories, then wrappers, then the dispatch method.
    pub declarations: Vec<Declaration>,
}

impl Document {
    pub fn new(
        header: Vec<String>,
        package: Option<String>,
        class_name: String,
        runtime: RuntimeNames,
        root: &str,
        factories: Vec<FactoryEntry>,
        table: DispatchTable,
    ) -> Self {
        let mut declarations: Vec<Declaration> =
            factories.into_iter().map(Declaration::Factory).collect();
        declarations.extend(table.wrappers.into_iter().map(Declaration::Wrapper));
        declarations.push(Declaration::Dispatch(DispatchMethod {
            root: root.to_string(),
            cases: table.cases,
        }));
        Self {
            header,
            package,
            class_name,
            runtime,
            declarations,
        }
    }

    pub fn factories(&self) -> impl Iterator<Item = &FactoryEntry> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Factory(f) => Some(f),
            _ => None,
        })
    }

    pub fn wrappers(&self) -> impl Iterator<Item = &WrapperEntry> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Wrapper(w) => Some(w),
            _ => None,
        })
    }

    pub fn dispatch(&self) -> Option<&DispatchMethod> {
        self.declarations.iter().find_map(|d| match d {
            Declaration::Dispatch(m) => Some(m),
            _ => None,
        })
    }
}
