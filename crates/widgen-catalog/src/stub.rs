use std::path::PathBuf;

use widgen_classfile::{parse_method_descriptor, AccessFlags, ClassFile, MethodDescriptor};

/// A declared method, reduced to what classification needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodStub {
    pub name: String,
    pub descriptor: String,
    pub parsed: MethodDescriptor,
    pub access: AccessFlags,
    pub deprecated: bool,
    /// Binary names of the annotations on each parameter.
    pub parameter_annotations: Vec<Vec<String>>,
}

impl MethodStub {
    /// Parameter part of the descriptor; the override identity of the method.
    #[must_use]
    pub fn params_descriptor(&self) -> String {
        self.parsed.params_descriptor()
    }

    #[must_use]
    pub fn parameter_annotations(&self, param: usize) -> &[String] {
        self.parameter_annotations
            .get(param)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// A class or interface as seen by the generator. Immutable once indexed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassStub {
    pub binary_name: String,
    /// Effective access: nested classes take the flags of their own
    /// `InnerClasses` entry.
    pub access: AccessFlags,
    pub super_binary_name: Option<String>,
    pub interfaces: Vec<String>,
    pub nested: bool,
    /// Archive the class was loaded from.
    pub origin: PathBuf,
    pub methods: Vec<MethodStub>,
}

impl ClassStub {
    pub fn from_classfile(
        class: ClassFile,
        origin: PathBuf,
    ) -> Result<Self, widgen_classfile::Error> {
        let own_entry = class.own_inner_class_entry().cloned();
        let nested = own_entry.is_some() || class.this_class.contains('$');
        let access = own_entry.map_or(class.access_flags, |entry| {
            // ACC_INTERFACE/ABSTRACT only live on the class header for some
            // compilers; keep them from there.
            let kind = class.access_flags.0 & (AccessFlags::INTERFACE | AccessFlags::ABSTRACT);
            AccessFlags(entry.access_flags.0 | kind)
        });

        let methods = class
            .methods
            .into_iter()
            .map(|m| {
                let parsed = parse_method_descriptor(&m.descriptor)?;
                Ok(MethodStub {
                    name: m.name,
                    parsed,
                    descriptor: m.descriptor,
                    access: m.access_flags,
                    deprecated: m.deprecated,
                    parameter_annotations: m
                        .parameter_annotations
                        .iter()
                        .map(|anns| anns.iter().filter_map(|a| a.binary_name()).collect())
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>, widgen_classfile::Error>>()?;

        Ok(ClassStub {
            binary_name: class.this_class,
            access,
            super_binary_name: class.super_class,
            interfaces: class.interfaces,
            nested,
            origin,
            methods,
        })
    }

    #[must_use]
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.binary_name)
    }

    #[must_use]
    pub fn simple_name(&self) -> &str {
        simple_name(&self.binary_name)
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access.is_public()
    }

    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.access.is_interface()
    }

    /// A declared method with the given name and parameter descriptor.
    #[must_use]
    pub fn find_method(&self, name: &str, params_descriptor: &str) -> Option<&MethodStub> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.params_descriptor() == params_descriptor)
    }
}

/// Source-level name of a binary name: `a.B$C` becomes `a.B.C`.
#[must_use]
pub fn canonical_name(binary_name: &str) -> String {
    binary_name.replace('$', ".")
}

/// The last segment of a binary name (`C` for `a.B$C`).
#[must_use]
pub fn simple_name(binary_name: &str) -> &str {
    binary_name.rsplit(['.', '$']).next().unwrap_or(binary_name)
}
