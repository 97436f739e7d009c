use std::collections::HashMap;

use crate::{ACC_ABSTRACT, ACC_INTERFACE, ACC_PUBLIC};

/// A method to emit. Methods are emitted without a `Code` attribute, which is
/// all the reader needs.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    pub name: String,
    pub descriptor: String,
    pub access: u16,
    pub deprecated_attribute: bool,
    /// Method annotation type descriptors (`Ljava/lang/Deprecated;`).
    pub annotations: Vec<String>,
    /// Per-parameter annotation type descriptors, emitted as invisible
    /// parameter annotations.
    pub parameter_annotations: Vec<Vec<String>>,
}

impl MethodSpec {
    pub fn new(name: &str, descriptor: &str, access: u16) -> Self {
        Self {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            access,
            deprecated_attribute: false,
            annotations: Vec::new(),
            parameter_annotations: Vec::new(),
        }
    }

    pub fn public(name: &str, descriptor: &str) -> Self {
        Self::new(name, descriptor, ACC_PUBLIC)
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated_attribute = true;
        self
    }

    pub fn annotated(mut self, descriptor: &str) -> Self {
        self.annotations.push(descriptor.to_string());
        self
    }

    pub fn param_annotated(mut self, param: usize, descriptor: &str) -> Self {
        if self.parameter_annotations.len() <= param {
            self.parameter_annotations.resize(param + 1, Vec::new());
        }
        self.parameter_annotations[param].push(descriptor.to_string());
        self
    }
}

#[derive(Debug, Clone)]
struct InnerClassSpec {
    inner: String,
    outer: String,
    simple: String,
    access: u16,
}

/// Builds a minimal class file. Names are binary (dotted) names.
#[derive(Debug, Clone)]
pub struct ClassFileBuilder {
    name: String,
    super_name: Option<String>,
    interfaces: Vec<String>,
    access: u16,
    methods: Vec<MethodSpec>,
    inner_classes: Vec<InnerClassSpec>,
}

impl ClassFileBuilder {
    /// A public class extending `java.lang.Object`.
    pub fn class(name: &str) -> Self {
        Self {
            name: name.to_string(),
            super_name: Some("java.lang.Object".to_string()),
            interfaces: Vec::new(),
            access: ACC_PUBLIC,
            methods: Vec::new(),
            inner_classes: Vec::new(),
        }
    }

    /// A public interface.
    pub fn interface(name: &str) -> Self {
        let mut builder = Self::class(name);
        builder.access = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extends(mut self, super_name: &str) -> Self {
        self.super_name = Some(super_name.to_string());
        self
    }

    /// Emit no superclass (only `java.lang.Object` itself does this).
    pub fn without_super(mut self) -> Self {
        self.super_name = None;
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Shorthand for a public method.
    pub fn public_method(self, name: &str, descriptor: &str) -> Self {
        self.method(MethodSpec::public(name, descriptor))
    }

    /// Shorthand for a public abstract method (interface members).
    pub fn abstract_method(self, name: &str, descriptor: &str) -> Self {
        self.method(MethodSpec::new(name, descriptor, ACC_PUBLIC | ACC_ABSTRACT))
    }

    /// Record an `InnerClasses` entry declaring `self` as a member of `outer`.
    pub fn nested_in(mut self, outer: &str, simple_name: &str, access: u16) -> Self {
        self.inner_classes.push(InnerClassSpec {
            inner: self.name.clone(),
            outer: outer.to_string(),
            simple: simple_name.to_string(),
            access,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut cp = PoolBuilder::default();
        let mut body = Vec::new();

        put_u2(&mut body, self.access);
        put_u2(&mut body, cp.class(&self.name));
        put_u2(
            &mut body,
            self.super_name.as_deref().map_or(0, |name| cp.class(name)),
        );
        put_u2(&mut body, self.interfaces.len() as u16);
        for interface in &self.interfaces {
            put_u2(&mut body, cp.class(interface));
        }

        // fields_count
        put_u2(&mut body, 0);

        put_u2(&mut body, self.methods.len() as u16);
        for method in &self.methods {
            put_u2(&mut body, method.access);
            put_u2(&mut body, cp.utf8(&method.name));
            put_u2(&mut body, cp.utf8(&method.descriptor));

            let mut attrs: Vec<(u16, Vec<u8>)> = Vec::new();
            if method.deprecated_attribute {
                attrs.push((cp.utf8("Deprecated"), Vec::new()));
            }
            if !method.annotations.is_empty() {
                let mut info = Vec::new();
                put_u2(&mut info, method.annotations.len() as u16);
                for ann in &method.annotations {
                    put_annotation(&mut info, &mut cp, ann);
                }
                attrs.push((cp.utf8("RuntimeVisibleAnnotations"), info));
            }
            if !method.parameter_annotations.is_empty() {
                let mut info = vec![method.parameter_annotations.len() as u8];
                for anns in &method.parameter_annotations {
                    put_u2(&mut info, anns.len() as u16);
                    for ann in anns {
                        put_annotation(&mut info, &mut cp, ann);
                    }
                }
                attrs.push((cp.utf8("RuntimeInvisibleParameterAnnotations"), info));
            }
            put_attributes(&mut body, &attrs);
        }

        let mut class_attrs = Vec::new();
        if !self.inner_classes.is_empty() {
            let mut info = Vec::new();
            put_u2(&mut info, self.inner_classes.len() as u16);
            for inner in &self.inner_classes {
                put_u2(&mut info, cp.class(&inner.inner));
                put_u2(&mut info, cp.class(&inner.outer));
                put_u2(&mut info, cp.utf8(&inner.simple));
                put_u2(&mut info, inner.access);
            }
            class_attrs.push((cp.utf8("InnerClasses"), info));
        }
        put_attributes(&mut body, &class_attrs);

        let mut out = Vec::with_capacity(body.len() + 256);
        out.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
        put_u2(&mut out, 0);
        put_u2(&mut out, 52);
        cp.write(&mut out);
        out.extend_from_slice(&body);
        out
    }
}

fn put_u2(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_annotation(out: &mut Vec<u8>, cp: &mut PoolBuilder, descriptor: &str) {
    put_u2(out, cp.utf8(descriptor));
    // num_element_value_pairs
    put_u2(out, 0);
}

fn put_attributes(out: &mut Vec<u8>, attrs: &[(u16, Vec<u8>)]) {
    put_u2(out, attrs.len() as u16);
    for (name, info) in attrs {
        put_u2(out, *name);
        out.extend_from_slice(&(info.len() as u32).to_be_bytes());
        out.extend_from_slice(info);
    }
}

#[derive(Default)]
struct PoolBuilder {
    entries: Vec<Vec<u8>>,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl PoolBuilder {
    fn push(&mut self, entry: Vec<u8>) -> u16 {
        self.entries.push(entry);
        self.entries.len() as u16
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(idx) = self.utf8.get(value) {
            return *idx;
        }
        assert!(!value.contains('\0'), "test constants must not contain NUL");
        let mut entry = vec![1];
        put_u2(&mut entry, value.len() as u16);
        entry.extend_from_slice(value.as_bytes());
        let idx = self.push(entry);
        self.utf8.insert(value.to_string(), idx);
        idx
    }

    fn class(&mut self, binary_name: &str) -> u16 {
        if let Some(idx) = self.classes.get(binary_name) {
            return *idx;
        }
        let name_idx = self.utf8(&binary_name.replace('.', "/"));
        let mut entry = vec![7];
        put_u2(&mut entry, name_idx);
        let idx = self.push(entry);
        self.classes.insert(binary_name.to_string(), idx);
        idx
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_u2(out, self.entries.len() as u16 + 1);
        for entry in &self.entries {
            out.extend_from_slice(entry);
        }
    }
}
