use crate::access::AccessFlags;
use crate::annotation::Annotation;
use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Reader;

const DEPRECATED_ANNOTATION: &str = "Ljava/lang/Deprecated;";

/// A parsed class file. Names are binary (dotted) names.
#[derive(Debug, Clone)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: AccessFlags,
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub methods: Vec<MethodInfo>,
    pub deprecated: bool,
    pub annotations: Vec<Annotation>,
    pub inner_classes: Vec<InnerClassInfo>,
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub access_flags: AccessFlags,
    pub name: String,
    pub descriptor: String,
    /// Set by either the `Deprecated` attribute or `@java.lang.Deprecated`.
    pub deprecated: bool,
    pub annotations: Vec<Annotation>,
    /// Visible and invisible parameter annotations merged, indexed by parameter.
    pub parameter_annotations: Vec<Vec<Annotation>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassInfo {
    pub inner_class: String,
    pub outer_class: Option<String>,
    pub inner_name: Option<String>,
    pub access_flags: AccessFlags,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.read_u4()?;
        if magic != 0xCAFEBABE {
            return Err(Error::InvalidMagic(magic));
        }

        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let cp = ConstantPool::parse(&mut reader)?;

        let access_flags = AccessFlags(reader.read_u2()?);
        let this_class = binary_name(&cp.get_class_name(reader.read_u2()?)?);
        let super_class = match reader.read_u2()? {
            0 => None,
            idx => Some(binary_name(&cp.get_class_name(idx)?)),
        };

        let interfaces_count = reader.read_u2()? as usize;
        let mut interfaces = Vec::with_capacity(interfaces_count);
        for _ in 0..interfaces_count {
            interfaces.push(binary_name(&cp.get_class_name(reader.read_u2()?)?));
        }

        // Fields don't contribute to the attribute surface; parse to validate
        // and drop.
        let fields_count = reader.read_u2()? as usize;
        for _ in 0..fields_count {
            parse_member(&mut reader, &cp)?;
        }

        let methods_count = reader.read_u2()? as usize;
        let mut methods = Vec::with_capacity(methods_count);
        for _ in 0..methods_count {
            methods.push(parse_member(&mut reader, &cp)?);
        }

        let attrs = parse_attributes(&mut reader, &cp, AttributeTarget::Class)?;

        reader.ensure_empty()?;

        Ok(Self {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            methods,
            deprecated: attrs.deprecated,
            annotations: attrs.annotations,
            inner_classes: attrs.inner_classes,
        })
    }

    /// The `InnerClasses` entry describing this class itself, if it is nested.
    #[must_use]
    pub fn own_inner_class_entry(&self) -> Option<&InnerClassInfo> {
        self.inner_classes
            .iter()
            .find(|entry| entry.inner_class == self.this_class)
    }
}

fn binary_name(internal: &str) -> String {
    internal.replace('/', ".")
}

fn parse_member(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<MethodInfo> {
    let access_flags = AccessFlags(reader.read_u2()?);
    let name = cp.get_utf8(reader.read_u2()?)?.to_string();
    let descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();

    let attrs = parse_attributes(reader, cp, AttributeTarget::Member)?;
    Ok(MethodInfo {
        access_flags,
        name,
        descriptor,
        deprecated: attrs.deprecated,
        annotations: attrs.annotations,
        parameter_annotations: attrs.parameter_annotations,
    })
}

#[derive(Default)]
struct ParsedAttributes {
    deprecated: bool,
    annotations: Vec<Annotation>,
    parameter_annotations: Vec<Vec<Annotation>>,
    inner_classes: Vec<InnerClassInfo>,
}

enum AttributeTarget {
    Class,
    Member,
}

fn parse_attributes(
    reader: &mut Reader<'_>,
    cp: &ConstantPool,
    target: AttributeTarget,
) -> Result<ParsedAttributes> {
    let attributes_count = reader.read_u2()? as usize;
    let mut parsed = ParsedAttributes::default();
    for _ in 0..attributes_count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        let info = reader.read_bytes(length)?;
        let name = cp.get_utf8(name_index)?;

        match name {
            "Deprecated" => {
                if !info.is_empty() {
                    return Err(Error::malformed(
                        "Deprecated",
                        format!("expected empty body, found {} bytes", info.len()),
                    ));
                }
                parsed.deprecated = true;
            }
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                parsed.annotations.extend(Annotation::parse_list(info, cp)?);
            }
            "RuntimeVisibleParameterAnnotations" | "RuntimeInvisibleParameterAnnotations"
                if matches!(target, AttributeTarget::Member) =>
            {
                let lists = Annotation::parse_parameter_lists(info, cp)?;
                if parsed.parameter_annotations.len() < lists.len() {
                    parsed.parameter_annotations.resize(lists.len(), Vec::new());
                }
                for (slot, anns) in parsed.parameter_annotations.iter_mut().zip(lists) {
                    slot.extend(anns);
                }
            }
            "InnerClasses" if matches!(target, AttributeTarget::Class) => {
                let mut sub = Reader::new(info);
                let num = sub.read_u2()? as usize;
                for _ in 0..num {
                    let inner_class = binary_name(&cp.get_class_name(sub.read_u2()?)?);
                    let outer_class = match sub.read_u2()? {
                        0 => None,
                        idx => Some(binary_name(&cp.get_class_name(idx)?)),
                    };
                    let inner_name = match sub.read_u2()? {
                        0 => None,
                        idx => Some(cp.get_utf8(idx)?.to_string()),
                    };
                    let access_flags = AccessFlags(sub.read_u2()?);
                    parsed.inner_classes.push(InnerClassInfo {
                        inner_class,
                        outer_class,
                        inner_name,
                        access_flags,
                    });
                }
                sub.ensure_empty()?;
            }
            _ => {
                // Code, Signature, LineNumberTable, etc.
            }
        }
    }

    if parsed
        .annotations
        .iter()
        .any(|ann| ann.type_descriptor == DEPRECATED_ANNOTATION)
    {
        parsed.deprecated = true;
    }

    Ok(parsed)
}
