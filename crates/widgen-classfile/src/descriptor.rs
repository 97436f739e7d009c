use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    /// The Java keyword for this primitive.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }

    /// Binary name of the wrapper class used when the value is boxed.
    #[must_use]
    pub fn boxed_binary_name(self) -> &'static str {
        match self {
            BaseType::Byte => "java.lang.Byte",
            BaseType::Char => "java.lang.Character",
            BaseType::Double => "java.lang.Double",
            BaseType::Float => "java.lang.Float",
            BaseType::Int => "java.lang.Integer",
            BaseType::Long => "java.lang.Long",
            BaseType::Short => "java.lang.Short",
            BaseType::Boolean => "java.lang.Boolean",
        }
    }
}

/// An erased field/parameter type. Object types hold the binary (dotted) name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    Base(BaseType),
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, FieldType::Base(_))
    }

    /// The innermost component of an array type, or the type itself.
    #[must_use]
    pub fn element_type(&self) -> &FieldType {
        match self {
            FieldType::Array(component) => component.element_type(),
            other => other,
        }
    }

    /// Binary name of the referenced class for object types (arrays unwrap to
    /// their element).
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        match self.element_type() {
            FieldType::Object(name) => Some(name),
            _ => None,
        }
    }

    /// Re-encode as a JVM field descriptor.
    #[must_use]
    pub fn descriptor(&self) -> String {
        match self {
            FieldType::Base(base) => match base {
                BaseType::Byte => "B",
                BaseType::Char => "C",
                BaseType::Double => "D",
                BaseType::Float => "F",
                BaseType::Int => "I",
                BaseType::Long => "J",
                BaseType::Short => "S",
                BaseType::Boolean => "Z",
            }
            .to_string(),
            FieldType::Object(name) => format!("L{};", name.replace('.', "/")),
            FieldType::Array(component) => format!("[{}", component.descriptor()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

impl MethodDescriptor {
    /// The parameter part of the descriptor, e.g. `(ILjava/lang/String;)`.
    ///
    /// Two methods with the same name and parameter descriptor override each
    /// other regardless of their return types.
    #[must_use]
    pub fn params_descriptor(&self) -> String {
        let mut out = String::from("(");
        for param in &self.params {
            out.push_str(&param.descriptor());
        }
        out.push(')');
        out
    }
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let invalid = || Error::InvalidDescriptor(desc.to_string());

    let mut rest = desc.strip_prefix('(').ok_or_else(invalid)?;
    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(invalid());
        }
        let (param, after) = parse_field_type(rest).map_err(|_| invalid())?;
        params.push(param);
        rest = after;
    }

    let return_type = if rest == "V" {
        ReturnType::Void
    } else {
        ReturnType::Type(parse_field_descriptor(rest).map_err(|_| invalid())?)
    };

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn parse_field_type(input: &str) -> Result<(FieldType, &str)> {
    let invalid = || Error::InvalidDescriptor(input.to_string());
    let first = input.chars().next().ok_or_else(invalid)?;
    let base = |b| Ok((FieldType::Base(b), &input[1..]));
    match first {
        'B' => base(BaseType::Byte),
        'C' => base(BaseType::Char),
        'D' => base(BaseType::Double),
        'F' => base(BaseType::Float),
        'I' => base(BaseType::Int),
        'J' => base(BaseType::Long),
        'S' => base(BaseType::Short),
        'Z' => base(BaseType::Boolean),
        'L' => {
            let end = input.find(';').ok_or_else(invalid)?;
            let internal = &input[1..end];
            if internal.is_empty() {
                return Err(invalid());
            }
            Ok((FieldType::Object(internal.replace('/', ".")), &input[end + 1..]))
        }
        '[' => {
            let (component, rest) = parse_field_type(&input[1..])?;
            Ok((FieldType::Array(Box::new(component)), rest))
        }
        _ => Err(invalid()),
    }
}
