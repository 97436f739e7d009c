//! Minimal JVM class-file reader.
//!
//! Only the parts of the format needed to describe a class's public surface are
//! decoded: the constant pool, class header, methods, and the handful of
//! attributes that carry deprecation, annotations, and nesting information.
//! Everything else is skipped by length.
#![forbid(unsafe_code)]

mod access;
mod annotation;
mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod reader;

pub use crate::access::AccessFlags;
pub use crate::annotation::Annotation;
pub use crate::classfile::{ClassFile, InnerClassInfo, MethodInfo};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
