//! Java source rendering of erased types.

use widgen_catalog::canonical_name;
use widgen_classfile::FieldType;

/// Source form of a type: `int`, `java.lang.CharSequence`, `a.B.C[]`.
pub fn java_type(ty: &FieldType) -> String {
    match ty {
        FieldType::Base(base) => base.keyword().to_string(),
        FieldType::Object(name) => canonical_name(name),
        FieldType::Array(component) => format!("{}[]", java_type(component)),
    }
}

/// The runtime type an `Object` value carries for `ty`: primitives box, every
/// other type is unchanged.
pub fn boxed(ty: &FieldType) -> FieldType {
    match ty {
        FieldType::Base(base) => FieldType::Object(base.boxed_binary_name().to_string()),
        other => other.clone(),
    }
}

const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "null", "package", "private", "protected", "public", "return",
    "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while", "_",
];

/// `name` unless it is a reserved word, in which case `name_`.
pub fn java_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Lower-case the first character: `TextView` becomes `textView`.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
