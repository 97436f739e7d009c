use widgen_classfile::{ClassFile, Error, FieldType};
use widgen_test_utils::{ClassFileBuilder, MethodSpec, ACC_PUBLIC, ACC_STATIC};

#[test]
fn parses_header_and_methods() {
    let bytes = ClassFileBuilder::class("com.example.ui.Button")
        .extends("com.example.ui.Widget")
        .implements("com.example.ui.Clickable")
        .public_method("setLabel", "(Lcom/example/ui/Text;)V")
        .method(MethodSpec::new("create", "()Lcom/example/ui/Button;", ACC_PUBLIC | ACC_STATIC))
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    assert_eq!(class.this_class, "com.example.ui.Button");
    assert_eq!(class.super_class.as_deref(), Some("com.example.ui.Widget"));
    assert_eq!(class.interfaces, vec!["com.example.ui.Clickable".to_string()]);
    assert!(class.access_flags.is_public());
    assert_eq!(class.major_version, 52);

    let names: Vec<_> = class.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["setLabel", "create"]);
    assert!(class.methods[1].access_flags.is_static());
    assert!(!class.methods[0].deprecated);
}

#[test]
fn deprecation_comes_from_attribute_or_annotation() {
    let bytes = ClassFileBuilder::class("com.example.ui.Widget")
        .method(MethodSpec::public("setOld", "(I)V").deprecated())
        .method(MethodSpec::public("setOlder", "(I)V").annotated("Ljava/lang/Deprecated;"))
        .public_method("setFresh", "(I)V")
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    let deprecated: Vec<_> = class.methods.iter().map(|m| m.deprecated).collect();
    assert_eq!(deprecated, [true, true, false]);
}

#[test]
fn parameter_annotations_are_indexed_by_parameter() {
    let bytes = ClassFileBuilder::class("com.example.ui.Widget")
        .method(
            MethodSpec::public("setTag", "(Ljava/lang/Object;)V")
                .param_annotated(0, "Landroidx/annotation/Nullable;"),
        )
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    let params = &class.methods[0].parameter_annotations;
    assert_eq!(params.len(), 1);
    assert_eq!(params[0][0].simple_name().as_deref(), Some("Nullable"));
}

#[test]
fn nested_classes_expose_their_own_inner_class_entry() {
    let bytes = ClassFileBuilder::interface("com.example.ui.Widget$OnTapListener")
        .nested_in("com.example.ui.Widget", "OnTapListener", ACC_PUBLIC | ACC_STATIC)
        .abstract_method("onTap", "(Lcom/example/ui/Widget;)V")
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    assert!(class.access_flags.is_interface());
    let entry = class.own_inner_class_entry().unwrap();
    assert_eq!(entry.outer_class.as_deref(), Some("com.example.ui.Widget"));
    assert_eq!(entry.inner_name.as_deref(), Some("OnTapListener"));
    assert!(class.methods[0].access_flags.is_abstract());
}

#[test]
fn method_descriptors_parse_into_dotted_types() {
    let bytes = ClassFileBuilder::class("com.example.ui.Widget")
        .public_method("setFilters", "([Lcom/example/text/Filter;)V")
        .build();
    let class = ClassFile::parse(&bytes).unwrap();
    let desc = widgen_classfile::parse_method_descriptor(&class.methods[0].descriptor).unwrap();
    assert_eq!(
        desc.params[0],
        FieldType::Array(Box::new(FieldType::Object("com.example.text.Filter".to_string())))
    );
}

#[test]
fn rejects_bad_magic_and_truncation() {
    assert_eq!(
        ClassFile::parse(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap_err(),
        Error::InvalidMagic(0xDEADBEEF)
    );

    let bytes = ClassFileBuilder::class("com.example.ui.Widget").build();
    for len in [0, 4, 9, bytes.len() - 1] {
        assert!(ClassFile::parse(&bytes[..len]).is_err(), "prefix of {len} bytes parsed");
    }

    // Magic and versions take 8 bytes; the constant pool count is cut short.
    assert_eq!(
        ClassFile::parse(&bytes[..9]).unwrap_err(),
        Error::UnexpectedEof {
            offset: 8,
            wanted: 2
        }
    );

    let mut padded = bytes.clone();
    padded.push(0);
    assert_eq!(ClassFile::parse(&padded).unwrap_err(), Error::TrailingBytes(1));
}
