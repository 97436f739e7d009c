use std::cell::RefCell;

use pretty_assertions::assert_eq;
use widgen_catalog::Catalog;
use widgen_gen::{
    Generator, GeneratorOptions, MemberKey, Nullability, NullabilityOracle, QuirksTable,
    RuntimeNames, Terminator,
};
use widgen_test_utils::{ClassFileBuilder, MethodSpec};

use super::{
    branch_tests, case, generate, generate_with, index_of, listener, text_types, widget, wrappers,
    ROOT,
};

fn some(name: &str) -> Option<String> {
    Some(name.to_string())
}

#[test]
fn deeper_targets_and_values_are_tested_first() {
    let mut classes = vec![
        widget().public_method("setValue", "(Ljava/lang/Object;)V"),
        ClassFileBuilder::class("ui.Panel")
            .extends(ROOT)
            .public_method("setValue", "(Lui/Text;)V"),
        ClassFileBuilder::class("ui.Grid")
            .extends("ui.Panel")
            .public_method("setValue", "(Lui/RichText;)V"),
        ClassFileBuilder::class("ui.Button")
            .extends(ROOT)
            .public_method("setValue", "(Lui/RichText;)V"),
    ];
    classes.extend(text_types());
    let generation = generate(&classes);

    assert_eq!(
        branch_tests(case(&generation, "value")),
        [
            (some("ui.Grid"), some("ui.RichText")),
            (some("ui.Button"), some("ui.RichText")),
            (some("ui.Panel"), some("ui.Text")),
            (None, some("java.lang.Object")),
        ]
    );
}

#[test]
fn root_setters_precede_the_root_listener() {
    let mut classes = vec![
        widget()
            .public_method("setOnClickListener", "(Lui/Widget$OnClickListener;)V")
            .public_method("setOnClick", "(Lui/Text;)V")
            .public_method("setOnClick", "(Lui/RichText;)V"),
        listener(ROOT, "OnClickListener").abstract_method("onClick", "(Lui/Widget;)V"),
    ];
    classes.extend(text_types());
    let generation = generate(&classes);

    let on_click = case(&generation, "onClick");
    assert_eq!(
        branch_tests(on_click),
        [
            (None, some("ui.RichText")),
            (None, some("ui.Text")),
            (None, None),
        ]
    );
    assert_eq!(on_click.terminator, Terminator::Exhaustive);
}

#[test]
fn root_listener_is_exhaustive_after_subtype_branches() {
    let generation = generate(&[
        widget().public_method("setOnClickListener", "(Lui/Widget$OnClickListener;)V"),
        listener(ROOT, "OnClickListener").abstract_method("onClick", "(Lui/Widget;)V"),
        listener("ui.Button", "OnClickListener").abstract_method("onClick", "(I)V"),
        ClassFileBuilder::class("ui.Button")
            .extends(ROOT)
            .public_method("setOnClickListener", "(Lui/Button$OnClickListener;)V"),
    ]);

    let on_click = case(&generation, "onClick");
    assert_eq!(
        branch_tests(on_click),
        [(some("ui.Button"), some("ui.Button.OnClickListener")), (None, None)]
    );
    assert_eq!(on_click.terminator, Terminator::Exhaustive);
}

#[test]
fn two_root_listeners_stay_guarded() {
    let generation = generate(&[
        widget()
            .public_method("setOnTouchListener", "(Lui/Widget$OnTouchListener;)V")
            .public_method("setOnTouchListener", "(Lui/Widget$TouchCallback;)V"),
        listener(ROOT, "OnTouchListener").abstract_method("onTouch", "(Lui/Widget;)Z"),
        listener(ROOT, "TouchCallback").abstract_method("touched", "()V"),
    ]);

    let on_touch = case(&generation, "onTouch");
    assert_eq!(
        branch_tests(on_touch),
        [
            (None, some("ui.Widget.OnTouchListener")),
            (None, some("ui.Widget.TouchCallback")),
        ]
    );
    assert_eq!(on_touch.terminator, Terminator::Unhandled);
}

#[test]
fn wrapper_parameter_is_primitive_only_when_every_declaration_is() {
    let generation = generate(&[
        widget(),
        ClassFileBuilder::class("ui.Panel")
            .extends(ROOT)
            .public_method("setCount", "(I)V")
            .public_method("setWeight", "(F)V"),
        ClassFileBuilder::class("ui.Toggle")
            .extends(ROOT)
            .public_method("setCount", "(Ljava/lang/Integer;)V"),
    ]);

    assert_eq!(
        branch_tests(case(&generation, "count")),
        [
            (some("ui.Panel"), some("java.lang.Integer")),
            (some("ui.Toggle"), some("java.lang.Integer")),
        ]
    );
    assert_eq!(
        wrappers(&generation),
        [
            ("count".to_string(), "java.lang.Integer".to_string()),
            ("weight".to_string(), "float".to_string()),
        ]
    );
}

#[test]
fn wrapper_nullability_combines_declarations() {
    let nullable = "Landroidx/annotation/Nullable;";
    let non_null = "Landroidx/annotation/NonNull;";
    let classes = [
        widget(),
        ClassFileBuilder::class("ui.Panel")
            .extends(ROOT)
            .method(
                MethodSpec::public("setHint", "(Ljava/lang/CharSequence;)V")
                    .param_annotated(0, nullable),
            )
            .method(MethodSpec::public("setTitle", "(Ljava/lang/String;)V").param_annotated(0, non_null))
            .method(MethodSpec::public("setTag", "(Ljava/lang/Object;)V").param_annotated(0, non_null)),
        ClassFileBuilder::class("ui.Toggle")
            .extends(ROOT)
            .public_method("setHint", "(Ljava/lang/CharSequence;)V")
            .method(MethodSpec::public("setTitle", "(Ljava/lang/String;)V").param_annotated(0, non_null))
            .public_method("setTag", "(Ljava/lang/Object;)V"),
    ];
    let options = GeneratorOptions {
        runtime: RuntimeNames {
            nullable_annotation: Some("androidx.annotation.Nullable".to_string()),
            non_null_annotation: Some("androidx.annotation.NonNull".to_string()),
            ..RuntimeNames::default()
        },
        ..GeneratorOptions::default()
    };
    let generation = generate_with(&classes, &QuirksTable::new(), &options);

    let nullability: Vec<(String, Nullability)> = generation
        .document
        .wrappers()
        .map(|w| (w.function_name.clone(), w.nullability))
        .collect();
    assert_eq!(
        nullability,
        [
            ("hint".to_string(), Nullability::Nullable),
            ("tag".to_string(), Nullability::Unknown),
            ("title".to_string(), Nullability::NonNull),
        ]
    );

    let source = generation.source();
    assert!(source.contains(
        "public static Void hint(@androidx.annotation.Nullable java.lang.CharSequence arg) {"
    ));
    assert!(source.contains("public static Void tag(java.lang.Object arg) {"));
    assert!(source.contains(
        "public static Void title(@androidx.annotation.NonNull java.lang.String arg) {"
    ));
    // The Panel hint branch lets null through; the Toggle one does not.
    assert!(source.contains(
        "if (v instanceof ui.Panel && (arg == null || arg instanceof java.lang.CharSequence)) {"
    ));
    assert!(source.contains("if (v instanceof ui.Toggle && arg instanceof java.lang.CharSequence) {"));
}

#[test]
fn same_class_overloads_of_one_value_type_collapse() {
    let generation = generate(&[widget()
        .public_method("setAlpha", "(F)V")
        .public_method("setAlpha", "(Ljava/lang/Float;)V")]);

    let alpha = case(&generation, "alpha");
    assert_eq!(alpha.branches.len(), 1);
    assert!(generation.source().contains("v.setAlpha((java.lang.Float) arg);"));
    assert_eq!(
        wrappers(&generation),
        [("alpha".to_string(), "java.lang.Float".to_string())]
    );
}

#[test]
fn interface_value_types_precede_their_super_interfaces() {
    let generation = generate(&[
        widget()
            .public_method("setLabel", "(Lui/Text;)V")
            .public_method("setLabel", "(Lui/TextRich;)V")
            .public_method("setLabel", "(Lui/PlainText;)V"),
        ClassFileBuilder::interface("ui.Text"),
        ClassFileBuilder::interface("ui.TextRich").implements("ui.Text"),
        ClassFileBuilder::class("ui.PlainText").implements("ui.Text"),
    ]);

    assert_eq!(
        branch_tests(case(&generation, "label")),
        [
            (None, some("ui.PlainText")),
            (None, some("ui.TextRich")),
            (None, some("ui.Text")),
        ]
    );
}

#[test]
fn setters_returning_a_value_are_attributes() {
    let generation = generate(&[
        widget().public_method("setLabel", "(Ljava/lang/String;)Lui/Widget;"),
        ClassFileBuilder::class("ui.Button")
            .extends(ROOT)
            .public_method("setDepth", "(I)Z"),
    ]);

    assert_eq!(
        branch_tests(case(&generation, "label")),
        [(None, some("java.lang.String"))]
    );
    assert_eq!(
        branch_tests(case(&generation, "depth")),
        [(some("ui.Button"), some("java.lang.Integer"))]
    );
    assert_eq!(
        wrappers(&generation),
        [
            ("depth".to_string(), "int".to_string()),
            ("label".to_string(), "java.lang.String".to_string()),
        ]
    );
    assert!(generation
        .source()
        .contains("v.setLabel((java.lang.String) arg);"));
}

/// Answers non-null and records every key it is asked about.
#[derive(Default)]
struct RecordingOracle {
    keys: RefCell<Vec<String>>,
}

impl NullabilityOracle for RecordingOracle {
    fn nullability(&self, key: &MemberKey<'_>) -> Nullability {
        self.keys.borrow_mut().push(key.table_key());
        Nullability::NonNull
    }
}

#[test]
fn wrapper_parameters_are_asked_of_the_oracle_again() {
    let classes = [
        widget()
            .public_method("setTitle", "(Ljava/lang/String;)V")
            .public_method("setDepth", "(I)V")
            .public_method("setOnClickListener", "(Lui/Widget$OnClickListener;)V"),
        listener(ROOT, "OnClickListener").abstract_method("onClick", "(Lui/Widget;)V"),
    ];
    let index = index_of(&classes);
    let catalog = Catalog::build(&index, ROOT, classes.iter().map(|b| b.name())).unwrap();
    let oracle = RecordingOracle::default();
    let quirks = QuirksTable::new();
    let options = GeneratorOptions::default();

    let generation = Generator::new(&index, &oracle, &quirks, &options)
        .generate(&catalog)
        .unwrap();

    // Once while classifying, once for the wrapper. Listeners accept null
    // regardless, so their wrapper does not ask; primitives never do.
    let title = "ui.Widget#setTitle(java.lang.String)";
    let click = "ui.Widget#setOnClickListener(ui.Widget.OnClickListener)";
    let mut keys = oracle.keys.borrow().clone();
    keys.sort();
    assert_eq!(keys, [click, title, title]);

    let nullability: Vec<(String, Nullability)> = generation
        .document
        .wrappers()
        .map(|w| (w.function_name.clone(), w.nullability))
        .collect();
    assert_eq!(
        nullability,
        [
            ("depth".to_string(), Nullability::NonNull),
            ("onClick".to_string(), Nullability::Nullable),
            ("title".to_string(), Nullability::NonNull),
        ]
    );
}
