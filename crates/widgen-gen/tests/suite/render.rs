use insta::assert_snapshot;
use widgen_catalog::Catalog;
use widgen_gen::{
    AnnotationOracle, GenerateError, Generator, GeneratorOptions, QuirksTable,
};
use widgen_test_utils::ClassFileBuilder;

use super::{generate_with, index_of, listener, text_types, widget, ROOT};

fn library() -> Vec<ClassFileBuilder> {
    let mut classes = vec![
        widget()
            .public_method("setLabel", "(Lui/Text;)V")
            .public_method("setOnClickListener", "(Lui/Widget$OnClickListener;)V")
            .public_method("setEnabled", "(Z)V"),
        listener(ROOT, "OnClickListener").abstract_method("onClick", "(Lui/Widget;)V"),
        ClassFileBuilder::class("ui.Button")
            .extends(ROOT)
            .public_method("setLabel", "(Lui/RichText;)V")
            .public_method("setOnPressListener", "(Lui/Button$OnPressListener;)V"),
        listener("ui.Button", "OnPressListener")
            .abstract_method("onPress", "(Lui/Widget;I)Z")
            .abstract_method("toString", "()Ljava/lang/String;"),
    ];
    classes.extend(text_types());
    classes
}

#[test]
fn renders_compilation_unit() {
    let options = GeneratorOptions {
        package: Some("com.example".to_string()),
        ..GeneratorOptions::default()
    };
    let generation = generate_with(&library(), &QuirksTable::new(), &options);

    assert_snapshot!(
        generation.source(),
        @r###"
// Generated by widgen. Do not edit.

package com.example;

@SuppressWarnings({"rawtypes", "unchecked"})
public final class WidgetDsl implements widgen.runtime.Dsl.AttributeSetter<Object> {

    public static widgen.runtime.BaseDsl.ViewClassResult button() {
        return widgen.runtime.BaseDsl.v(ui.Button.class);
    }

    public static Void button(widgen.runtime.Dsl.Renderable r) {
        return widgen.runtime.BaseDsl.v(ui.Button.class, r);
    }

    public static Void enabled(boolean arg) {
        return widgen.runtime.BaseDsl.attr("enabled", arg);
    }

    public static Void label(ui.RichText arg) {
        return widgen.runtime.BaseDsl.attr("label", arg);
    }

    public static Void label(ui.Text arg) {
        return widgen.runtime.BaseDsl.attr("label", arg);
    }

    public static Void onClick(ui.Widget.OnClickListener arg) {
        return widgen.runtime.BaseDsl.attr("onClick", arg);
    }

    public static Void onPress(ui.Button.OnPressListener arg) {
        return widgen.runtime.BaseDsl.attr("onPress", arg);
    }

    public boolean set(ui.Widget v, String name, final Object arg, final Object old) {
        switch (name) {
            case "enabled":
                if (arg instanceof java.lang.Boolean) {
                    v.setEnabled((boolean) arg);
                    return true;
                }
                break;
            case "label":
                if (v instanceof ui.Button && arg instanceof ui.RichText) {
                    ((ui.Button) v).setLabel((ui.RichText) arg);
                    return true;
                }
                if (arg instanceof ui.Text) {
                    v.setLabel((ui.Text) arg);
                    return true;
                }
                break;
            case "onClick":
                if (arg != null) {
                    v.setOnClickListener(new ui.Widget.OnClickListener() {
                        public void onClick(ui.Widget a0) {
                            ((ui.Widget.OnClickListener) arg).onClick(a0);
                            widgen.runtime.Dsl.render();
                        }
                    });
                } else {
                    v.setOnClickListener((ui.Widget.OnClickListener) null);
                }
                return true;
            case "onPress":
                if (v instanceof ui.Button && (arg == null || arg instanceof ui.Button.OnPressListener)) {
                    if (arg != null) {
                        ((ui.Button) v).setOnPressListener(new ui.Button.OnPressListener() {
                            public boolean onPress(ui.Widget a0, int a1) {
                                boolean r = ((ui.Button.OnPressListener) arg).onPress(a0, a1);
                                widgen.runtime.Dsl.render();
                                return r;
                            }
                        });
                    } else {
                        ((ui.Button) v).setOnPressListener((ui.Button.OnPressListener) null);
                    }
                    return true;
                }
                break;
        }
        return false;
    }
}
"###
    );
}

#[test]
fn listener_wrapper_renders_once_per_callback() {
    let generation = generate_with(
        &[
            widget().public_method("setOnScrollListener", "(Lui/Widget$OnScrollListener;)V"),
            listener(ROOT, "OnScrollListener")
                .implements("ui.Widget$OnStopListener")
                .abstract_method("onScroll", "(II)V")
                .abstract_method("equals", "(Ljava/lang/Object;)Z"),
            listener(ROOT, "OnStopListener")
                .abstract_method("onStop", "()V")
                .abstract_method("onScroll", "(II)V"),
        ],
        &QuirksTable::new(),
        &GeneratorOptions::default(),
    );
    let source = generation.source();

    assert_eq!(source.matches("widgen.runtime.Dsl.render();").count(), 2);
    assert!(source.contains("public void onScroll(int a0, int a1) {"));
    assert!(source.contains("public void onStop() {"));
    assert!(!source.contains("public boolean equals"));
    assert!(source.contains("v.setOnScrollListener((ui.Widget.OnScrollListener) null);"));
}

#[test]
fn empty_header_and_package_are_omitted() {
    let options = GeneratorOptions {
        header: Vec::new(),
        class_name: "Attrs".to_string(),
        ..GeneratorOptions::default()
    };
    let generation = generate_with(&[widget()], &QuirksTable::new(), &options);

    assert_snapshot!(
        generation.source(),
        @r###"
@SuppressWarnings({"rawtypes", "unchecked"})
public final class Attrs implements widgen.runtime.Dsl.AttributeSetter<Object> {

    public boolean set(ui.Widget v, String name, final Object arg, final Object old) {
        switch (name) {
        }
        return false;
    }
}
"###
    );
}

#[test]
fn rejects_invalid_output_names() {
    let index = index_of(&[widget()]);
    let catalog = Catalog::build(&index, ROOT, [ROOT]).unwrap();
    let oracle = AnnotationOracle::default();
    let quirks = QuirksTable::new();

    let options = GeneratorOptions {
        class_name: "class".to_string(),
        ..GeneratorOptions::default()
    };
    let err = Generator::new(&index, &oracle, &quirks, &options)
        .generate(&catalog)
        .unwrap_err();
    assert!(matches!(err, GenerateError::InvalidClassName(name) if name == "class"));

    let options = GeneratorOptions {
        package: Some("com..example".to_string()),
        ..GeneratorOptions::default()
    };
    let err = Generator::new(&index, &oracle, &quirks, &options)
        .generate(&catalog)
        .unwrap_err();
    assert!(matches!(err, GenerateError::InvalidPackage(_)));
}

#[test]
fn report_lists_factories_and_resolved_declarations() {
    let generation = generate_with(&library(), &QuirksTable::new(), &GeneratorOptions::default());
    let report = generation.report();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["root"], "ui.Widget");
    assert_eq!(json["classes"][0]["factory"], "button");
    assert_eq!(json["attributes"][1]["name"], "label");
    assert_eq!(json["attributes"][1]["declarations"][0]["class"], "ui.Button");
    assert_eq!(json["attributes"][3]["declarations"][0]["kind"], "listener");
    assert_eq!(json["attributes"][0]["declarations"][0]["nullability"], "non-null");

    let text = report.to_string();
    assert!(text.contains("  ui.Button -> button\n"), "{text}");
    assert!(
        text.contains("    ui.Widget.setOnClickListener(ui.Widget.OnClickListener) [listener]\n"),
        "{text}"
    );
}
