use widgen_catalog::{
    ancestors_up_to, class_depth, is_strict_subclass, super_interfaces, type_depth, Ancestry,
    ClassLoader,
};
use widgen_test_utils::ClassFileBuilder;

use super::index_of;

fn widgets() -> Vec<ClassFileBuilder> {
    vec![
        ClassFileBuilder::class("ui.Widget"),
        ClassFileBuilder::class("ui.Label").extends("ui.Widget"),
        ClassFileBuilder::class("ui.Button").extends("ui.Label"),
        ClassFileBuilder::class("ui.Orphan").extends("missing.Base"),
        ClassFileBuilder::interface("ui.Listener").implements("ui.EventListener"),
        ClassFileBuilder::interface("ui.EventListener"),
    ]
}

#[test]
fn ancestors_stop_at_root() {
    let index = index_of(&widgets());
    let button = index.load("ui.Button").unwrap();
    let Ancestry::Descends(chain) = ancestors_up_to(&index, button, "ui.Widget") else {
        panic!("expected Button to descend from Widget");
    };
    let names: Vec<_> = chain.iter().map(|s| s.binary_name.as_str()).collect();
    assert_eq!(names, ["ui.Label", "ui.Widget"]);
}

#[test]
fn ancestors_report_missing_links_and_unrelated_chains() {
    let index = index_of(&widgets());
    let orphan = index.load("ui.Orphan").unwrap();
    assert!(matches!(
        ancestors_up_to(&index, orphan, "ui.Widget"),
        Ancestry::Missing(name) if name == "missing.Base"
    ));

    let widget = index.load("ui.Widget").unwrap();
    assert!(matches!(
        ancestors_up_to(&index, widget, "ui.Button"),
        Ancestry::Unrelated
    ));
}

#[test]
fn strict_subclass_and_depth() {
    let index = index_of(&widgets());
    assert!(is_strict_subclass(&index, "ui.Button", "ui.Widget"));
    assert!(is_strict_subclass(&index, "ui.Button", "ui.Label"));
    assert!(!is_strict_subclass(&index, "ui.Widget", "ui.Button"));
    assert!(!is_strict_subclass(&index, "ui.Button", "ui.Button"));

    // Object is not in the index, but still counts as one link.
    assert_eq!(class_depth(&index, "ui.Widget"), 1);
    assert_eq!(class_depth(&index, "ui.Button"), 3);
    assert_eq!(class_depth(&index, "not.Loaded"), 0);
}

#[test]
fn super_interfaces_are_transitive() {
    let index = index_of(&widgets());
    let (found, missing) = super_interfaces(&index, "ui.Listener");
    let names: Vec<_> = found.iter().map(|s| s.binary_name.as_str()).collect();
    assert_eq!(names, ["ui.EventListener", "ui.Listener"]);
    assert!(missing.is_empty());
}

#[test]
fn type_depth_follows_interface_links() {
    let mut classes = widgets();
    classes.push(ClassFileBuilder::class("ui.Handler").implements("ui.Listener"));
    let index = index_of(&classes);

    // Superclass-only depth cannot tell these apart.
    assert_eq!(class_depth(&index, "ui.EventListener"), 1);
    assert_eq!(class_depth(&index, "ui.Listener"), 1);

    assert_eq!(type_depth(&index, "ui.EventListener"), 1);
    assert_eq!(type_depth(&index, "ui.Listener"), 2);
    assert_eq!(type_depth(&index, "ui.Handler"), 3);
    assert_eq!(type_depth(&index, "ui.Button"), class_depth(&index, "ui.Button"));
    assert_eq!(type_depth(&index, "not.Loaded"), 0);
}
