use tempfile::TempDir;
use widgen_archive::Archive;
use widgen_catalog::{Catalog, CatalogError, ClassIndex};
use widgen_test_utils::{
    build_all, write_jar, ClassFileBuilder, ACC_ABSTRACT, ACC_PUBLIC, ACC_STATIC,
};

use super::index_of;

fn library() -> Vec<ClassFileBuilder> {
    vec![
        ClassFileBuilder::class("ui.Widget"),
        ClassFileBuilder::class("ui.widget.TextField").extends("ui.Widget"),
        ClassFileBuilder::class("ui.widget.Button").extends("ui.widget.TextField"),
        ClassFileBuilder::class("ui.widget.AbstractList")
            .extends("ui.Widget")
            .access(ACC_PUBLIC | ACC_ABSTRACT),
        ClassFileBuilder::class("ui.widget.Hidden")
            .extends("ui.Widget")
            .access(0),
        ClassFileBuilder::class("ui.widget.Button$Inner")
            .extends("ui.Widget")
            .nested_in("ui.widget.Button", "Inner", ACC_PUBLIC | ACC_STATIC),
        ClassFileBuilder::class("ui.text.Text"),
        ClassFileBuilder::class("ui.widget.Broken").extends("vendor.MissingBase"),
    ]
}

fn names(catalog: &Catalog) -> Vec<&str> {
    catalog.classes().iter().map(String::as_str).collect()
}

#[test]
fn filters_to_public_top_level_subtypes_sorted_by_name() {
    let builders = library();
    let index = index_of(&builders);
    let candidates: Vec<_> = builders.iter().map(|b| b.name()).collect();

    let catalog = Catalog::build(&index, "ui.Widget", candidates).unwrap();
    assert_eq!(catalog.root(), "ui.Widget");
    assert_eq!(
        names(&catalog),
        ["ui.widget.AbstractList", "ui.widget.Button", "ui.widget.TextField"]
    );
    assert!(!catalog.contains("ui.Widget"));
}

#[test]
fn missing_dependency_is_skipped_not_fatal() {
    let index = index_of(&library());
    let catalog = Catalog::build(&index, "ui.Widget", ["ui.widget.Broken", "ui.widget.Button"])
        .unwrap();
    assert_eq!(names(&catalog), ["ui.widget.Button"]);
}

#[test]
fn missing_root_is_fatal() {
    let index = index_of(&library());
    let err = Catalog::build(&index, "ui.Nope", ["ui.widget.Button"]).unwrap_err();
    assert!(matches!(err, CatalogError::MissingRoot(name) if name == "ui.Nope"));
}

#[test]
fn scan_reads_archives_and_keeps_first_definition() {
    let tmp = TempDir::new().unwrap();
    let lib = tmp.path().join("lib.jar");
    let platform = tmp.path().join("platform.jar");
    write_jar(&lib, &build_all(&library())).unwrap();
    write_jar(
        &platform,
        &build_all(&[
            ClassFileBuilder::class("vendor.MissingBase").extends("ui.Widget"),
            // Shadowed by lib.jar's definition.
            ClassFileBuilder::class("ui.Widget").public_method("setShadow", "(I)V"),
        ]),
    )
    .unwrap();

    let scanned = ClassIndex::scan(
        &[Archive::open(&lib).unwrap()],
        &[Archive::open(&platform).unwrap()],
    )
    .unwrap();
    assert_eq!(scanned.scanned.len(), library().len());

    let widget = widgen_catalog::ClassLoader::load(&scanned.index, "ui.Widget").unwrap();
    assert!(widget.methods.is_empty());
    assert_eq!(widget.origin, lib);

    // With the platform jar on the classpath, Broken now resolves.
    let catalog = Catalog::build(
        &scanned.index,
        "ui.Widget",
        scanned.scanned.iter().map(String::as_str),
    )
    .unwrap();
    assert!(catalog.contains("ui.widget.Broken"));
    assert!(!catalog.contains("vendor.MissingBase"));
}

#[test]
fn malformed_class_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let lib = tmp.path().join("lib.jar");
    write_jar(&lib, &[("ui.Bad".to_string(), vec![0xCA, 0xFE])]).unwrap();

    let err = ClassIndex::scan(&[Archive::open(&lib).unwrap()], &[]).unwrap_err();
    assert!(matches!(err, CatalogError::ClassFile { entry, .. } if entry == "ui/Bad.class"));
}
