mod dispatch;
mod render;

use std::path::PathBuf;

use widgen_catalog::{Catalog, ClassIndex, ClassStub};
use widgen_classfile::ClassFile;
use widgen_gen::{
    AnnotationOracle, Branch, DispatchCase, Generation, Generator, GeneratorOptions, QuirksTable,
};
use widgen_test_utils::{ClassFileBuilder, ACC_ABSTRACT, ACC_INTERFACE, ACC_PUBLIC, ACC_STATIC};

pub(crate) const ROOT: &str = "ui.Widget";

pub(crate) fn index_of(builders: &[ClassFileBuilder]) -> ClassIndex {
    ClassIndex::from_stubs(builders.iter().map(|builder| {
        let class = ClassFile::parse(&builder.build()).unwrap();
        ClassStub::from_classfile(class, PathBuf::from("widgets.jar")).unwrap()
    }))
}

pub(crate) fn generate_with(
    builders: &[ClassFileBuilder],
    quirks: &QuirksTable,
    options: &GeneratorOptions,
) -> Generation {
    let index = index_of(builders);
    let catalog = Catalog::build(&index, ROOT, builders.iter().map(|b| b.name())).unwrap();
    Generator::new(&index, &AnnotationOracle::default(), quirks, options)
        .generate(&catalog)
        .unwrap()
}

pub(crate) fn generate(builders: &[ClassFileBuilder]) -> Generation {
    generate_with(builders, &QuirksTable::new(), &GeneratorOptions::default())
}

pub(crate) fn case<'a>(generation: &'a Generation, name: &str) -> &'a DispatchCase {
    generation
        .document
        .dispatch()
        .unwrap()
        .cases
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("no case {name}"))
}

/// `(target, value type)` of each generated branch, as canonical names.
pub(crate) fn branch_tests(case: &DispatchCase) -> Vec<(Option<String>, Option<String>)> {
    case.branches
        .iter()
        .map(|branch| match branch {
            Branch::Generated { target, value, .. } => (
                target.clone(),
                value.as_ref().map(|v| widgen_gen::java_type(&v.ty)),
            ),
            Branch::Verbatim(_) => (None, Some("<verbatim>".to_string())),
        })
        .collect()
}

/// `(function name, parameter type)` of every wrapper.
pub(crate) fn wrappers(generation: &Generation) -> Vec<(String, String)> {
    generation
        .document
        .wrappers()
        .map(|w| (w.function_name.clone(), widgen_gen::java_type(&w.param_type)))
        .collect()
}

pub(crate) fn widget() -> ClassFileBuilder {
    ClassFileBuilder::class(ROOT)
}

pub(crate) fn text_types() -> Vec<ClassFileBuilder> {
    vec![
        ClassFileBuilder::class("ui.Text"),
        ClassFileBuilder::class("ui.RichText").extends("ui.Text"),
    ]
}

pub(crate) fn listener(outer: &str, simple: &str) -> ClassFileBuilder {
    ClassFileBuilder::interface(&format!("{outer}${simple}")).nested_in(
        outer,
        simple,
        ACC_PUBLIC | ACC_STATIC | ACC_INTERFACE | ACC_ABSTRACT,
    )
}
