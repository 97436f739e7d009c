//! Attribute DSL generation.
//!
//! The pipeline over a [`Catalog`]:
//!
//! 1. [`Classifier`] turns each class's declared methods into
//!    [`AttributeCandidate`]s, eliding redeclarations of ancestor attributes.
//! 2. [`group_candidates`] groups them by attribute name and
//!    [`OverrideResolver`] removes declarations shadowed by a more derived one.
//! 3. [`DispatchBuilder`] orders the survivors into dispatch cases and collects
//!    the typed wrapper functions; [`build_factories`] adds the view factories.
//! 4. The resulting [`Document`] is rendered once by [`render`].
//!
//! Types are resolved through a [`ClassLoader`]; parameter nullability comes
//! from a [`NullabilityOracle`] and manual overrides from a [`QuirksTable`].

mod classify;
mod dispatch;
mod doc;
mod factory;
mod listener;
mod nullability;
mod quirks;
mod render;
mod report;
mod resolve;
mod types;

use thiserror::Error;
use widgen_catalog::{Catalog, ClassLoader};

pub use classify::{derive_attribute_name, AttributeCandidate, AttributeKind, Classifier};
pub use dispatch::{
    Branch, DispatchBuilder, DispatchCase, DispatchTable, Invocation, Terminator, ValueTest,
    WrapperEntry,
};
pub use doc::{Declaration, DispatchMethod, Document, RuntimeNames};
pub use factory::{build_factories, FactoryEntry};
pub use listener::{listener_wrapper, ListenerMethod, ListenerWrapper};
pub use nullability::{
    AnnotationOracle, MemberKey, Nullability, NullabilityOracle, OracleChain, TableOracle,
    DEFAULT_NON_NULL_ANNOTATIONS, DEFAULT_NULLABLE_ANNOTATIONS,
};
pub use quirks::{ClassAlias, QuirkFn, QuirkOutcome, QuirksTable, CLASS_ALIAS_KEY};
pub use render::render;
pub use report::{AttributeReport, ClassReport, DeclarationReport, Report};
pub use resolve::{group_candidates, AttributeGroup, OverrideResolver};
pub use types::{boxed, java_identifier, java_type};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("root type {0} is not in the class index")]
    MissingRoot(String),

    #[error("{0:?} is not a valid Java class name")]
    InvalidClassName(String),

    #[error("{0:?} is not a valid Java package name")]
    InvalidPackage(String),
}

/// Shape of the generated compilation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub package: Option<String>,
    pub class_name: String,
    /// Comment lines written at the top of the file.
    pub header: Vec<String>,
    pub runtime: RuntimeNames,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            package: None,
            class_name: "WidgetDsl".to_string(),
            header: vec!["Generated by widgen. Do not edit.".to_string()],
            runtime: RuntimeNames::default(),
        }
    }
}

/// Output of one run: the document plus the resolved groups it was built from.
#[derive(Clone, Debug)]
pub struct Generation {
    pub root: String,
    pub groups: Vec<AttributeGroup>,
    pub document: Document,
}

impl Generation {
    /// The rendered Java source.
    pub fn source(&self) -> String {
        render(&self.document)
    }

    pub fn report(&self) -> Report {
        Report::new(self)
    }
}

pub struct Generator<'a> {
    loader: &'a dyn ClassLoader,
    oracle: &'a dyn NullabilityOracle,
    quirks: &'a QuirksTable,
    options: &'a GeneratorOptions,
}

impl<'a> Generator<'a> {
    pub fn new(
        loader: &'a dyn ClassLoader,
        oracle: &'a dyn NullabilityOracle,
        quirks: &'a QuirksTable,
        options: &'a GeneratorOptions,
    ) -> Self {
        Self {
            loader,
            oracle,
            quirks,
            options,
        }
    }

    pub fn generate(&self, catalog: &Catalog) -> Result<Generation, GenerateError> {
        if !is_java_identifier(&self.options.class_name) {
            return Err(GenerateError::InvalidClassName(
                self.options.class_name.clone(),
            ));
        }
        if let Some(package) = &self.options.package {
            if !package.split('.').all(is_java_identifier) {
                return Err(GenerateError::InvalidPackage(package.clone()));
            }
        }

        let root = catalog.root();
        let root_stub = self
            .loader
            .load(root)
            .ok_or_else(|| GenerateError::MissingRoot(root.to_string()))?;

        let members: Vec<String> = catalog
            .classes()
            .iter()
            .filter(|class| !self.quirks.is_excluded(class))
            .cloned()
            .collect();
        let classifier = Classifier::new(self.loader, root, self.oracle, members.iter().cloned());

        let mut candidates = Vec::new();
        if !self.quirks.is_excluded(root) {
            candidates.extend(classifier.classify(root_stub));
        }
        for class in &members {
            match self.loader.load(class) {
                Some(stub) => candidates.extend(classifier.classify(stub)),
                None => {
                    tracing::warn!(target: "widgen.gen", class = %class, "catalog class not in index")
                }
            }
        }
        let candidate_count = candidates.len();

        let resolver = OverrideResolver::new(self.loader, root);
        let groups: Vec<AttributeGroup> = group_candidates(candidates)
            .into_iter()
            .map(|group| resolver.resolve(group))
            .filter(|group| !group.candidates.is_empty())
            .collect();

        let table =
            DispatchBuilder::new(self.loader, root, self.oracle, self.quirks).build(&groups);
        let factories = build_factories(catalog, self.quirks);

        tracing::info!(
            target: "widgen.gen",
            root = %root,
            classes = members.len(),
            candidates = candidate_count,
            attributes = table.cases.len(),
            wrappers = table.wrappers.len(),
            factories = factories.len(),
            "generated attribute dsl"
        );

        let document = Document::new(
            self.options.header.clone(),
            self.options.package.clone(),
            self.options.class_name.clone(),
            self.options.runtime.clone(),
            root,
            factories,
            table,
        );
        Ok(Generation {
            root: root.to_string(),
            groups,
            document,
        })
    }
}

fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && java_identifier(name) == name
}
