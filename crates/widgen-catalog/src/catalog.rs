use crate::hierarchy::{ancestors_up_to, Ancestry};
use crate::index::ClassLoader;
use crate::stub::{canonical_name, ClassStub};
use crate::CatalogError;

/// Widget classes eligible for generation: public, top-level, proper subtypes
/// of the root, ordered by canonical name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    root: String,
    classes: Vec<String>,
}

impl Catalog {
    /// Filter `candidates` (binary names, usually the scanned archives' classes)
    /// down to the eligible widget classes.
    ///
    /// Classes whose superclass chain cannot be resolved are skipped with a
    /// warning. A missing or non-public root is fatal.
    pub fn build<'a>(
        loader: &dyn ClassLoader,
        root: &str,
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, CatalogError> {
        let root_stub = loader
            .load(root)
            .ok_or_else(|| CatalogError::MissingRoot(root.to_string()))?;
        if !root_stub.is_public() || root_stub.is_interface() {
            return Err(CatalogError::InaccessibleRoot(root.to_string()));
        }

        let mut classes = Vec::new();
        for name in candidates {
            let Some(stub) = loader.load(name) else {
                tracing::warn!(target: "widgen.catalog", class = %name, "class could not be loaded; skipping");
                continue;
            };
            if is_eligible(loader, stub, root) {
                classes.push(stub.binary_name.clone());
            }
        }

        classes.sort_by_key(|name| canonical_name(name));
        classes.dedup();

        tracing::info!(
            target: "widgen.catalog",
            root = %root,
            classes = classes.len(),
            "widget catalog built"
        );

        Ok(Self {
            root: root.to_string(),
            classes,
        })
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Eligible binary names in canonical-name order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn contains(&self, binary_name: &str) -> bool {
        self.classes.iter().any(|c| c == binary_name)
    }
}

fn is_eligible(loader: &dyn ClassLoader, stub: &ClassStub, root: &str) -> bool {
    if stub.binary_name == root || !stub.is_public() || stub.nested || stub.is_interface() {
        return false;
    }
    match ancestors_up_to(loader, stub, root) {
        Ancestry::Descends(_) => true,
        Ancestry::Unrelated => false,
        Ancestry::Missing(missing) => {
            tracing::warn!(
                target: "widgen.catalog",
                class = %stub.binary_name,
                missing = %missing,
                "superclass chain could not be resolved; skipping class"
            );
            false
        }
    }
}
