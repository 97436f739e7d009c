use std::collections::HashMap;

use widgen_archive::Archive;
use widgen_classfile::ClassFile;

use crate::stub::ClassStub;
use crate::CatalogError;

/// Resolves binary names to class descriptors.
pub trait ClassLoader {
    fn load(&self, binary_name: &str) -> Option<&ClassStub>;
}

/// All classes visible to a run, keyed by binary name.
#[derive(Clone, Debug, Default)]
pub struct ClassIndex {
    stubs_by_binary: HashMap<String, ClassStub>,
}

/// The index plus the binary names found in the scanned (catalogued) archives,
/// in archive order then entry-name order.
#[derive(Clone, Debug, Default)]
pub struct ScannedLibrary {
    pub index: ClassIndex,
    pub scanned: Vec<String>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from pre-made stubs; later duplicates are ignored.
    pub fn from_stubs(stubs: impl IntoIterator<Item = ClassStub>) -> Self {
        let mut index = Self::new();
        for stub in stubs {
            index.insert(stub);
        }
        index
    }

    /// Insert a stub unless the binary name is already present (first archive
    /// wins, like a classpath). Returns whether the stub was added.
    pub fn insert(&mut self, stub: ClassStub) -> bool {
        if let Some(existing) = self.stubs_by_binary.get(&stub.binary_name) {
            tracing::debug!(
                target: "widgen.catalog",
                class = %stub.binary_name,
                kept = %existing.origin.display(),
                ignored = %stub.origin.display(),
                "duplicate class definition"
            );
            return false;
        }
        self.stubs_by_binary.insert(stub.binary_name.clone(), stub);
        true
    }

    /// Parse every class in `archive` into the index. Returns the binary names
    /// that were added, in entry-name order.
    pub fn load_archive(&mut self, archive: &Archive) -> Result<Vec<String>, CatalogError> {
        let mut added = Vec::new();
        for entry in archive.class_entries()? {
            let class = ClassFile::parse(&entry.bytes).map_err(|source| CatalogError::ClassFile {
                archive: archive.path().to_path_buf(),
                entry: entry.name.clone(),
                source,
            })?;
            let stub = ClassStub::from_classfile(class, archive.path().to_path_buf()).map_err(
                |source| CatalogError::ClassFile {
                    archive: archive.path().to_path_buf(),
                    entry: entry.name.clone(),
                    source,
                },
            )?;
            let name = stub.binary_name.clone();
            if self.insert(stub) {
                added.push(name);
            }
        }
        Ok(added)
    }

    /// Load the catalogued archives followed by the resolution-only classpath.
    pub fn scan(scanned: &[Archive], classpath: &[Archive]) -> Result<ScannedLibrary, CatalogError> {
        let mut index = Self::new();
        let mut names = Vec::new();
        for archive in scanned {
            names.extend(index.load_archive(archive)?);
        }
        for archive in classpath {
            index.load_archive(archive)?;
        }
        tracing::info!(
            target: "widgen.catalog",
            classes = index.len(),
            scanned = names.len(),
            "class index built"
        );
        Ok(ScannedLibrary {
            index,
            scanned: names,
        })
    }

    pub fn len(&self) -> usize {
        self.stubs_by_binary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs_by_binary.is_empty()
    }
}

impl ClassLoader for ClassIndex {
    fn load(&self, binary_name: &str) -> Option<&ClassStub> {
        self.stubs_by_binary.get(binary_name)
    }
}
