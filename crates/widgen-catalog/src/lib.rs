//! Class index and widget catalog.
//!
//! [`ClassIndex`] holds one [`ClassStub`] per binary name loaded from the
//! scanned archives and the resolution-only classpath; it is the
//! [`ClassLoader`] every later stage resolves types through. [`Catalog`] is the
//! ordered set of widget classes eligible for generation.

mod catalog;
mod hierarchy;
mod index;
mod stub;

use std::path::PathBuf;

use thiserror::Error;

pub use catalog::Catalog;
pub use hierarchy::{
    ancestors_up_to, class_depth, is_strict_subclass, super_interfaces, type_depth, Ancestry,
};
pub use index::{ClassIndex, ClassLoader, ScannedLibrary};
pub use stub::{canonical_name, simple_name, ClassStub, MethodStub};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Archive(#[from] widgen_archive::ArchiveError),

    #[error("malformed class file {entry} in {archive}: {source}")]
    ClassFile {
        archive: PathBuf,
        entry: String,
        #[source]
        source: widgen_classfile::Error,
    },

    #[error("root type {0} was not found in any archive")]
    MissingRoot(String),

    #[error("root type {0} is not a public class")]
    InaccessibleRoot(String),
}
