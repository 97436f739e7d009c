//! Utilities shared by widgen tests.
//!
//! The generator consumes compiled class files, and tests cannot rely on a JDK
//! being installed. [`ClassFileBuilder`] assembles small, valid class files
//! directly, and [`write_jar`] / [`write_class_dir`] lay them out the way a
//! library archive would.

mod builder;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub use builder::{ClassFileBuilder, MethodSpec};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_SYNTHETIC: u16 = 0x1000;

/// Entry name of a class inside an archive (`a/b/C$D.class`).
pub fn class_entry_name(binary_name: &str) -> String {
    format!("{}.class", binary_name.replace('.', "/"))
}

/// Write a JAR containing `classes` (binary name, class bytes) plus a manifest.
pub fn write_jar(path: &Path, classes: &[(String, Vec<u8>)]) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("META-INF/MANIFEST.MF", options)
        .map_err(io::Error::other)?;
    zip.write_all(b"Manifest-Version: 1.0\r\n\r\n")?;

    for (name, bytes) in classes {
        zip.start_file(class_entry_name(name), options)
            .map_err(io::Error::other)?;
        zip.write_all(bytes)?;
    }

    zip.finish().map_err(io::Error::other)?;
    Ok(())
}

/// Lay out `classes` as an exploded class directory rooted at `root`.
pub fn write_class_dir(root: &Path, classes: &[(String, Vec<u8>)]) -> io::Result<()> {
    for (name, bytes) in classes {
        let path = root.join(class_entry_name(name));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
    }
    Ok(())
}

/// Convenience: build every class and pair it with its binary name.
pub fn build_all(builders: &[ClassFileBuilder]) -> Vec<(String, Vec<u8>)> {
    builders
        .iter()
        .map(|builder| (builder.name().to_string(), builder.build()))
        .collect()
}
