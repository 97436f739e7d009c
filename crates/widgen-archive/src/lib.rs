//! Read access to library archives: JAR files and exploded class directories.
//!
//! Entries are always returned in entry-name order so every consumer sees the
//! same class order regardless of how the archive was written.

use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive {0} does not exist")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed archive {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    Jar,
    Directory,
}

/// One `.class` entry and its raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassEntry {
    /// Entry name with `/` separators, e.g. `android/widget/TextView.class`.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ClassEntry {
    #[must_use]
    pub fn binary_name(&self) -> Option<String> {
        entry_to_binary_name(&self.name)
    }
}

#[derive(Clone, Debug)]
pub struct Archive {
    path: PathBuf,
    kind: ArchiveKind,
}

impl Archive {
    /// Open an archive, choosing the kind from what exists on disk.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let path = path.into();
        let meta = std::fs::metadata(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ArchiveError::NotFound(path.clone())
            } else {
                ArchiveError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        let kind = if meta.is_dir() {
            ArchiveKind::Directory
        } else {
            ArchiveKind::Jar
        };
        Ok(Self { path, kind })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn kind(&self) -> ArchiveKind {
        self.kind
    }

    /// All class entries, sorted by entry name.
    ///
    /// `META-INF/`, `module-info` and `package-info` entries are skipped. Any
    /// read failure is returned as an error: a partially read archive would
    /// produce an incomplete catalog.
    pub fn class_entries(&self) -> Result<Vec<ClassEntry>, ArchiveError> {
        let mut entries = match self.kind {
            ArchiveKind::Jar => self.jar_entries()?,
            ArchiveKind::Directory => self.dir_entries()?,
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(
            target: "widgen.archive",
            path = %self.path.display(),
            classes = entries.len(),
            "enumerated class entries"
        );
        Ok(entries)
    }

    /// Read a single entry. Returns `Ok(None)` when it isn't present.
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        match self.kind {
            ArchiveKind::Directory => {
                let candidate = self.path.join(name);
                if !candidate.is_file() {
                    return Ok(None);
                }
                std::fs::read(&candidate)
                    .map(Some)
                    .map_err(|source| ArchiveError::Io {
                        path: candidate,
                        source,
                    })
            }
            ArchiveKind::Jar => {
                let mut zip = self.open_zip()?;
                let result = match zip.by_name(name) {
                    Ok(mut entry) => {
                        let mut buf = Vec::with_capacity(entry.size() as usize);
                        entry.read_to_end(&mut buf).map_err(|source| self.io_err(source))?;
                        Ok(Some(buf))
                    }
                    Err(zip::result::ZipError::FileNotFound) => Ok(None),
                    Err(source) => Err(self.zip_err(source)),
                };
                result
            }
        }
    }

    fn open_zip(&self) -> Result<ZipArchive<File>, ArchiveError> {
        let file = File::open(&self.path).map_err(|source| self.io_err(source))?;
        ZipArchive::new(file).map_err(|source| self.zip_err(source))
    }

    fn jar_entries(&self) -> Result<Vec<ClassEntry>, ArchiveError> {
        let mut zip = self.open_zip()?;
        let mut out = Vec::new();
        for i in 0..zip.len() {
            let mut file = zip.by_index(i).map_err(|source| self.zip_err(source))?;
            if !file.is_file() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_owned();
            if entry_to_binary_name(&name).is_none() {
                continue;
            }

            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)
                .map_err(|source| self.io_err(source))?;
            out.push(ClassEntry { name, bytes });
        }
        Ok(out)
    }

    fn dir_entries(&self) -> Result<Vec<ClassEntry>, ArchiveError> {
        let mut out = Vec::new();
        for entry in walkdir::WalkDir::new(&self.path).follow_links(false) {
            let entry = entry.map_err(|source| ArchiveError::Walk {
                path: self.path.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension() != Some(OsStr::new("class")) {
                continue;
            }

            let rel = entry.path().strip_prefix(&self.path).unwrap_or(entry.path());
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if entry_to_binary_name(&name).is_none() {
                continue;
            }

            let bytes = std::fs::read(entry.path()).map_err(|source| ArchiveError::Io {
                path: entry.path().to_path_buf(),
                source,
            })?;
            out.push(ClassEntry { name, bytes });
        }
        Ok(out)
    }

    fn io_err(&self, source: std::io::Error) -> ArchiveError {
        ArchiveError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn zip_err(&self, source: zip::result::ZipError) -> ArchiveError {
        ArchiveError::Zip {
            path: self.path.clone(),
            source,
        }
    }
}

/// Map an entry name to a binary class name, or `None` for entries that never
/// describe a loadable class.
#[must_use]
pub fn entry_to_binary_name(entry_name: &str) -> Option<String> {
    let entry_name = entry_name.strip_prefix('/').unwrap_or(entry_name);
    if entry_name.starts_with("META-INF/") {
        return None;
    }
    let internal = entry_name.strip_suffix(".class")?;
    let simple = internal.rsplit('/').next().unwrap_or(internal);
    if simple.is_empty() || simple == "module-info" || simple == "package-info" {
        return None;
    }
    Some(internal.replace('/', "."))
}
