//! Remote drop locations and fetch planning.
//!
//! The inbox never talks to a transport directly. It asks a [`RemoteSource`] for the names it
//! holds and for the bytes of one named file. [`DirectorySource`] covers the common case of a
//! mounted share or a local drop folder.

use crate::{FilesError, DOCUMENT_EXTENSION};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A location export files can be fetched from.
pub trait RemoteSource {
    /// Names of the files currently available.
    fn list(&self) -> Result<Vec<String>, FilesError>;

    /// Copy the file called `name` to `dest`, returning the number of bytes written.
    fn fetch(&self, name: &str, dest: &Path) -> Result<u64, FilesError>;
}

/// Returns `true` if `name` looks like an export document (`*.xml`, any case).
pub fn is_document_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

/// Names to fetch: documents present remotely that are not yet held locally.
///
/// Remote order is preserved and duplicates are dropped.
pub fn plan_fetch<R, L>(remote_names: &[R], local_names: &[L]) -> Vec<String>
where
    R: AsRef<str>,
    L: AsRef<str>,
{
    let local: HashSet<&str> = local_names.iter().map(AsRef::as_ref).collect();
    let mut planned = HashSet::new();

    remote_names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| is_document_name(name) && !local.contains(name))
        .filter(|name| planned.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Reject names that are blank or that contain a path component.
///
/// The name is never trimmed; it must be usable as given for both the fetch and the
/// local file name.
pub(crate) fn validate_file_name(name: &str) -> Result<(), FilesError> {
    if name.trim().is_empty() {
        return Err(FilesError::InvalidPath("file name must not be empty".to_string()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(FilesError::InvalidPath(format!(
            "file name must not contain path components: {name}"
        )));
    }
    Ok(())
}

/// A [`RemoteSource`] backed by a directory on a mounted filesystem.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source over `root`, which must already exist.
    pub fn new(root: &Path) -> Result<Self, FilesError> {
        if !root.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Remote directory does not exist: {}",
                root.display()
            )));
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }
}

impl RemoteSource for DirectorySource {
    fn list(&self) -> Result<Vec<String>, FilesError> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::warn!("skipping non UTF-8 remote file name {:?}", raw),
            }
        }

        names.sort();
        Ok(names)
    }

    fn fetch(&self, name: &str, dest: &Path) -> Result<u64, FilesError> {
        validate_file_name(name)?;
        let source = self.root.join(name);

        fs::copy(&source, dest).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to copy {}: {}", source.display(), e),
            ))
        })
    }
}
