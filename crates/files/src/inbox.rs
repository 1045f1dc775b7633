//! The local raw-data inbox.
//!
//! [`RawDataInbox`] is bound to one directory. It lists the export documents waiting there and
//! pulls new ones in from a [`RemoteSource`]. Fetched files are written under a temporary
//! `.part` name and renamed once complete, so a listing never sees a half-written document.

use crate::remote::{is_document_name, plan_fetch, validate_file_name, RemoteSource};
use crate::{FilesError, PARTIAL_SUFFIX};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Record of one file copied into the inbox.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FetchedFile {
    /// File name within the inbox, exactly as listed by the source
    pub name: String,

    /// Hexadecimal SHA-256 digest of the file content
    pub sha256: String,

    /// Size of the file in bytes
    pub size_bytes: u64,

    /// UTC timestamp when the fetch completed
    pub fetched_at: DateTime<Utc>,
}

/// Directory holding the export documents for a run.
#[derive(Debug)]
pub struct RawDataInbox {
    dir: PathBuf,
}

impl RawDataInbox {
    /// Opens the inbox at `dir`, creating the directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `dir` exists but is not a directory
    /// - the directory cannot be created (I/O)
    pub fn open(dir: &Path) -> Result<Self, FilesError> {
        if dir.exists() && !dir.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                dir.display()
            )));
        }

        fs::create_dir_all(dir).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create inbox {}: {}", dir.display(), e),
            ))
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of the export documents in the inbox, sorted by file name.
    pub fn list_documents(&self) -> Result<Vec<PathBuf>, FilesError> {
        Ok(self
            .document_names()?
            .into_iter()
            .map(|name| self.dir.join(name))
            .collect())
    }

    /// File names of the export documents in the inbox, sorted.
    pub fn document_names(&self) -> Result<Vec<String>, FilesError> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_document_name(name) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Copies every document `source` has that the inbox does not.
    ///
    /// Files are fetched in the order the source lists them. The first failure stops the sync;
    /// files fetched before it stay in the inbox.
    pub fn sync_from(&self, source: &dyn RemoteSource) -> Result<Vec<FetchedFile>, FilesError> {
        let remote = source.list()?;
        let local = self.document_names()?;
        let planned = plan_fetch(&remote[..], &local[..]);

        tracing::info!(
            "{} remote files, {} already local, fetching {}",
            remote.len(),
            local.len(),
            planned.len()
        );

        let mut fetched = Vec::with_capacity(planned.len());
        for name in planned {
            fetched.push(self.fetch_one(source, &name)?);
        }
        Ok(fetched)
    }

    fn fetch_one(&self, source: &dyn RemoteSource, name: &str) -> Result<FetchedFile, FilesError> {
        validate_file_name(name)?;
        let dest = self.dir.join(name);
        let partial = self.dir.join(format!("{name}{PARTIAL_SUFFIX}"));

        if let Err(err) = source.fetch(name, &partial) {
            // Best effort; the .part file is never listed anyway.
            let _ = fs::remove_file(&partial);
            return Err(err);
        }

        let bytes = fs::read(&partial)?;
        fs::rename(&partial, &dest)?;

        let fetched = FetchedFile {
            sha256: hex::encode(Sha256::digest(&bytes)),
            size_bytes: bytes.len() as u64,
            fetched_at: Utc::now(),
            name: name.to_string(),
        };
        tracing::debug!(
            "fetched {} ({} bytes, sha256 {})",
            fetched.name,
            fetched.size_bytes,
            fetched.sha256
        );
        Ok(fetched)
    }
}
