//! Raw-data inbox
//!
//! Survey export files arrive from the vendor as XML documents. This crate owns the local
//! directory they land in (the inbox) and the step that copies new files into it from a
//! remote drop location.
//!
//! ## Layout
//!
//! ```text
//! rawdata/
//! ├── 2019-01-15_4242.xml
//! ├── 2019-01-22_4242.xml
//! └── 2019-01-29_4242.xml.part   # in-flight fetch, never listed
//! ```
//!
//! Documents are always listed in file-name order so that repeated runs over the same
//! inbox process files in the same sequence.
//!
//! ## Example Usage
//!
//! ```no_run
//! use pgs_files::{DirectorySource, RawDataInbox};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let inbox = RawDataInbox::open(Path::new("rawdata"))?;
//! let remote = DirectorySource::new(Path::new("/mnt/vendor-drop"))?;
//!
//! for fetched in inbox.sync_from(&remote)? {
//!     println!("{} ({} bytes)", fetched.name, fetched.size_bytes);
//! }
//! # Ok(())
//! # }
//! ```

mod constants;
mod inbox;
mod remote;

pub use constants::{DOCUMENT_EXTENSION, PARTIAL_SUFFIX};
pub use inbox::{FetchedFile, RawDataInbox};
pub use remote::{is_document_name, plan_fetch, DirectorySource, RemoteSource};

/// Errors that can occur during inbox operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Directory does not exist, or is not a directory
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// File name is empty or would escape its directory
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
