//! # Reader Seam
//!
//! Readers need no configuration or version negotiation up front: every file
//! describes its own version and layout in its tail. This module defines the
//! [`FormatReader`] trait that reader implementations provide, the
//! [`FileMetaInfo`] a caller can hand over to skip footer parsing, and small
//! helpers reader implementations share.

mod error;
mod meta;

pub use error::ReaderError;
pub use meta::FileMetaInfo;

use std::io::Read;
use std::path::Path;

use log::warn;

use crate::fs::{FileSystem, FileSystemRef};
use crate::orc_file::MAGIC;
use crate::version;

/// A file reader, created through [`create_reader`](crate::orc_file::create_reader).
pub trait FormatReader: Sized {
    /// Open `path` on `fs`.
    ///
    /// With `meta` present the reader must use it verbatim instead of
    /// reading the footer from the file.
    fn open(fs: FileSystemRef, path: &Path, meta: Option<FileMetaInfo>)
        -> Result<Self, ReaderError>;
}

/// Whether `header` starts with the format's magic bytes
pub fn has_magic(header: &[u8]) -> bool {
    header.starts_with(MAGIC.as_bytes())
}

/// Read the first bytes of a file and check them for the magic.
pub fn ensure_magic(fs: &dyn FileSystem, path: &Path) -> Result<(), ReaderError> {
    let mut header = [0u8; 3];
    let mut file = fs.open(path)?;
    match file.read_exact(&mut header) {
        Ok(()) if has_magic(&header) => Ok(()),
        Ok(()) => Err(ReaderError::NotAnOrcFile(path.display().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ReaderError::NotAnOrcFile(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Log a warning when a file was written by a newer format version.
///
/// Such files may use encodings this reader does not understand; reading
/// continues so that columns it does understand stay accessible.
pub fn check_version(path: &Path, version_list: &[u32]) {
    if let [major, minor, ..] = version_list {
        let current = version::current();
        if (*major, *minor) > (current.major(), current.minor()) {
            warn!(
                "{} was written by a future format version {}.{}. This file may not be readable by this version of the reader.",
                path.display(),
                major,
                minor
            );
        }
    }
}
