//! File system targets for readers and writers.
//!
//! Callers may hand a writer a file system explicitly. When they do not, it
//! is resolved from the path: a bare path or a `file://` URI maps to the
//! local file system, anything else is rejected with an
//! [`io::ErrorKind::Unsupported`] error.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::settings::{keys, Settings};

/// Readable and seekable byte source
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Storage that files are read from and written to
pub trait FileSystem: Send + Sync + fmt::Debug {
    /// URI scheme this file system serves
    fn scheme(&self) -> &str;

    /// Create a file for writing
    fn create(&self, path: &Path, overwrite: bool) -> io::Result<Box<dyn Write + Send>>;

    /// Open a file for reading
    fn open(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>>;

    /// Length of a file in bytes
    fn file_len(&self, path: &Path) -> io::Result<u64>;

    /// Block size stripes are padded to when block padding is enabled
    fn block_size(&self) -> u64;
}

/// Shared file system reference
pub type FileSystemRef = Arc<dyn FileSystem>;

/// The local disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileSystem {
    block_size: u64,
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self {
            block_size: keys::DEFAULT_LOCAL_BLOCK_SIZE,
        }
    }
}

impl LocalFileSystem {
    /// Local file system with an explicit block size
    pub fn with_block_size(block_size: u64) -> Self {
        Self { block_size }
    }
}

impl FileSystem for LocalFileSystem {
    fn scheme(&self) -> &str {
        "file"
    }

    fn create(&self, path: &Path, overwrite: bool) -> io::Result<Box<dyn Write + Send>> {
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        Ok(Box::new(options.open(path)?))
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>> {
        Ok(Box::new(File::open(path)?))
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn block_size(&self) -> u64 {
        self.block_size
    }
}

/// Split an optional `scheme://` prefix off a path
pub fn split_scheme(path: &Path) -> (Option<&str>, &Path) {
    match path.to_str().and_then(|s| s.split_once("://")) {
        Some((scheme, rest)) if !scheme.is_empty() && !scheme.contains('/') => {
            (Some(scheme), Path::new(rest))
        }
        _ => (None, path),
    }
}

/// Find the file system that serves `path`.
///
/// Returns the file system together with the path it should be given, with
/// any `file://` prefix removed.
pub fn resolve_file_system(
    path: &Path,
    settings: &Settings,
) -> io::Result<(FileSystemRef, PathBuf)> {
    let (scheme, local) = split_scheme(path);
    match scheme {
        None | Some("file") => {
            let block_size = settings
                .get_u64_or(keys::LOCAL_BLOCK_SIZE, keys::DEFAULT_LOCAL_BLOCK_SIZE)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let fs: FileSystemRef = Arc::new(LocalFileSystem::with_block_size(block_size));
            Ok((fs, local.to_path_buf()))
        }
        Some(other) => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("No file system for scheme: {}", other),
        )),
    }
}

/// Strip a scheme prefix that `fs` serves, leaving other paths untouched
pub(crate) fn local_path(fs: &dyn FileSystem, path: &Path) -> PathBuf {
    match split_scheme(path) {
        (Some(scheme), rest) if scheme == fs.scheme() => rest.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_scheme() {
        assert_eq!(split_scheme(Path::new("/tmp/a.orc")), (None, Path::new("/tmp/a.orc")));
        assert_eq!(
            split_scheme(Path::new("file:///tmp/a.orc")),
            (Some("file"), Path::new("/tmp/a.orc"))
        );
        assert_eq!(
            split_scheme(Path::new("hdfs://nn:8020/warehouse/t")),
            (Some("hdfs"), Path::new("nn:8020/warehouse/t"))
        );
        // A "://" inside a directory name is not a scheme
        assert_eq!(split_scheme(Path::new("dir/x://y")).0, None);
    }

    #[test]
    fn test_resolve_local_paths() {
        let settings = Settings::new().with(keys::LOCAL_BLOCK_SIZE, 4096);
        let (fs, path) = resolve_file_system(Path::new("file:///data/t.orc"), &settings).unwrap();
        assert_eq!(fs.scheme(), "file");
        assert_eq!(fs.block_size(), 4096);
        assert_eq!(path, PathBuf::from("/data/t.orc"));

        let (fs, path) = resolve_file_system(Path::new("t.orc"), &Settings::new()).unwrap();
        assert_eq!(fs.block_size(), keys::DEFAULT_LOCAL_BLOCK_SIZE);
        assert_eq!(path, PathBuf::from("t.orc"));
    }

    #[test]
    fn test_resolve_rejects_unknown_schemes() {
        let err = resolve_file_system(Path::new("s3://bucket/t.orc"), &Settings::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);

        let bad = Settings::new().with(keys::LOCAL_BLOCK_SIZE, "big");
        let err = resolve_file_system(Path::new("t.orc"), &bad).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_local_create_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bytes.orc");
        let fs = LocalFileSystem::default();

        let mut out = fs.create(&path, false).unwrap();
        out.write_all(b"ORC\x01").unwrap();
        drop(out);

        assert_eq!(fs.file_len(&path).unwrap(), 4);
        assert_eq!(
            fs.create(&path, false).err().map(|e| e.kind()),
            Some(io::ErrorKind::AlreadyExists)
        );

        let mut contents = Vec::new();
        fs.open(&path).unwrap().read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"ORC\x01");

        fs.create(&path, true).unwrap();
        assert_eq!(fs.file_len(&path).unwrap(), 0);
    }
}
