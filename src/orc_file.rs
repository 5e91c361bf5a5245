//! Factory functions for reading and writing files.
//!
//! Writing goes through three steps:
//!
//! 1. [`writer_options`] starts from the ambient [`Settings`] and attaches the
//!    process-wide memory governor, creating it on first use.
//! 2. The caller adjusts the [`WriterOptions`] and they are frozen into a
//!    [`WriterConfig`].
//! 3. [`create_writer`] resolves the file system, registers the writer with
//!    the governor and opens the [`FormatWriter`] with its granted stripe size.
//!
//! Reading skips all of that: the file carries its own version, so
//! [`create_reader`] goes straight to the [`FormatReader`].

use std::io;
use std::path::Path;
use std::sync::Arc;

use arrow::datatypes::SchemaRef;
use log::warn;

use crate::fs::{self, FileSystemRef};
use crate::reader::{FileMetaInfo, FormatReader, ReaderError};
use crate::settings::Settings;
use crate::writer::{
    CompressionKind, ConfigError, FormatWriter, ManagedWriter, WriterConfig, WriterError,
    WriterOptions,
};

/// Bytes every file starts with
pub const MAGIC: &str = "ORC";

/// Errors from the read and write factories
#[derive(Debug, thiserror::Error)]
pub enum OrcError {
    /// Writer options did not validate
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File system or writer I/O error, passed through unchanged
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Reader could not be opened
    #[error(transparent)]
    Reader(#[from] ReaderError),

    /// Managed writer error
    #[error(transparent)]
    Writer(#[from] WriterError),
}

/// Default writer options for the given ambient settings.
pub fn writer_options(settings: &Settings) -> WriterOptions {
    WriterOptions::new(settings)
}

/// Validate `options` and create a writer for `path`.
pub fn create_writer<W: FormatWriter>(
    path: impl AsRef<Path>,
    options: WriterOptions,
) -> Result<ManagedWriter<W>, OrcError> {
    let config = options.build()?;
    create_writer_with_config(path, config)
}

/// Create a writer for `path` from an already validated configuration.
///
/// The file system comes from the configuration or is resolved from the
/// path. The writer is registered with the configuration's memory governor
/// and opened with the stripe size the governor grants; without a governor
/// it keeps the requested stripe size. If opening fails the registration is
/// released before the error is returned.
pub fn create_writer_with_config<W: FormatWriter>(
    path: impl AsRef<Path>,
    config: WriterConfig,
) -> Result<ManagedWriter<W>, OrcError> {
    let path = path.as_ref();
    let (fs, local) = match config.file_system() {
        Some(explicit) => (Arc::clone(explicit), fs::local_path(explicit.as_ref(), path)),
        None => fs::resolve_file_system(path, config.settings())?,
    };

    let lease = config.governor().map(|g| g.lease(config.stripe_size()));
    let stripe_size = match &lease {
        Some(lease) => lease.initial_stripe_size(),
        None => {
            if let Some(e) = config.governor_degraded() {
                warn!(
                    "Writing {} without a memory governor, using stripe size {}: {}",
                    path.display(),
                    config.stripe_size(),
                    e
                );
            }
            config.stripe_size()
        }
    };

    let config = Arc::new(config);
    let inner = W::create(fs, &local, Arc::clone(&config), stripe_size)?;
    Ok(ManagedWriter::new(inner, config, lease, local, stripe_size))
}

/// Create a writer from positional arguments.
///
/// Kept for callers of the older factory signature; new options are only
/// added to [`create_writer`].
pub fn create_writer_legacy<W: FormatWriter>(
    fs: FileSystemRef,
    path: impl AsRef<Path>,
    settings: &Settings,
    schema: SchemaRef,
    stripe_size: u64,
    compress: CompressionKind,
    buffer_size: usize,
    row_index_stride: u32,
) -> Result<ManagedWriter<W>, OrcError> {
    create_writer(
        path,
        writer_options(settings)
            .file_system(fs)
            .schema(schema)
            .stripe_size(stripe_size)
            .compress(compress)
            .buffer_size(buffer_size)
            .row_index_stride(row_index_stride),
    )
}

/// Open a file for reading.
pub fn create_reader<R: FormatReader>(
    fs: FileSystemRef,
    path: impl AsRef<Path>,
) -> Result<R, OrcError> {
    Ok(R::open(fs, path.as_ref(), None)?)
}

/// Open a file for reading with footer information the caller already has.
///
/// The reader uses `meta` as given and does not read the footer again.
pub fn create_reader_with_meta<R: FormatReader>(
    fs: FileSystemRef,
    path: impl AsRef<Path>,
    meta: FileMetaInfo,
) -> Result<R, OrcError> {
    Ok(R::open(fs, path.as_ref(), Some(meta))?)
}

/// Open a file for reading, resolving its file system from the path.
pub fn open_reader<R: FormatReader>(
    path: impl AsRef<Path>,
    settings: &Settings,
) -> Result<R, OrcError> {
    let (fs, local) = fs::resolve_file_system(path.as_ref(), settings)?;
    Ok(R::open(fs, &local, None)?)
}
