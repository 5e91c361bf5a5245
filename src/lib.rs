//! # orcfile - Writer Configuration and Memory Budget for ORC Files
//!
//! `orcfile` is the configuration and lifecycle layer for creating readers and
//! writers of ORC, a self-describing columnar file format for large-scale
//! analytical storage. The column encoders, compression codecs and footer
//! layout live behind the [`FormatWriter`](writer::FormatWriter) and
//! [`FormatReader`](reader::FormatReader) traits; this crate decides how they
//! are configured and keeps them within a shared memory budget.
//!
//! ## Key Features
//!
//! - **One Immutable Configuration**: writer options are layered from built-in
//!   defaults, ambient settings and explicit overrides, validated once, and
//!   frozen into a [`WriterConfig`](writer::WriterConfig).
//!
//! - **Version Contract**: files record the format version they were written
//!   with. Versions are looked up by exact name and an unknown name is always
//!   an error.
//!
//! - **Shared Memory Budget**: every writer in the process registers with one
//!   [`MemoryGovernor`](memory::MemoryGovernor). When their stripe buffers
//!   would not fit together, every writer's stripe size is scaled down by the
//!   same factor, and closed writers hand their share back.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use arrow::datatypes::{DataType, Field, Schema};
//! use orcfile::prelude::*;
//! # fn run<W: FormatWriter>(batch: arrow::record_batch::RecordBatch) -> Result<(), OrcError> {
//!
//! // Ambient settings, usually loaded once per process
//! let settings = Settings::from_file("orc.toml".as_ref()).unwrap_or_default();
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("id", DataType::Int64, false),
//!     Field::new("name", DataType::Utf8, true),
//! ]));
//!
//! let options = writer_options(&settings)
//!     .schema(schema)
//!     .compress(CompressionKind::Snappy)
//!     .row_index_stride(10_000);
//!
//! let mut writer = create_writer::<W>("/warehouse/t/part-0.orc", options)?;
//! writer.write_batch(&batch)?;
//! let stats = writer.close()?;
//! println!("{}", stats);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`version`]: registry of released format versions
//! - [`settings`]: ambient string properties and their defaults
//! - [`writer`]: writer options, the frozen configuration and the managed writer
//! - [`memory`]: the process-wide memory governor
//! - [`reader`]: the reader seam and precomputed footer information
//! - [`fs`]: file system targets
//! - [`orc_file`]: factory functions tying the pieces together
//!
//! ## Settings
//!
//! | Property | Default | Meaning |
//! |----------|---------|---------|
//! | `orc.compress` | `ZLIB` | Generic compression |
//! | `orc.compress.size` | 262144 | Compression buffer size |
//! | `orc.stripe.size` | `hive.exec.orc.default.stripe.size` or 256 MiB | Stripe size |
//! | `orc.row.index.stride` | 10000 | Rows between index entries |
//! | `orc.create.index` | `true` | Write row indexes |
//! | `orc.block.padding` | `true` | Pad stripes to blocks |
//! | `hive.exec.orc.write.format` | current version | Version to write |
//! | `hive.exec.orc.memory.pool` | 0.5 | Share of the pool for writers |
//! | `orc.memory.pool.size` | 4 GiB | Pool size |

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

pub mod fs;
pub mod memory;
pub mod orc_file;
pub mod reader;
pub mod settings;
pub mod version;
pub mod writer;

pub use orc_file::MAGIC;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::fs::{FileSystem, FileSystemRef, LocalFileSystem};
    pub use crate::memory::{GovernorError, GovernorHandle, MemoryGovernor, Pressure};
    pub use crate::orc_file::{
        create_reader, create_reader_with_meta, create_writer, create_writer_legacy,
        create_writer_with_config, open_reader, writer_options, OrcError, MAGIC,
    };
    pub use crate::reader::{FileMetaInfo, FormatReader, ReaderError};
    pub use crate::settings::Settings;
    pub use crate::version::{FormatVersion, UnknownVersion};
    pub use crate::writer::{
        CompressionKind, ConfigError, FormatWriter, ManagedWriter, WriterConfig, WriterOptions,
        WriterStats,
    };
}
