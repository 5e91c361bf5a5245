use std::fmt;
use std::str::FromStr;

use arrow::datatypes::SchemaRef;
use log::warn;
use serde::Serialize;

use crate::fs::FileSystemRef;
use crate::memory::{GovernorError, GovernorHandle, MemoryGovernor};
use crate::settings::{keys, Settings};
use crate::version::{self, FormatVersion};

use super::error::ConfigError;

/// Generic compression applied to every stream in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompressionKind {
    /// Streams are stored as is
    None,
    /// Deflate, the default
    Zlib,
    /// Snappy (faster, slightly larger files)
    Snappy,
    /// LZO, readable by the format but not written by this crate
    Lzo,
}

impl Default for CompressionKind {
    fn default() -> Self {
        Self::Zlib
    }
}

impl CompressionKind {
    /// Kinds this crate can write
    pub const SUPPORTED: &'static [CompressionKind] = &[Self::None, Self::Zlib, Self::Snappy];

    /// Name used in settings and file footers
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Zlib => "ZLIB",
            Self::Snappy => "SNAPPY",
            Self::Lzo => "LZO",
        }
    }

    /// Whether writers can use this kind
    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

impl fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "ZLIB" => Ok(Self::Zlib),
            "SNAPPY" => Ok(Self::Snappy),
            "LZO" => Ok(Self::Lzo),
            _ => Err(ConfigError::UnsupportedCompression(s.to_string())),
        }
    }
}

/// Mutable options for creating a writer.
///
/// Starts from the ambient [`Settings`] and is adjusted with chained setters.
/// Setters never fail; every value is checked once, in [`build`](Self::build).
/// Only the last value given for a field matters.
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::datatypes::{DataType, Field, Schema};
/// use orcfile::settings::Settings;
/// use orcfile::writer::{CompressionKind, WriterOptions};
///
/// let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
///
/// let config = WriterOptions::new(&Settings::new())
///     .schema(schema)
///     .compress(CompressionKind::Snappy)
///     .stripe_size(64 * 1024 * 1024)
///     .row_index_stride(0)
///     .build()?;
///
/// assert!(!config.indexes_enabled());
/// # Ok::<(), orcfile::writer::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WriterOptions {
    settings: Settings,
    file_system: Option<FileSystemRef>,
    schema: Option<SchemaRef>,
    stripe_size: Result<u64, ConfigError>,
    row_index_stride: Result<u32, ConfigError>,
    buffer_size: Result<usize, ConfigError>,
    block_padding: Result<bool, ConfigError>,
    compression: Result<CompressionKind, ConfigError>,
    version: Result<FormatVersion, ConfigError>,
    memory: Result<GovernorHandle, GovernorError>,
}

impl WriterOptions {
    /// Default options for the given ambient settings.
    ///
    /// Creates the process-wide memory governor if this is the first writer
    /// configuration in the process.
    pub fn new(settings: &Settings) -> Self {
        let memory = MemoryGovernor::get_or_create(settings);
        if let Err(e) = &memory {
            warn!(
                "Memory governor unavailable, writers keep their requested stripe sizes: {}",
                e
            );
        }
        Self::with_memory(settings, memory)
    }

    pub(crate) fn with_memory(
        settings: &Settings,
        memory: Result<GovernorHandle, GovernorError>,
    ) -> Self {
        let stripe_size = match settings.get_parsed(keys::STRIPE_SIZE) {
            Ok(Some(size)) => Ok(size),
            Ok(None) => settings
                .get_u64_or(keys::DEFAULT_STRIPE_SIZE_KEY, keys::DEFAULT_STRIPE_SIZE)
                .map_err(ConfigError::from),
            Err(e) => Err(e.into()),
        };

        let row_index_stride = settings
            .get_bool_or(keys::ENABLE_INDEXES, keys::DEFAULT_ENABLE_INDEXES)
            .and_then(|enabled| {
                if enabled {
                    settings.get_u32_or(keys::ROW_INDEX_STRIDE, keys::DEFAULT_ROW_INDEX_STRIDE)
                } else {
                    Ok(0)
                }
            })
            .map_err(ConfigError::from);

        let compression = match settings.get(keys::COMPRESSION) {
            Some(name) => name.parse(),
            None => Ok(CompressionKind::default()),
        };

        let version = match settings.get(keys::WRITE_FORMAT) {
            Some(name) => version::resolve(name).map_err(ConfigError::from),
            None => Ok(version::current()),
        };

        Self {
            settings: settings.clone(),
            file_system: None,
            schema: None,
            stripe_size,
            row_index_stride,
            buffer_size: settings
                .get_usize_or(keys::COMPRESSION_BLOCK_SIZE, keys::DEFAULT_BUFFER_SIZE)
                .map_err(ConfigError::from),
            block_padding: settings
                .get_bool_or(keys::BLOCK_PADDING, keys::DEFAULT_BLOCK_PADDING)
                .map_err(ConfigError::from),
            compression,
            version,
            memory,
        }
    }

    /// File system to write to. When omitted it is resolved from the path.
    pub fn file_system(mut self, fs: FileSystemRef) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Schema of the rows the writer accepts. Required.
    pub fn schema(mut self, schema: SchemaRef) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Bytes of row data buffered in memory before a stripe is flushed.
    ///
    /// The memory governor may lower this when many writers share the budget.
    pub fn stripe_size(mut self, bytes: u64) -> Self {
        self.stripe_size = Ok(bytes);
        self
    }

    /// Rows between row index entries. 0 disables indexes; any other value
    /// must be at least 1000 so the index does not overwhelm the data.
    pub fn row_index_stride(mut self, rows: u32) -> Self {
        self.row_index_stride = Ok(rows);
        self
    }

    /// Size of each compression buffer.
    pub fn buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = Ok(bytes);
        self
    }

    /// Pad stripes so they do not straddle file system blocks. Padding
    /// improves read locality at the cost of space.
    pub fn block_padding(mut self, enabled: bool) -> Self {
        self.block_padding = Ok(enabled);
        self
    }

    /// Generic compression for stream data.
    pub fn compress(mut self, kind: CompressionKind) -> Self {
        self.compression = Ok(kind);
        self
    }

    /// Format version to write instead of the ambient or current one.
    pub fn version(mut self, version: FormatVersion) -> Self {
        self.version = Ok(version);
        self
    }

    /// Format version to write, by name. Unknown names fail at build time.
    pub fn version_name(mut self, name: &str) -> Self {
        self.version = version::resolve(name).map_err(ConfigError::from);
        self
    }

    /// Use a specific memory governor instead of the process-wide one.
    pub fn memory(mut self, governor: GovernorHandle) -> Self {
        self.memory = Ok(governor);
        self
    }

    /// Ambient settings these options were created from
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate every field and freeze the options.
    ///
    /// Fields are checked in a fixed order (schema, stripe size, row index
    /// stride, buffer size, block padding, compression, version) and the
    /// first problem is returned.
    pub fn build(self) -> Result<WriterConfig, ConfigError> {
        let schema = self.schema.ok_or(ConfigError::MissingSchema)?;

        let stripe_size = self.stripe_size?;
        if stripe_size == 0 {
            return Err(ConfigError::InvalidStripeSize(stripe_size));
        }

        let row_index_stride = self.row_index_stride?;
        if row_index_stride != 0 && row_index_stride < keys::MIN_ROW_INDEX_STRIDE {
            return Err(ConfigError::InvalidRowIndexStride(row_index_stride));
        }

        let buffer_size = self.buffer_size?;
        if buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize(buffer_size));
        }

        let block_padding = self.block_padding?;

        let compression = self.compression?;
        if !compression.is_supported() {
            return Err(ConfigError::UnsupportedCompression(compression.to_string()));
        }

        let version = self.version?;

        Ok(WriterConfig {
            settings: self.settings,
            file_system: self.file_system,
            schema,
            stripe_size,
            row_index_stride,
            buffer_size,
            block_padding,
            compression,
            version,
            memory: self.memory,
        })
    }
}

/// Validated, immutable writer parameters.
///
/// Each writer gets its own configuration; several configurations may share
/// one memory governor.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    settings: Settings,
    file_system: Option<FileSystemRef>,
    schema: SchemaRef,
    stripe_size: u64,
    row_index_stride: u32,
    buffer_size: usize,
    block_padding: bool,
    compression: CompressionKind,
    version: FormatVersion,
    memory: Result<GovernorHandle, GovernorError>,
}

impl WriterConfig {
    /// Ambient settings the configuration was built from
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// File system given explicitly, if any
    pub fn file_system(&self) -> Option<&FileSystemRef> {
        self.file_system.as_ref()
    }

    /// Schema of the rows
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Requested stripe size, before any reduction by the governor
    pub fn stripe_size(&self) -> u64 {
        self.stripe_size
    }

    /// Rows between row index entries, 0 when indexes are disabled
    pub fn row_index_stride(&self) -> u32 {
        self.row_index_stride
    }

    /// Whether row indexes are written
    pub fn indexes_enabled(&self) -> bool {
        self.row_index_stride != 0
    }

    /// Compression buffer size
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Whether stripes are padded to block boundaries
    pub fn block_padding(&self) -> bool {
        self.block_padding
    }

    /// Compression kind
    pub fn compression(&self) -> CompressionKind {
        self.compression
    }

    /// Format version to write
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    /// Memory governor, or `None` when it could not be created
    pub fn governor(&self) -> Option<&GovernorHandle> {
        self.memory.as_ref().ok()
    }

    /// Why the memory governor is missing, if it is
    pub fn governor_degraded(&self) -> Option<&GovernorError> {
        self.memory.as_ref().err()
    }

    /// Serializable view of the resolved values
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            compression: self.compression,
            buffer_size: self.buffer_size,
            stripe_size: self.stripe_size,
            row_index_stride: self.row_index_stride,
            block_padding: self.block_padding,
            version: self.version.name(),
            columns: self
                .schema
                .fields()
                .iter()
                .map(|f| format!("{}: {}", f.name(), f.data_type()))
                .collect(),
            memory_budget: self.governor().map(|g| g.budget()),
        }
    }
}

/// Plain values of a [`WriterConfig`], for display and comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    /// Compression kind
    pub compression: CompressionKind,
    /// Compression buffer size in bytes
    pub buffer_size: usize,
    /// Requested stripe size in bytes
    pub stripe_size: u64,
    /// Rows between row index entries
    pub row_index_stride: u32,
    /// Block padding flag
    pub block_padding: bool,
    /// Format version name
    pub version: &'static str,
    /// Column names and types
    pub columns: Vec<String>,
    /// Budget of the memory governor, if there is one
    pub memory_budget: Option<u64>,
}
