use crate::settings::InvalidSetting;
use crate::version::UnknownVersion;

/// Errors found while finalizing writer options.
///
/// These are never retried: the caller has to fix the options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No schema was given
    #[error("Writer options require a schema")]
    MissingSchema,

    /// Stripe size must be positive
    #[error("Invalid stripe size {0}: must be greater than 0")]
    InvalidStripeSize(u64),

    /// Row index stride must be 0 or at least 1000
    #[error("Invalid row index stride {0}: must be 0 (no indexes) or at least 1000")]
    InvalidRowIndexStride(u32),

    /// Compression buffer size must be positive
    #[error("Invalid compression buffer size {0}: must be greater than 0")]
    InvalidBufferSize(usize),

    /// Compression kind is unknown or not available in this build
    #[error("Unsupported compression kind: {0}")]
    UnsupportedCompression(String),

    /// An ambient setting does not parse
    #[error("{0}")]
    InvalidSetting(#[from] InvalidSetting),

    /// Requested format version is not registered
    #[error("{0}")]
    UnknownVersion(#[from] UnknownVersion),
}

/// Errors that can occur while writing through a managed writer
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// I/O error from the underlying writer, passed through unchanged
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// A batch does not match the schema the writer was configured with
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}
