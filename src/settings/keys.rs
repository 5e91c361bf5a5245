//! Property names read from [`Settings`](super::Settings) and their built-in
//! defaults.

/// Generic compression codec used for stream data (`NONE`, `ZLIB`, `SNAPPY`, `LZO`)
pub const COMPRESSION: &str = "orc.compress";

/// Size in bytes of each compression chunk
pub const COMPRESSION_BLOCK_SIZE: &str = "orc.compress.size";

/// Stripe size in bytes for a single table
pub const STRIPE_SIZE: &str = "orc.stripe.size";

/// Rows between row index entries; 0 suppresses indexes
pub const ROW_INDEX_STRIDE: &str = "orc.row.index.stride";

/// Whether row indexes are written at all
pub const ENABLE_INDEXES: &str = "orc.create.index";

/// Whether stripes are padded to file system block boundaries
pub const BLOCK_PADDING: &str = "orc.block.padding";

/// Process-wide default stripe size, used when [`STRIPE_SIZE`] is not set
pub const DEFAULT_STRIPE_SIZE_KEY: &str = "hive.exec.orc.default.stripe.size";

/// Name of the format version new files are written with
pub const WRITE_FORMAT: &str = "hive.exec.orc.write.format";

/// Fraction of the memory pool that all writers together may buffer
pub const MEMORY_POOL: &str = "hive.exec.orc.memory.pool";

/// Size in bytes of the memory pool the [`MEMORY_POOL`] fraction applies to
pub const MEMORY_POOL_SIZE: &str = "orc.memory.pool.size";

/// Default stripe size (256 MiB)
pub const DEFAULT_STRIPE_SIZE: u64 = 256 * 1024 * 1024;

/// Default compression chunk size (256 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// Default number of rows between row index entries
pub const DEFAULT_ROW_INDEX_STRIDE: u32 = 10_000;

/// Smallest non-zero row index stride
pub const MIN_ROW_INDEX_STRIDE: u32 = 1_000;

/// Block padding is on unless disabled
pub const DEFAULT_BLOCK_PADDING: bool = true;

/// Row indexes are written unless disabled
pub const DEFAULT_ENABLE_INDEXES: bool = true;

/// Default share of the memory pool given to writers
pub const DEFAULT_MEMORY_POOL_FRACTION: f64 = 0.5;

/// Default memory pool size (4 GiB)
pub const DEFAULT_MEMORY_POOL_SIZE: u64 = 4 * 1024 * 1024 * 1024;

/// Block size reported by the local file system, used for block padding
pub const LOCAL_BLOCK_SIZE: &str = "fs.local.block.size";

/// Default local block size (32 MiB)
pub const DEFAULT_LOCAL_BLOCK_SIZE: u64 = 32 * 1024 * 1024;
