//! # Writer Configuration
//!
//! This module turns ambient settings and caller overrides into one immutable
//! [`WriterConfig`], and defines the seam to the code that actually encodes
//! stripes.
//!
//! ## Design Principles
//!
//! 1. **Deferred Validation**: [`WriterOptions`] setters never fail. All
//!    checks run once in [`WriterOptions::build`], which reports the first
//!    invalid field.
//!
//! 2. **Layered Defaults**: explicit setter > ambient setting > built-in
//!    default, for every field including the format version.
//!
//! 3. **Shared Budget**: every configuration carries a handle to the memory
//!    governor, and [`ManagedWriter`] keeps the stripe buffers of its
//!    [`FormatWriter`] within the writer's share.

mod config;
mod error;
mod managed;
mod stats;


pub use config::{CompressionKind, ConfigSummary, WriterConfig, WriterOptions};
pub use error::{ConfigError, WriterError};
pub use managed::{FormatWriter, ManagedWriter};
pub use stats::WriterStats;
