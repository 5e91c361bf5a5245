use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::record_batch::RecordBatch;

use crate::fs::FileSystemRef;
use crate::memory::{MemoryLease, Pressure, WriterId, ROWS_BETWEEN_CHECKS};

use super::config::WriterConfig;
use super::error::WriterError;
use super::stats::WriterStats;

/// A file writer: encodes rows into stripes and writes the file layout.
///
/// Implementations own their stripe buffers. They are created through
/// [`create_writer`](crate::orc_file::create_writer), which wraps them in a
/// [`ManagedWriter`] that keeps them within the shared memory budget.
pub trait FormatWriter: Sized {
    /// Open a new file.
    ///
    /// `stripe_size` is the size granted by the memory governor and replaces
    /// [`WriterConfig::stripe_size`].
    fn create(
        fs: FileSystemRef,
        path: &Path,
        config: Arc<WriterConfig>,
        stripe_size: u64,
    ) -> io::Result<Self>;

    /// Append a batch of rows
    fn write_batch(&mut self, batch: &RecordBatch) -> io::Result<()>;

    /// Bytes buffered for the stripe in progress
    fn buffered_bytes(&self) -> u64;

    /// Flush the stripe in progress, even if it is not full
    fn flush_stripe(&mut self) -> io::Result<()>;

    /// Flush remaining data and write the file footer
    fn close(self) -> io::Result<()>;
}

/// A [`FormatWriter`] registered with the memory governor.
///
/// Every [`ROWS_BETWEEN_CHECKS`] rows the writer compares its buffered bytes
/// with its current share of the budget and flushes the stripe early when it
/// is over. The registration is released when the writer is closed or
/// dropped, including after errors.
pub struct ManagedWriter<W: FormatWriter> {
    inner: W,
    config: Arc<WriterConfig>,
    lease: Option<MemoryLease>,
    path: PathBuf,
    rows_since_check: u64,
    stats: WriterStats,
}

impl<W: FormatWriter> ManagedWriter<W> {
    pub(crate) fn new(
        inner: W,
        config: Arc<WriterConfig>,
        lease: Option<MemoryLease>,
        path: PathBuf,
        initial_stripe_size: u64,
    ) -> Self {
        Self {
            inner,
            config,
            lease,
            path,
            rows_since_check: 0,
            stats: WriterStats {
                initial_stripe_size,
                ..WriterStats::default()
            },
        }
    }

    /// Write a batch of rows, checking memory pressure when due.
    pub fn write_batch(&mut self, batch: &RecordBatch) -> Result<(), WriterError> {
        if batch.schema().fields() != self.config.schema().fields() {
            return Err(WriterError::SchemaMismatch(format!(
                "expected {:?}, got {:?}",
                self.config.schema().fields(),
                batch.schema().fields()
            )));
        }

        self.inner.write_batch(batch)?;
        self.rows_added(batch.num_rows() as u64)
    }

    /// Account for rows appended directly through [`inner_mut`](Self::inner_mut).
    pub fn rows_added(&mut self, rows: u64) -> Result<(), WriterError> {
        self.stats.rows_written += rows;
        self.rows_since_check += rows;
        if self.rows_since_check >= ROWS_BETWEEN_CHECKS {
            self.rows_since_check = 0;
            self.check_memory()?;
        }
        Ok(())
    }

    fn check_memory(&mut self) -> io::Result<()> {
        let Some(lease) = &self.lease else {
            return Ok(());
        };

        self.stats.memory_checks += 1;
        if lease.check(self.inner.buffered_bytes()) == Pressure::MustFlushNow {
            self.inner.flush_stripe()?;
            self.stats.early_flushes += 1;
        }
        Ok(())
    }

    /// Current stripe size allowance
    pub fn effective_stripe_size(&self) -> u64 {
        match &self.lease {
            Some(lease) => lease.effective_stripe_size(),
            None => self.config.stripe_size(),
        }
    }

    /// Token issued by the governor, `None` when running without one
    pub fn writer_id(&self) -> Option<WriterId> {
        self.lease.as_ref().map(MemoryLease::id)
    }

    /// Configuration the writer was created with
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Path being written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Statistics so far
    pub fn stats(&self) -> &WriterStats {
        &self.stats
    }

    /// The wrapped writer
    pub fn inner(&self) -> &W {
        &self.inner
    }

    /// The wrapped writer, mutably
    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Close the file and release the memory registration.
    pub fn close(self) -> Result<WriterStats, WriterError> {
        let Self {
            inner, lease, stats, ..
        } = self;

        let result = inner.close();
        // Released whether or not the close succeeded
        drop(lease);
        result?;
        Ok(stats)
    }
}
