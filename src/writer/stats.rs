use std::fmt;

/// Statistics from a closed writer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Rows handed to the writer
    pub rows_written: u64,
    /// Times the writer consulted the memory governor
    pub memory_checks: u64,
    /// Stripes flushed early because the governor reported pressure
    pub early_flushes: u64,
    /// Stripe size granted when the writer was created
    pub initial_stripe_size: u64,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows ({} memory checks, {} early flushes)",
            self.rows_written, self.memory_checks, self.early_flushes
        )
    }
}
