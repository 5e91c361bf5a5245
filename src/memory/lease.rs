use std::fmt;
use std::sync::Arc;

use super::governor::{MemoryGovernor, Pressure, Registration, WriterId};

/// A writer's registration with a [`MemoryGovernor`].
///
/// Dropping the lease unregisters the writer, so the budget comes back even
/// when a writer is abandoned after an error.
pub struct MemoryLease {
    governor: Arc<MemoryGovernor>,
    registration: Registration,
}

impl MemoryLease {
    pub(super) fn new(governor: Arc<MemoryGovernor>, registration: Registration) -> Self {
        Self {
            governor,
            registration,
        }
    }

    /// Token the governor issued for this writer
    pub fn id(&self) -> WriterId {
        self.registration.id
    }

    /// Share granted when the writer registered
    pub fn initial_stripe_size(&self) -> u64 {
        self.registration.effective_stripe_size
    }

    /// Current share, which changes as other writers come and go
    pub fn effective_stripe_size(&self) -> u64 {
        self.governor
            .effective_stripe_size(self.registration.id)
            .unwrap_or(self.registration.effective_stripe_size)
    }

    /// Ask whether `buffered_bytes` is over the current share
    pub fn check(&self, buffered_bytes: u64) -> Pressure {
        self.governor.check_pressure(self.registration.id, buffered_bytes)
    }

    /// The governor this lease belongs to
    pub fn governor(&self) -> &Arc<MemoryGovernor> {
        &self.governor
    }

    /// Unregister now instead of at drop
    pub fn release(self) {}
}

impl Drop for MemoryLease {
    fn drop(&mut self) {
        self.governor.unregister(self.registration.id);
    }
}

impl fmt::Debug for MemoryLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLease")
            .field("id", &self.registration.id)
            .field("initial_stripe_size", &self.registration.effective_stripe_size)
            .finish()
    }
}
