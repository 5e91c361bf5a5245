use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use log::{debug, info};
use parking_lot::Mutex;

use crate::settings::{keys, Settings};

use super::error::GovernorError;
use super::lease::MemoryLease;

/// Shared reference to a governor, carried by every writer configuration
pub type GovernorHandle = Arc<MemoryGovernor>;

// =============================================================================
// Process-wide instance
// =============================================================================
//
// One budget per process. The fast path reads the cell without locking; the
// init lock serializes the first construction so concurrent first callers
// cannot build two independent budgets.

static GLOBAL: OnceLock<GovernorHandle> = OnceLock::new();
static GLOBAL_INIT: Mutex<()> = parking_lot::const_mutex(());

/// Opaque token identifying one registered writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WriterId(u64);

impl fmt::Display for WriterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "writer-{}", self.0)
    }
}

/// Answer to a writer's periodic memory check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pressure {
    /// Keep buffering
    Ok,
    /// The writer holds at least its share and must flush its stripe now
    MustFlushNow,
}

/// Result of registering a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Token to pass to later calls
    pub id: WriterId,
    /// Stripe size the writer must use instead of the one it asked for
    pub effective_stripe_size: u64,
}

#[derive(Debug, Default)]
struct GovernorState {
    /// Requested stripe size per writer
    writers: HashMap<WriterId, u64>,
    /// Sum of all requests, wide enough never to overflow
    total_requested: u128,
    /// Writers with a non-zero request, each guaranteed one byte
    active: u128,
}

impl GovernorState {
    fn add(&mut self, id: WriterId, requested: u64) {
        self.writers.insert(id, requested);
        self.total_requested += u128::from(requested);
        if requested > 0 {
            self.active += 1;
        }
    }

    fn remove(&mut self, id: WriterId) -> bool {
        match self.writers.remove(&id) {
            Some(requested) => {
                self.total_requested -= u128::from(requested);
                if requested > 0 {
                    self.active -= 1;
                }
                true
            }
            None => false,
        }
    }

    fn share_of(&self, requested: u64, budget: u64) -> u64 {
        let budget = u128::from(budget);
        if requested == 0 || self.total_requested <= budget {
            return requested;
        }
        if budget <= self.active {
            // More writers than bytes: nobody can get less than one byte
            return 1;
        }

        // Every active writer keeps one byte, the rest of the budget is
        // scaled by the same factor. Each share stays within its request
        // and the shares add up to at most the budget.
        let spare = budget - self.active;
        let pool = self.total_requested - self.active;
        (1 + u128::from(requested - 1) * spare / pool) as u64
    }

    fn scale(&self, budget: u64) -> f64 {
        if self.total_requested <= u128::from(budget) {
            1.0
        } else {
            budget as f64 / self.total_requested as f64
        }
    }
}

/// `floor(pool_size * fraction)` for a fraction in `(0, 1]`, without
/// rounding `pool_size` through a float.
fn scale_pool(pool_size: u64, fraction: f64) -> u64 {
    let bits = fraction.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction_bits = bits & ((1u64 << 52) - 1);
    // fraction == mantissa * 2^-shift exactly
    let (mantissa, shift) = if exponent == 0 {
        (fraction_bits, 1074)
    } else {
        (fraction_bits | (1u64 << 52), 1075 - exponent)
    };

    let product = u128::from(pool_size) * u128::from(mantissa);
    match u32::try_from(shift) {
        Ok(shift) => product.checked_shr(shift).unwrap_or(0) as u64,
        Err(_) => u64::MAX,
    }
}

/// Divides one memory budget between all writers that register with it.
///
/// All bookkeeping happens under a single lock and is pure arithmetic, so
/// calls never wait on writer I/O.
pub struct MemoryGovernor {
    budget: u64,
    next_id: AtomicU64,
    state: Mutex<GovernorState>,
}

impl MemoryGovernor {
    /// Create a standalone governor with the given budget in bytes.
    ///
    /// Most callers want the shared instance from [`MemoryGovernor::get_or_create`];
    /// a private governor is useful for isolating a group of writers.
    pub fn new(budget: u64) -> Result<Self, GovernorError> {
        if budget == 0 {
            return Err(GovernorError::EmptyBudget);
        }
        Ok(Self {
            budget,
            next_id: AtomicU64::new(0),
            state: Mutex::new(GovernorState::default()),
        })
    }

    /// Create a governor whose budget is `orc.memory.pool.size` scaled by
    /// `hive.exec.orc.memory.pool`.
    pub fn from_settings(settings: &Settings) -> Result<Self, GovernorError> {
        let pool_size = settings.get_u64_or(keys::MEMORY_POOL_SIZE, keys::DEFAULT_MEMORY_POOL_SIZE)?;
        let fraction = settings.get_f64_or(keys::MEMORY_POOL, keys::DEFAULT_MEMORY_POOL_FRACTION)?;

        // Rejects NaN as well
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(GovernorError::InvalidFraction(fraction));
        }

        Self::new(scale_pool(pool_size, fraction))
    }

    /// Get the process-wide governor, creating it from `settings` on first use.
    ///
    /// Every caller, including the one that created it, receives the same
    /// instance. Settings passed after the first successful call are ignored.
    /// If construction fails nothing is stored and the next caller tries again.
    pub fn get_or_create(settings: &Settings) -> Result<GovernorHandle, GovernorError> {
        if let Some(governor) = GLOBAL.get() {
            return Ok(Arc::clone(governor));
        }

        let _guard = GLOBAL_INIT.lock();
        if let Some(governor) = GLOBAL.get() {
            return Ok(Arc::clone(governor));
        }

        let governor = Arc::new(Self::from_settings(settings)?);
        info!("Created memory governor with a budget of {} bytes", governor.budget);
        Ok(Arc::clone(GLOBAL.get_or_init(|| governor)))
    }

    /// The process-wide governor, if one has been created
    pub fn global() -> Option<GovernorHandle> {
        GLOBAL.get().cloned()
    }

    /// Total bytes shared between writers
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// Register a writer that wants stripes of `requested` bytes.
    ///
    /// The returned size may be smaller than the request when the budget is
    /// oversubscribed, and is at least one byte for a non-zero request. It
    /// is the share at the time of registration only: the next registration
    /// or release changes it, and writers pick up their current share on
    /// their next [`check_pressure`](Self::check_pressure).
    pub fn register(&self, requested: u64) -> Registration {
        let id = WriterId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut state = self.state.lock();
        state.add(id, requested);
        let effective_stripe_size = state.share_of(requested, self.budget);

        debug!(
            "Registered {} requesting {} bytes, granted {} ({} writers, scale {:.3})",
            id,
            requested,
            effective_stripe_size,
            state.writers.len(),
            state.scale(self.budget)
        );

        Registration {
            id,
            effective_stripe_size,
        }
    }

    /// Register a writer and wrap the registration in a guard that
    /// unregisters on drop.
    pub fn lease(self: &Arc<Self>, requested: u64) -> MemoryLease {
        MemoryLease::new(Arc::clone(self), self.register(requested))
    }

    /// Remove a writer, returning whether it was registered.
    pub fn unregister(&self, id: WriterId) -> bool {
        let mut state = self.state.lock();
        let removed = state.remove(id);
        if removed {
            debug!(
                "Unregistered {} ({} writers left, scale {:.3})",
                id,
                state.writers.len(),
                state.scale(self.budget)
            );
        }
        removed
    }

    /// Current share of a registered writer
    pub fn effective_stripe_size(&self, id: WriterId) -> Option<u64> {
        let state = self.state.lock();
        state
            .writers
            .get(&id)
            .map(|&requested| state.share_of(requested, self.budget))
    }

    /// Decide whether a writer holding `buffered_bytes` must flush now.
    ///
    /// Unknown writers and writers holding nothing are never told to flush.
    pub fn check_pressure(&self, id: WriterId, buffered_bytes: u64) -> Pressure {
        if buffered_bytes == 0 {
            return Pressure::Ok;
        }
        match self.effective_stripe_size(id) {
            Some(share) if buffered_bytes >= share => {
                debug!(
                    "{} holds {} bytes against a share of {}, flushing early",
                    id, buffered_bytes, share
                );
                Pressure::MustFlushNow
            }
            _ => Pressure::Ok,
        }
    }

    /// Factor every request is currently multiplied by, at most 1
    pub fn allocation_scale(&self) -> f64 {
        self.state.lock().scale(self.budget)
    }

    /// Number of registered writers
    pub fn registered_writers(&self) -> usize {
        self.state.lock().writers.len()
    }

    /// Sum of the stripe sizes registered writers asked for
    pub fn total_requested(&self) -> u128 {
        self.state.lock().total_requested
    }
}

impl fmt::Debug for MemoryGovernor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryGovernor")
            .field("budget", &self.budget)
            .field("writers", &state.writers.len())
            .field("total_requested", &state.total_requested)
            .finish()
    }
}
