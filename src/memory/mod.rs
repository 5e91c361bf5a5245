//! # Shared Memory Budget
//!
//! Every writer buffers a whole stripe in memory before flushing it. When
//! many writers run in one process their stripes compete for the same RAM,
//! so all of them register with a single [`MemoryGovernor`] that divides a
//! fixed budget between them.
//!
//! ## Allocation Policy
//!
//! Writers ask for the stripe size they were configured with. While the sum
//! of requests fits in the budget every writer gets exactly what it asked
//! for. Once it does not, each of the `n` writers keeps one byte and the
//! rest of the budget is split by scaling every request by the same factor:
//!
//! ```text
//! share = 1 + floor((requested - 1) * (budget - n) / (total_requested - n))
//! ```
//!
//! - no writer ever gets more than it asked for, or less than one byte,
//! - the effective sizes never add up to more than the budget, unless there
//!   are more writers than bytes in the budget and each one gets one byte,
//! - the result depends only on the set of registered requests.
//!
//! Closing a writer releases its share; the others see the larger allowance
//! the next time they check in.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use orcfile::memory::{MemoryGovernor, Pressure};
//!
//! let governor = Arc::new(MemoryGovernor::new(1000)?);
//!
//! let a = governor.lease(800);
//! let b = governor.lease(800);
//! assert_eq!(a.effective_stripe_size(), 500);
//! assert_eq!(b.effective_stripe_size(), 500);
//!
//! // Writers compare what they have buffered with their current share
//! assert_eq!(a.check(499), Pressure::Ok);
//! assert_eq!(a.check(500), Pressure::MustFlushNow);
//!
//! drop(b);
//! assert_eq!(a.effective_stripe_size(), 800);
//! # Ok::<(), orcfile::memory::GovernorError>(())
//! ```

mod error;
mod governor;
mod lease;

#[cfg(test)]
mod tests;

pub use error::GovernorError;
pub use governor::{GovernorHandle, MemoryGovernor, Pressure, Registration, WriterId};
pub use lease::MemoryLease;

/// Rows a writer appends between two memory checks
pub const ROWS_BETWEEN_CHECKS: u64 = 5000;
