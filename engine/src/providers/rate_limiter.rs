//! Rate limiter trait.
//!
//! Protects the atomic ledger from abuse: two independent fixed-window
//! counters, one per claimant identity and one per network origin, both of
//! which must stay at or below the configured maximum.

use flashdrop_core::error::Result;
use flashdrop_core::ClaimantId;
use std::time::Duration;

/// Fixed-window attempt counters per claimant and per origin.
///
/// Every call counts against the limit whether or not it is admitted —
/// attempted requests are the thing being limited, not successful ones.
/// Counters reset only through expiry.
pub trait RateLimiter: Send + Sync {
    /// Count this attempt and decide whether to admit it.
    ///
    /// Atomically increments the claimant counter (and, when `origin` is
    /// known and non-blank, the origin counter), setting the window expiry
    /// on a counter's first increment. Admits only if *both* post-increment
    /// counts are at or below `max_requests`.
    ///
    /// Returns `Ok(false)` on denial; the increments stay recorded.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] if the counter store
    /// failed — distinct from a denial.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn admit(
        &self,
        claimant_id: ClaimantId,
        origin: Option<&str>,
        max_requests: u32,
        window: Duration,
    ) -> impl Future<Output = Result<bool>> + Send;
}
