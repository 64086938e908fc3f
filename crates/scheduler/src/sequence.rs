//! Monotonic request numbering for discarding superseded query results.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Identifier for one issued request. Larger ids are newer.
pub type RequestId = u64;

/// Issues request ids and remembers only the newest one.
///
/// The consumer tags each query with `begin()` and, when a result arrives,
/// applies it only if `is_current(id)` still holds. A query that resolved
/// after a newer one was issued is silently dropped, which closes the
/// stale-response window without coordinating the workers themselves.
#[derive(Debug, Clone)]
pub struct RequestSequence {
    latest: Arc<AtomicU64>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self { latest: Arc::new(AtomicU64::new(0)) }
    }

    /// Issue the next request id, superseding all earlier ones.
    pub fn begin(&self) -> RequestId {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Whether `id` is still the newest issued request.
    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest.load(Ordering::Acquire) == id
    }

    /// Invalidate every outstanding request without issuing a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

impl Default for RequestSequence {
    fn default() -> Self {
        Self::new()
    }
}
