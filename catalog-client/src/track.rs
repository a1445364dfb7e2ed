//! In-flight request tracking
//!
//! An explicit, cloneable handle over the number of unsettled
//! requests. The count is the sole basis for the console's busy
//! indicator; it is never used for coordination or backpressure.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared in-flight counter
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    count: Arc<AtomicUsize>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dispatched request; the returned guard settles it
    pub fn begin(&self) -> InFlight {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlight {
            count: Arc::clone(&self.count),
        }
    }

    /// Number of requests currently unsettled
    pub fn in_flight(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// True while anything is loading
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }
}

/// Guard for one dispatched request
///
/// Dropping it settles the request, on success and failure alike.
#[derive(Debug)]
pub struct InFlight {
    count: Arc<AtomicUsize>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}
