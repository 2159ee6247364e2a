//! Invocation tracking for superseded requests.
//!
//! A user may pick a new file while the previous one is still being encoded.
//! Each invocation takes a [`Ticket`] from the shared [`InvocationTracker`];
//! starting a new invocation makes every older ticket stale, and results
//! carried by a stale ticket are dropped instead of reaching the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hands out tickets and remembers which one is the latest.
#[derive(Debug, Clone, Default)]
pub struct InvocationTracker {
    latest: Arc<AtomicU64>,
}

impl InvocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new invocation, superseding all earlier ones.
    pub fn begin(&self) -> Ticket {
        let id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            id,
            latest: Arc::clone(&self.latest),
        }
    }
}

/// Identity of one invocation.
///
/// Cheap to clone and `'static`, so it can move into a spawned future.
#[derive(Debug, Clone)]
pub struct Ticket {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl Ticket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether no newer invocation has started since this ticket was issued.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.id
    }

    /// Pass `value` through only if this ticket is still current.
    pub fn accept<T>(&self, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            tracing::debug!(invocation = self.id, "dropping result of stale invocation");
            None
        }
    }
}
