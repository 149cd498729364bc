//! Global loading indicator, scoped to request lifetimes.
//!
//! Every request acquires a guard before sending and releases it when
//! the response settles, success or error. The notifier only hears
//! about the 0 -> 1 and 1 -> 0 transitions, so overlapping requests
//! keep a single indicator visible.

use client_core::notify::Notifier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub struct LoadingTracker {
    in_flight: AtomicUsize,
    notifier: Arc<dyn Notifier>,
}

impl LoadingTracker {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            notifier,
        }
    }

    pub fn acquire(self: &Arc<Self>) -> LoadingGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.notifier.loading_started();
        }
        LoadingGuard {
            tracker: Arc::clone(self),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Release-on-drop handle; dropping on every exit path guarantees the
/// indicator is hidden even when a request errors.
pub struct LoadingGuard {
    tracker: Arc<LoadingTracker>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.tracker.notifier.loading_finished();
        }
    }
}
