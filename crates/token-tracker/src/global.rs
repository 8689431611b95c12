//! Process-wide tracker instance.

use crate::tracker::UsageTracker;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Tracker handle that can be shared across threads.
pub type SharedTracker = Arc<Mutex<UsageTracker>>;

static GLOBAL_TRACKER: Mutex<Option<SharedTracker>> = parking_lot::const_mutex(None);

/// Get the global tracker, creating an inert one on first access.
#[must_use]
pub fn global_tracker() -> SharedTracker {
    let mut slot = GLOBAL_TRACKER.lock();
    let tracker = slot.get_or_insert_with(|| {
        debug!("Creating global token usage tracker");
        Arc::new(Mutex::new(UsageTracker::new()))
    });
    Arc::clone(tracker)
}

/// Replace the global tracker with a fresh inert instance and return it.
///
/// Unlike [`UsageTracker::reset`], this also disables tracking. Handles
/// obtained before the call keep pointing at the old instance.
pub fn reset_global_tracker() -> SharedTracker {
    let fresh: SharedTracker = Arc::new(Mutex::new(UsageTracker::new()));
    *GLOBAL_TRACKER.lock() = Some(Arc::clone(&fresh));

    debug!("Global token usage tracker replaced");

    fresh
}
