//! Whether an update should alert the user.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::constants::UNRESOLVED_THREAD;

/// The thread the user currently has open, shared process-wide.
///
/// Set by the UI layer and read by every update cycle. Last writer wins;
/// no other coordination is needed for a single scalar.
#[derive(Debug, Clone)]
pub struct VisibleThread(Arc<AtomicI64>);

impl VisibleThread {
    pub fn new() -> Self {
        Self(Arc::new(AtomicI64::new(UNRESOLVED_THREAD)))
    }

    pub fn set(&self, thread_id: i64) {
        self.0.store(thread_id, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.set(UNRESOLVED_THREAD);
    }

    pub fn get(&self) -> Option<i64> {
        match self.0.load(Ordering::SeqCst) {
            UNRESOLVED_THREAD => None,
            id => Some(id),
        }
    }
}

impl Default for VisibleThread {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDecision {
    /// The user is looking at the thread: mark it read and chime instead of notifying
    InThread,
    /// Update the system notification, alerting only when `signal` is set
    Notify { signal: bool },
}

/// Decide how to surface an update to `affected_thread`.
///
/// `silenced` is the mute state of the thread's primary recipient and only
/// matters when the thread is not on screen.
pub fn decide(affected_thread: i64, visible_thread: Option<i64>, silenced: bool) -> SignalDecision {
    if affected_thread != UNRESOLVED_THREAD && visible_thread == Some(affected_thread) {
        SignalDecision::InThread
    } else {
        SignalDecision::Notify { signal: !silenced }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_thread_gets_in_thread_treatment() {
        assert_eq!(decide(7, Some(7), false), SignalDecision::InThread);
        // Mute state is irrelevant when on screen
        assert_eq!(decide(7, Some(7), true), SignalDecision::InThread);
    }

    #[test]
    fn test_other_thread_signals_unless_silenced() {
        assert_eq!(decide(7, Some(3), false), SignalDecision::Notify { signal: true });
        assert_eq!(decide(7, None, true), SignalDecision::Notify { signal: false });
    }

    #[test]
    fn test_unresolved_thread_never_matches() {
        assert_eq!(
            decide(UNRESOLVED_THREAD, None, false),
            SignalDecision::Notify { signal: true }
        );
    }

    #[test]
    fn test_visible_thread_last_writer_wins() {
        let visible = VisibleThread::new();
        assert_eq!(visible.get(), None);

        let ui = visible.clone();
        ui.set(4);
        ui.set(9);
        assert_eq!(visible.get(), Some(9));

        visible.clear();
        assert_eq!(ui.get(), None);
    }
}
