//! Message notifier
//!
//! Entry point for hosts. Each trigger (new message, thread read, delivery
//! failure) runs one update cycle: decide whether to alert, gather pending
//! messages from both sources, then post or cancel the summary notification.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::builder::NotificationStateBuilder;
use crate::chime::InThreadChime;
use crate::error::Result;
use crate::models::{NotificationState, Recipients};
use crate::preferences::NotificationPreferences;
use crate::presentation::{self, Presentation};
use crate::signal::{self, SignalDecision, VisibleThread};
use crate::silence::{now_ms, SilenceLookup};
use crate::sources::{MessageSources, RecipientResolver, ThreadDirectory};
use crate::surface::{NotificationId, NotificationSurface};

/// Everything the notifier talks to, supplied by the host.
#[derive(Clone)]
pub struct Collaborators {
    pub sources: Arc<dyn MessageSources>,
    pub threads: Arc<dyn ThreadDirectory>,
    pub resolver: Arc<dyn RecipientResolver>,
    pub preferences: Arc<dyn NotificationPreferences>,
    pub silence: Arc<dyn SilenceLookup>,
    pub surface: Arc<dyn NotificationSurface>,
    pub chime: InThreadChime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Notifications are turned off; nothing was touched
    Disabled,
    /// The thread is on screen; the chime may or may not have played
    InThread { chimed: bool },
    Rendered {
        id: NotificationId,
        message_count: usize,
        multiple_threads: bool,
    },
    Cancelled { id: NotificationId },
}

pub struct MessageNotifier {
    deps: Collaborators,
    visible_thread: VisibleThread,
    /// Serializes state construction and submission
    cycle_lock: Mutex<()>,
}

impl MessageNotifier {
    pub fn new(deps: Collaborators, visible_thread: VisibleThread) -> Self {
        Self {
            deps,
            visible_thread,
            cycle_lock: Mutex::new(()),
        }
    }

    pub fn visible_thread(&self) -> &VisibleThread {
        &self.visible_thread
    }

    pub fn set_visible_thread(&self, thread_id: i64) {
        self.visible_thread.set(thread_id);
    }

    /// Refresh the summary without alerting, e.g. after messages were read.
    pub fn update_notification(&self, locked: bool) -> Result<UpdateOutcome> {
        if !self.deps.preferences.is_notifications_enabled() {
            return Ok(UpdateOutcome::Disabled);
        }
        self.run_cycle(false, locked)
    }

    /// Refresh after a new message arrived in `thread_id`.
    pub fn update_for_thread(&self, thread_id: i64, locked: bool) -> Result<UpdateOutcome> {
        let prefs = self.deps.preferences.as_ref();
        if !prefs.is_notifications_enabled() {
            return Ok(UpdateOutcome::Disabled);
        }

        let silenced = self
            .deps
            .threads
            .recipients_for_thread(thread_id)
            .and_then(|r| r.primary_recipient().cloned())
            .map(|primary| self.deps.silence.is_silenced_now(&primary, now_ms()))
            .unwrap_or(false);

        match signal::decide(thread_id, self.visible_thread.get(), silenced) {
            SignalDecision::InThread => {
                debug!("Thread {} is on screen, marking read", thread_id);
                self.deps.threads.set_read(thread_id);
                Ok(UpdateOutcome::InThread {
                    chimed: self.deps.chime.ring(prefs),
                })
            }
            SignalDecision::Notify { signal } => self.run_cycle(signal, locked),
        }
    }

    /// Tell the user a message to `thread_id` could not be delivered.
    pub fn notify_delivery_failed(&self, recipients: &Recipients, thread_id: i64) -> UpdateOutcome {
        let prefs = self.deps.preferences.as_ref();

        if signal::decide(thread_id, self.visible_thread.get(), false) == SignalDecision::InThread {
            return UpdateOutcome::InThread {
                chimed: self.deps.chime.ring(prefs),
            };
        }

        let presentation = presentation::delivery_failure(recipients, thread_id, prefs);
        let _guard = self.cycle_lock.lock();
        self.deps.surface.apply(&presentation);
        info!("Posted delivery failure for thread {}", thread_id);

        UpdateOutcome::Rendered {
            id: presentation.id(),
            message_count: 1,
            multiple_threads: false,
        }
    }

    fn run_cycle(&self, signal: bool, locked: bool) -> Result<UpdateOutcome> {
        let _guard = self.cycle_lock.lock();

        let state = self.build_state(locked).map_err(|e| {
            error!("Notification update aborted: {}", e);
            e
        })?;

        let presentation = presentation::select(
            &state,
            signal,
            locked,
            self.deps.preferences.as_ref(),
        );
        self.deps.surface.apply(&presentation);

        let outcome = match &presentation {
            Presentation::Render { id, .. } => UpdateOutcome::Rendered {
                id: *id,
                message_count: state.message_count(),
                multiple_threads: state.has_multiple_threads(),
            },
            Presentation::Cancel { id } => UpdateOutcome::Cancelled { id: *id },
        };
        debug!("Notification update finished: {:?} (signal={})", outcome, signal);
        Ok(outcome)
    }

    fn build_state(&self, locked: bool) -> Result<NotificationState> {
        let mut unread = self.deps.sources.open_unread()?;
        let pending = match self.deps.sources.open_pending() {
            Ok(pending) => pending,
            Err(e) => {
                unread.close();
                return Err(e);
            }
        };

        NotificationStateBuilder::new(self.deps.threads.as_ref(), self.deps.resolver.as_ref())
            .build(unread, pending, locked)
    }
}

impl std::fmt::Debug for MessageNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageNotifier")
            .field("visible_thread", &self.visible_thread.get())
            .finish_non_exhaustive()
    }
}
