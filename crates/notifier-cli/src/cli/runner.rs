use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use notifier_core::chime::{CuePlayer, InThreadChime, NoopAudioFocus};
use notifier_core::notifier::Collaborators;
use notifier_core::preferences::NotificationPreferences;
use notifier_core::sources::{ThreadDirectory, ThreadTable};
use notifier_core::{MessageNotifier, NotificationSurface, UpdateOutcome, VisibleThread};
use tracing::info;

use super::Fixture;

const DATA_DIR_NAME: &str = "unread-notifier";

/// Platform data directory for preferences, falling back to the working directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(DATA_DIR_NAME))
}

/// One notifier wired to a fixture-backed store.
pub struct Runner {
    notifier: MessageNotifier,
    threads: Arc<ThreadTable>,
}

impl Runner {
    pub fn new(
        fixture: Fixture,
        preferences: Arc<dyn NotificationPreferences>,
        surface: Arc<dyn NotificationSurface>,
        player: Arc<dyn CuePlayer>,
    ) -> Self {
        let (sources, threads, contacts, mutes) = fixture.into_parts();
        let threads = Arc::new(threads);

        let deps = Collaborators {
            sources: Arc::new(sources),
            threads: threads.clone(),
            resolver: Arc::new(contacts),
            preferences,
            silence: Arc::new(mutes),
            surface,
            chime: InThreadChime::new(player, Arc::new(NoopAudioFocus)),
        };

        Self {
            notifier: MessageNotifier::new(deps, VisibleThread::new()),
            threads,
        }
    }

    pub fn set_visible_thread(&self, thread_id: Option<i64>) {
        match thread_id {
            Some(id) => self.notifier.set_visible_thread(id),
            None => self.notifier.visible_thread().clear(),
        }
    }

    /// Plain refresh without `thread_id`, otherwise a new-message update for it.
    pub fn update(&self, thread_id: Option<i64>, locked: bool) -> Result<UpdateOutcome> {
        let outcome = match thread_id {
            Some(id) => self
                .notifier
                .update_for_thread(id, locked)
                .with_context(|| format!("Update for thread {} failed", id))?,
            None => self
                .notifier
                .update_notification(locked)
                .context("Notification refresh failed")?,
        };
        info!("Update finished: {:?}", outcome);
        Ok(outcome)
    }

    pub fn delivery_failed(&self, thread_id: i64) -> Result<UpdateOutcome> {
        let recipients = self
            .threads
            .recipients_for_thread(thread_id)
            .ok_or_else(|| anyhow!("Unknown thread {}", thread_id))?;
        Ok(self.notifier.notify_delivery_failed(&recipients, thread_id))
    }

    /// Threads marked read so far, in id order.
    pub fn read_threads(&self) -> Vec<i64> {
        self.threads
            .entries()
            .into_iter()
            .filter(|entry| entry.read)
            .map(|entry| entry.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::audio::LoggingCuePlayer;
    use notifier_core::preferences::Preferences;
    use notifier_core::surface::RecordingSurface;
    use notifier_core::NotificationId;

    const STORE: &str = r#"{
        "threads": [
            {"id": 5, "recipients": [{"address": "+15550105", "name": "Alice"}]},
            {"id": 7, "recipients": [{"address": "+15550107", "name": "Bob"}]}
        ],
        "unread": [
            {
                "individual_recipient": {"address": "+15550105", "name": "Alice"},
                "recipients": [{"address": "+15550105", "name": "Alice"}],
                "thread_id": 5,
                "body": "hello"
            }
        ]
    }"#;

    fn runner(surface: Arc<RecordingSurface>) -> Runner {
        Runner::new(
            Fixture::from_json(STORE).unwrap(),
            Arc::new(Preferences::default()),
            surface,
            Arc::new(LoggingCuePlayer),
        )
    }

    #[test]
    fn test_update_renders_summary() {
        let surface = Arc::new(RecordingSurface::new());
        let runner = runner(surface.clone());

        let outcome = runner.update(Some(5), false).unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Rendered {
                id: NotificationId::CANONICAL,
                message_count: 1,
                multiple_threads: false,
            }
        );
        assert_eq!(surface.renders().len(), 1);
    }

    #[test]
    fn test_visible_thread_marks_read() {
        let surface = Arc::new(RecordingSurface::new());
        let runner = runner(surface.clone());
        runner.set_visible_thread(Some(5));

        let outcome = runner.update(Some(5), false).unwrap();
        assert_eq!(outcome, UpdateOutcome::InThread { chimed: false });
        assert_eq!(runner.read_threads(), vec![5]);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_delivery_failed_uses_thread_slot() {
        let surface = Arc::new(RecordingSurface::new());
        let runner = runner(surface.clone());

        let outcome = runner.delivery_failed(7).unwrap();
        assert!(matches!(
            outcome,
            UpdateOutcome::Rendered { id: NotificationId(7), .. }
        ));
        assert!(runner.delivery_failed(42).is_err());
    }
}
