use super::item::NotificationItem;

/// The notifications gathered by one update cycle, in arrival order.
///
/// Built by a single pass of [`crate::builder::NotificationStateBuilder`] and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    notifications: Vec<NotificationItem>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_notification(&mut self, item: NotificationItem) {
        self.notifications.push(item);
    }

    pub fn notifications(&self) -> &[NotificationItem] {
        &self.notifications
    }

    pub fn first(&self) -> Option<&NotificationItem> {
        self.notifications.first()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.notifications.len()
    }

    /// Distinct resolved thread ids, in the order they first appear.
    pub fn thread_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = Vec::new();
        for item in &self.notifications {
            if item.has_resolved_thread() && !ids.contains(&item.thread_id) {
                ids.push(item.thread_id);
            }
        }
        ids
    }

    pub fn thread_count(&self) -> usize {
        self.thread_ids().len()
    }

    pub fn has_multiple_threads(&self) -> bool {
        self.thread_count() > 1
    }
}

impl FromIterator<NotificationItem> for NotificationState {
    fn from_iter<I: IntoIterator<Item = NotificationItem>>(iter: I) -> Self {
        Self {
            notifications: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UNRESOLVED_THREAD;
    use crate::models::{Recipient, StyledText};

    fn item(thread_id: i64) -> NotificationItem {
        let r = Recipient::new("+15550100");
        NotificationItem::new(
            r.clone(),
            r.into(),
            None,
            thread_id,
            StyledText::plain("hi"),
            None,
        )
    }

    #[test]
    fn test_empty_state() {
        let state = NotificationState::new();
        assert!(state.is_empty());
        assert_eq!(state.message_count(), 0);
        assert_eq!(state.thread_count(), 0);
        assert!(!state.has_multiple_threads());
    }

    #[test]
    fn test_thread_count_ignores_unresolved() {
        let state: NotificationState = [5, UNRESOLVED_THREAD, 5, UNRESOLVED_THREAD]
            .into_iter()
            .map(item)
            .collect();
        assert_eq!(state.message_count(), 4);
        assert_eq!(state.thread_ids(), vec![5]);
        assert!(!state.has_multiple_threads());
    }

    #[test]
    fn test_multiple_threads_in_first_seen_order() {
        let state: NotificationState = [9, 5, 9, 7].into_iter().map(item).collect();
        assert_eq!(state.thread_ids(), vec![9, 5, 7]);
        assert_eq!(state.thread_count(), 3);
        assert!(state.has_multiple_threads());
    }
}
