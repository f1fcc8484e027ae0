use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ThreadDirectory;
use crate::models::Recipients;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadEntry {
    pub id: i64,
    pub recipients: Recipients,
    #[serde(default)]
    pub read: bool,
}

/// In-memory thread directory keyed by thread id.
#[derive(Debug, Default)]
pub struct ThreadTable {
    threads: Mutex<BTreeMap<i64, ThreadEntry>>,
}

impl ThreadTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ThreadEntry>) -> Self {
        let threads = entries.into_iter().map(|e| (e.id, e)).collect();
        Self {
            threads: Mutex::new(threads),
        }
    }

    pub fn insert(&self, id: i64, recipients: Recipients) {
        self.threads.lock().insert(
            id,
            ThreadEntry {
                id,
                recipients,
                read: false,
            },
        );
    }

    pub fn is_read(&self, thread_id: i64) -> bool {
        self.threads
            .lock()
            .get(&thread_id)
            .map(|t| t.read)
            .unwrap_or(false)
    }

    pub fn entries(&self) -> Vec<ThreadEntry> {
        self.threads.lock().values().cloned().collect()
    }
}

impl ThreadDirectory for ThreadTable {
    fn recipients_for_thread(&self, thread_id: i64) -> Option<Recipients> {
        self.threads
            .lock()
            .get(&thread_id)
            .map(|t| t.recipients.clone())
    }

    fn thread_id_for(&self, recipients: &Recipients) -> i64 {
        let mut threads = self.threads.lock();
        if let Some(existing) = threads
            .values()
            .find(|t| t.recipients.same_members(recipients))
        {
            return existing.id;
        }

        let id = threads.keys().next_back().map(|last| last + 1).unwrap_or(1);
        threads.insert(
            id,
            ThreadEntry {
                id,
                recipients: recipients.clone(),
                read: false,
            },
        );
        tracing::debug!("Allocated thread {} for {}", id, recipients.to_short_string());
        id
    }

    fn set_read(&self, thread_id: i64) {
        if let Some(thread) = self.threads.lock().get_mut(&thread_id) {
            thread.read = true;
        }
    }
}
