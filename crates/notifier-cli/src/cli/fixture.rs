use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use notifier_core::silence::MuteTable;
use notifier_core::sources::threads::ThreadEntry;
use notifier_core::sources::{AddressBook, MemorySources, PendingRecord, PersistedRecord, ThreadTable};
use serde::{Deserialize, Serialize};

/// Snapshot of the message store loaded from a JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub threads: Vec<ThreadEntry>,
    pub contacts: AddressBook,
    /// Recipient address -> silenced-until (Unix ms)
    pub muted: HashMap<String, i64>,
    pub unread: Vec<PersistedRecord>,
    pub pending: Vec<PendingRecord>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse fixture file: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid fixture JSON")
    }

    pub fn into_parts(self) -> (MemorySources, ThreadTable, AddressBook, MuteTable) {
        (
            MemorySources::new(self.unread, self.pending),
            ThreadTable::from_entries(self.threads),
            self.contacts,
            MuteTable::from(self.muted),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notifier_core::sources::{RecipientResolver, ThreadDirectory};

    const FIXTURE: &str = r#"{
        "threads": [
            {"id": 5, "recipients": [{"address": "+15550105", "name": "Alice"}]}
        ],
        "contacts": {"+15550109": {"name": "Carol"}},
        "muted": {"+15550105": 1700000000000},
        "unread": [
            {
                "individual_recipient": {"address": "+15550105", "name": "Alice"},
                "recipients": [{"address": "+15550105", "name": "Alice"}],
                "thread_id": 5,
                "body": "hello"
            }
        ],
        "pending": [{"source": "+15550109"}]
    }"#;

    #[test]
    fn test_parse_full_fixture() {
        let fixture = Fixture::from_json(FIXTURE).unwrap();
        assert_eq!(fixture.threads.len(), 1);
        assert_eq!(fixture.unread.len(), 1);
        assert_eq!(fixture.pending.len(), 1);
        assert_eq!(fixture.muted.get("+15550105"), Some(&1_700_000_000_000));

        let (_, threads, contacts, mutes) = fixture.into_parts();
        assert!(threads.recipients_for_thread(5).is_some());
        assert_eq!(
            contacts.resolve("+15550109").unwrap().name.as_deref(),
            Some("Carol")
        );
        assert_eq!(mutes.muted_until("+15550105"), Some(1_700_000_000_000));
    }

    #[test]
    fn test_empty_fixture() {
        let fixture = Fixture::from_json("{}").unwrap();
        assert!(fixture.unread.is_empty());
        assert!(fixture.pending.is_empty());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[").unwrap();
        let err = Fixture::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
