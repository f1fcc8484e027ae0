//! Message sources
//!
//! The engine reads two independent sources each cycle: unread messages from
//! the persisted message store, and pushed messages still waiting to be
//! processed. Both are exposed as sequential readers that must be closed
//! exactly once.

pub mod contacts;
pub mod memory;
pub mod threads;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Recipient, Recipients};

pub use contacts::AddressBook;
pub use memory::{MemoryReader, MemorySources};
pub use threads::ThreadTable;

/// Unread message row from the persisted store, already decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub individual_recipient: Recipient,
    pub recipients: Recipients,
    pub thread_id: i64,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Pushed message that has not been processed into the store yet. Only the
/// addressing is readable; the content is still encrypted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRecord {
    /// Sender address as received, unvalidated
    pub source: String,
    /// Other conversation members for group messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<String>,
}

/// Sequential scan over one source.
pub trait RecordReader<R>: Send {
    /// Next record, or `None` at end of stream.
    fn next_record(&mut self) -> Result<Option<R>>;

    fn close(&mut self);
}

/// Opens fresh readers for an update cycle.
pub trait MessageSources: Send + Sync {
    fn open_unread(&self) -> Result<Box<dyn RecordReader<PersistedRecord>>>;

    fn open_pending(&self) -> Result<Box<dyn RecordReader<PendingRecord>>>;
}

/// Thread bookkeeping owned by the message store.
pub trait ThreadDirectory: Send + Sync {
    fn recipients_for_thread(&self, thread_id: i64) -> Option<Recipients>;

    /// Thread id for a participant set, allocating a new thread when none exists.
    fn thread_id_for(&self, recipients: &Recipients) -> i64;

    fn set_read(&self, thread_id: i64);
}

/// Turns raw addresses into recipients, enriched with contact details.
pub trait RecipientResolver: Send + Sync {
    fn resolve(&self, address: &str) -> Result<Recipient>;
}

/// Owns a reader and closes it exactly once: explicitly via [`finish`], or on
/// drop for early returns and unwinding.
///
/// [`finish`]: ClosingReader::finish
pub struct ClosingReader<R> {
    inner: Box<dyn RecordReader<R>>,
    closed: bool,
}

impl<R> ClosingReader<R> {
    pub fn new(inner: Box<dyn RecordReader<R>>) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<R>> {
        if self.closed {
            return Ok(None);
        }
        self.inner.next_record()
    }

    pub fn finish(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if !self.closed {
            self.closed = true;
            self.inner.close();
        }
    }
}

impl<R> Drop for ClosingReader<R> {
    fn drop(&mut self) {
        self.close_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_reader_closes_once_on_finish() {
        let reader = MemoryReader::new(vec![1, 2]);
        let closes = reader.close_counter();
        let mut guard = ClosingReader::new(Box::new(reader));
        assert_eq!(guard.next_record().unwrap(), Some(1));
        guard.finish();
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_closing_reader_closes_on_drop() {
        let reader = MemoryReader::<u8>::new(vec![]);
        let closes = reader.close_counter();
        {
            let _guard = ClosingReader::new(Box::new(reader));
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_pending_record_json() {
        let json = r#"{"source": "+15550100"}"#;
        let record: PendingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.source, "+15550100");
        assert!(record.destinations.is_empty());
    }

    #[test]
    fn test_persisted_record_json() {
        let json = r#"{
            "individual_recipient": {"address": "+15550100", "name": "Alice"},
            "recipients": [{"address": "+15550100", "name": "Alice"}],
            "thread_id": 5,
            "body": "hi"
        }"#;
        let record: PersistedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.thread_id, 5);
        assert_eq!(record.recipients.len(), 1);
        assert!(record.image.is_none());
    }
}
