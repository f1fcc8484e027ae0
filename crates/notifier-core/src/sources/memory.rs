use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{MessageSources, PendingRecord, PersistedRecord, RecordReader};
use crate::error::{NotifierError, Result};

/// Shared count of `close()` calls, readable after the reader is gone.
#[derive(Debug, Clone, Default)]
pub struct CloseCounter(Arc<AtomicUsize>);

impl CloseCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reader over an in-memory list. Can be told to fail part-way through.
pub struct MemoryReader<R> {
    records: VecDeque<R>,
    fail_after: Option<(usize, String)>,
    read: usize,
    closes: CloseCounter,
}

impl<R> MemoryReader<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: records.into(),
            fail_after: None,
            read: 0,
            closes: CloseCounter::default(),
        }
    }

    /// Return an I/O-style error once `count` records have been read.
    pub fn fail_after(mut self, count: usize, message: impl Into<String>) -> Self {
        self.fail_after = Some((count, message.into()));
        self
    }

    pub fn with_close_counter(mut self, closes: CloseCounter) -> Self {
        self.closes = closes;
        self
    }

    pub fn close_counter(&self) -> CloseCounter {
        self.closes.clone()
    }
}

impl<R: Send> RecordReader<R> for MemoryReader<R> {
    fn next_record(&mut self) -> Result<Option<R>> {
        if let Some((count, message)) = &self.fail_after {
            if self.read >= *count {
                return Err(NotifierError::source_read("memory reader", message));
            }
        }
        let next = self.records.pop_front();
        if next.is_some() {
            self.read += 1;
        }
        Ok(next)
    }

    fn close(&mut self) {
        self.records.clear();
        self.closes.bump();
    }
}

/// Both sources held in memory. Used by the CLI fixtures and by tests.
#[derive(Default)]
pub struct MemorySources {
    unread: Mutex<Vec<PersistedRecord>>,
    pending: Mutex<Vec<PendingRecord>>,
    unread_failure: Mutex<Option<(usize, String)>>,
    pending_failure: Mutex<Option<(usize, String)>>,
    unread_closes: CloseCounter,
    pending_closes: CloseCounter,
}

impl MemorySources {
    pub fn new(unread: Vec<PersistedRecord>, pending: Vec<PendingRecord>) -> Self {
        Self {
            unread: Mutex::new(unread),
            pending: Mutex::new(pending),
            ..Default::default()
        }
    }

    pub fn push_unread(&self, record: PersistedRecord) {
        self.unread.lock().push(record);
    }

    pub fn push_pending(&self, record: PendingRecord) {
        self.pending.lock().push(record);
    }

    /// Drop unread records for a thread, as the store does once it is read.
    pub fn mark_thread_read(&self, thread_id: i64) {
        self.unread.lock().retain(|r| r.thread_id != thread_id);
    }

    /// Make the next unread scans fail after `count` records.
    pub fn fail_unread_after(&self, count: usize, message: impl Into<String>) {
        *self.unread_failure.lock() = Some((count, message.into()));
    }

    /// Make the next pending scans fail after `count` records.
    pub fn fail_pending_after(&self, count: usize, message: impl Into<String>) {
        *self.pending_failure.lock() = Some((count, message.into()));
    }

    pub fn unread_closes(&self) -> usize {
        self.unread_closes.get()
    }

    pub fn pending_closes(&self) -> usize {
        self.pending_closes.get()
    }
}

impl MessageSources for MemorySources {
    fn open_unread(&self) -> Result<Box<dyn RecordReader<PersistedRecord>>> {
        let mut reader = MemoryReader::new(self.unread.lock().clone())
            .with_close_counter(self.unread_closes.clone());
        if let Some((count, message)) = self.unread_failure.lock().clone() {
            reader = reader.fail_after(count, message);
        }
        Ok(Box::new(reader))
    }

    fn open_pending(&self) -> Result<Box<dyn RecordReader<PendingRecord>>> {
        let mut reader = MemoryReader::new(self.pending.lock().clone())
            .with_close_counter(self.pending_closes.clone());
        if let Some((count, message)) = self.pending_failure.lock().clone() {
            reader = reader.fail_after(count, message);
        }
        Ok(Box::new(reader))
    }
}
