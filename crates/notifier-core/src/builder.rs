//! Notification state builder
//!
//! One pass over both sources: unread store records first, then pending
//! pushes. Records are appended in source order; nothing is merged or
//! deduplicated across the two sources.

use tracing::{debug, warn};

use crate::constants::UNRESOLVED_THREAD;
use crate::error::Result;
use crate::models::{
    encrypted_placeholder, normalize_body, NotificationItem, NotificationState, Recipient,
    Recipients,
};
use crate::sources::{
    ClosingReader, PendingRecord, PersistedRecord, RecipientResolver, RecordReader,
    ThreadDirectory,
};

pub struct NotificationStateBuilder<'a> {
    threads: &'a dyn ThreadDirectory,
    resolver: &'a dyn RecipientResolver,
}

impl<'a> NotificationStateBuilder<'a> {
    pub fn new(threads: &'a dyn ThreadDirectory, resolver: &'a dyn RecipientResolver) -> Self {
        Self { threads, resolver }
    }

    /// Read both sources into a new state.
    ///
    /// While `locked`, pending pushes are not appended at all. Both readers
    /// are closed exactly once whether this returns `Ok`, returns `Err`, or
    /// unwinds. A read error aborts the whole pass.
    pub fn build(
        &self,
        unread: Box<dyn RecordReader<PersistedRecord>>,
        pending: Box<dyn RecordReader<PendingRecord>>,
        locked: bool,
    ) -> Result<NotificationState> {
        let mut unread = ClosingReader::new(unread);
        let mut pending = ClosingReader::new(pending);
        let mut state = NotificationState::new();

        while let Some(record) = unread.next_record()? {
            state.add_notification(self.persisted_item(record));
        }
        unread.finish();

        if locked {
            debug!("Decryption unavailable, skipping pending pushes");
        } else {
            while let Some(record) = pending.next_record()? {
                state.add_notification(self.pending_item(record));
            }
        }
        pending.finish();

        debug!(
            "Built notification state: {} messages in {} threads",
            state.message_count(),
            state.thread_count()
        );
        Ok(state)
    }

    fn persisted_item(&self, record: PersistedRecord) -> NotificationItem {
        let thread_recipients = if record.thread_id != UNRESOLVED_THREAD {
            self.threads.recipients_for_thread(record.thread_id)
        } else {
            None
        };

        NotificationItem::new(
            record.individual_recipient,
            record.recipients,
            thread_recipients,
            record.thread_id,
            normalize_body(&record.body),
            record.image,
        )
    }

    fn pending_item(&self, record: PendingRecord) -> NotificationItem {
        let sender = match self.resolver.resolve(&record.source) {
            Ok(sender) => Some(sender),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        // Only addresses that parsed take part in thread lookup
        let mut addressing = Recipients::new(Vec::new());
        if let Some(sender) = &sender {
            addressing.push(sender.clone());
        }
        for destination in &record.destinations {
            match self.resolver.resolve(destination) {
                Ok(member) => addressing.push(member),
                Err(e) => warn!("Dropping group member: {}", e),
            }
        }

        let sender = sender.unwrap_or_else(Recipient::unknown);
        let (recipients, thread_id) = if addressing.is_empty() {
            (Recipients::single(sender.clone()), UNRESOLVED_THREAD)
        } else {
            let thread_id = self.threads.thread_id_for(&addressing);
            (addressing, thread_id)
        };

        NotificationItem::new(
            sender,
            recipients,
            None,
            thread_id,
            encrypted_placeholder(),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DECRYPTING_PLACEHOLDER, ENCRYPTED_MESSAGE};
    use crate::models::TextStyle;
    use crate::sources::{AddressBook, MemoryReader, ThreadTable};

    fn persisted(address: &str, thread_id: i64, body: &str) -> PersistedRecord {
        let sender = Recipient::new(address);
        PersistedRecord {
            individual_recipient: sender.clone(),
            recipients: sender.into(),
            thread_id,
            body: body.to_string(),
            image: None,
        }
    }

    fn pending(source: &str) -> PendingRecord {
        PendingRecord {
            source: source.to_string(),
            destinations: vec![],
        }
    }

    struct Fixture {
        threads: ThreadTable,
        book: AddressBook,
    }

    impl Fixture {
        fn new() -> Self {
            let threads = ThreadTable::new();
            threads.insert(5, Recipient::new("+15550105").into());
            threads.insert(9, Recipient::new("+15550109").into());
            Self {
                threads,
                book: AddressBook::new(),
            }
        }

        fn build(
            &self,
            unread: MemoryReader<PersistedRecord>,
            pending: MemoryReader<PendingRecord>,
            locked: bool,
        ) -> Result<NotificationState> {
            NotificationStateBuilder::new(&self.threads, &self.book).build(
                Box::new(unread),
                Box::new(pending),
                locked,
            )
        }
    }

    #[test]
    fn test_count_is_sum_of_both_sources() {
        let fx = Fixture::new();
        let state = fx
            .build(
                MemoryReader::new(vec![
                    persisted("+15550105", 5, "one"),
                    persisted("+15550105", 5, "two"),
                ]),
                MemoryReader::new(vec![pending("+15550109"), pending("+15550105")]),
                false,
            )
            .unwrap();

        assert_eq!(state.message_count(), 4);
        let bodies: Vec<String> = state
            .notifications()
            .iter()
            .map(|n| n.body.to_plain())
            .collect();
        assert_eq!(bodies, vec!["one", "two", ENCRYPTED_MESSAGE, ENCRYPTED_MESSAGE]);
        assert_eq!(state.thread_ids(), vec![5, 9]);
    }

    #[test]
    fn test_locked_skips_pending_but_closes_reader() {
        let fx = Fixture::new();
        let pending_reader = MemoryReader::new(vec![pending("+15550109")]);
        let pending_closes = pending_reader.close_counter();

        let state = fx
            .build(
                MemoryReader::new(vec![persisted("+15550105", 5, "hi")]),
                pending_reader,
                true,
            )
            .unwrap();

        assert_eq!(state.message_count(), 1);
        assert_eq!(state.notifications()[0].thread_id, 5);
        assert_eq!(pending_closes.get(), 1);
    }

    #[test]
    fn test_decrypting_body_becomes_italic_placeholder() {
        let fx = Fixture::new();
        let state = fx
            .build(
                MemoryReader::new(vec![persisted("+15550105", 5, DECRYPTING_PLACEHOLDER)]),
                MemoryReader::new(vec![]),
                false,
            )
            .unwrap();

        let body = &state.notifications()[0].body;
        assert_eq!(body.to_plain(), ENCRYPTED_MESSAGE);
        assert!(body.is_entirely(TextStyle::Italic));
    }

    #[test]
    fn test_persisted_thread_recipients_lookup() {
        let fx = Fixture::new();
        let state = fx
            .build(
                MemoryReader::new(vec![
                    persisted("+15550105", 5, "linked"),
                    persisted("+15550177", UNRESOLVED_THREAD, "orphan"),
                ]),
                MemoryReader::new(vec![]),
                false,
            )
            .unwrap();

        let items = state.notifications();
        assert!(items[0].thread_recipients.is_some());
        assert!(items[1].thread_recipients.is_none());
        assert_eq!(state.message_count(), 2);
        assert_eq!(state.thread_count(), 1);
    }

    #[test]
    fn test_malformed_sender_degrades_to_unknown() {
        let fx = Fixture::new();
        let state = fx
            .build(
                MemoryReader::new(vec![]),
                MemoryReader::new(vec![pending("not-a-number!"), pending("+15550109")]),
                false,
            )
            .unwrap();

        let items = state.notifications();
        assert_eq!(items.len(), 2);
        assert!(items[0].individual_recipient.is_unknown());
        assert_eq!(items[0].thread_id, UNRESOLVED_THREAD);
        assert_eq!(items[1].thread_id, 9);
    }

    #[test]
    fn test_malformed_sender_never_joins_thread_members() {
        let fx = Fixture::new();
        let record = PendingRecord {
            source: "garbage!".to_string(),
            destinations: vec!["+15550102".to_string()],
        };
        let state = fx
            .build(
                MemoryReader::new(vec![]),
                MemoryReader::new(vec![record.clone(), record]),
                false,
            )
            .unwrap();

        let items = state.notifications();
        assert!(items[0].individual_recipient.is_unknown());
        assert!(!items[0].recipients.iter().any(Recipient::is_unknown));
        assert_eq!(items[0].thread_id, 10);
        assert_eq!(items[1].thread_id, 10);
        assert!(fx
            .threads
            .entries()
            .iter()
            .all(|t| !t.recipients.iter().any(Recipient::is_unknown)));
        assert_eq!(fx.threads.entries().len(), 3);
    }

    #[test]
    fn test_pending_group_message_resolves_group_thread() {
        let fx = Fixture::new();
        let state = fx
            .build(
                MemoryReader::new(vec![]),
                MemoryReader::new(vec![PendingRecord {
                    source: "+15550101".to_string(),
                    destinations: vec!["+15550102".to_string(), "??".to_string()],
                }]),
                false,
            )
            .unwrap();

        let item = &state.notifications()[0];
        assert_eq!(item.recipients.len(), 2);
        assert_eq!(item.thread_id, 10);
        assert!(fx.threads.recipients_for_thread(10).is_some());
    }

    #[test]
    fn test_read_error_closes_both_readers() {
        let fx = Fixture::new();
        let unread = MemoryReader::new(vec![
            persisted("+15550105", 5, "a"),
            persisted("+15550105", 5, "b"),
        ])
        .fail_after(1, "database disk image is malformed");
        let pending_reader = MemoryReader::new(vec![pending("+15550109")]);
        let unread_closes = unread.close_counter();
        let pending_closes = pending_reader.close_counter();

        let err = fx.build(unread, pending_reader, false).unwrap_err();

        assert!(err.is_cycle_fatal());
        assert_eq!(unread_closes.get(), 1);
        assert_eq!(pending_closes.get(), 1);
    }

    #[test]
    fn test_pending_read_error_closes_both_readers() {
        let fx = Fixture::new();
        let unread = MemoryReader::new(vec![persisted("+15550105", 5, "a")]);
        let pending_reader = MemoryReader::new(vec![pending("+15550109"), pending("+15550105")])
            .fail_after(1, "push queue truncated");
        let unread_closes = unread.close_counter();
        let pending_closes = pending_reader.close_counter();

        let err = fx.build(unread, pending_reader, false).unwrap_err();

        assert!(err.is_cycle_fatal());
        assert_eq!(unread_closes.get(), 1);
        assert_eq!(pending_closes.get(), 1);
    }

    #[test]
    fn test_success_closes_each_reader_once() {
        let fx = Fixture::new();
        let unread = MemoryReader::new(vec![persisted("+15550105", 5, "a")]);
        let pending_reader = MemoryReader::new(vec![pending("+15550109")]);
        let unread_closes = unread.close_counter();
        let pending_closes = pending_reader.close_counter();

        fx.build(unread, pending_reader, false).unwrap();

        assert_eq!(unread_closes.get(), 1);
        assert_eq!(pending_closes.get(), 1);
    }
}
