use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::RecipientResolver;
use crate::error::Result;
use crate::models::Recipient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Address book keyed by normalized address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Contact>", into = "HashMap<String, Contact>")]
pub struct AddressBook {
    contacts: HashMap<String, Contact>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a contact. The address is normalized first; unparseable
    /// addresses are stored verbatim.
    pub fn insert(&mut self, address: &str, contact: Contact) {
        let key = Recipient::parse(address)
            .map(|r| r.address)
            .unwrap_or_else(|_| address.to_string());
        self.contacts.insert(key, contact);
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

impl From<HashMap<String, Contact>> for AddressBook {
    fn from(contacts: HashMap<String, Contact>) -> Self {
        let mut book = Self::new();
        for (address, contact) in contacts {
            book.insert(&address, contact);
        }
        book
    }
}

impl From<AddressBook> for HashMap<String, Contact> {
    fn from(book: AddressBook) -> Self {
        book.contacts
    }
}

impl RecipientResolver for AddressBook {
    fn resolve(&self, address: &str) -> Result<Recipient> {
        let mut recipient = Recipient::parse(address)?;
        if let Some(contact) = self.contacts.get(&recipient.address) {
            recipient.name = contact.name.clone();
            recipient.contact_photo = contact.photo.clone();
        }
        Ok(recipient)
    }
}
