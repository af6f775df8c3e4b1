//! Persisted mapping from string keys to ordered string lists.
//!
//! Every piece of CaseOrder state is a list of strings under a key:
//! - `dishes`: the dish catalog
//! - `dates`: every date that has a stored selection
//! - `YYYY-MM-DD`: the dishes selected for that day

mod document;
mod memory;

pub use document::{DocumentStore, DOCUMENT_FILENAME};
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Synchronous key-value storage of ordered string lists.
///
/// Writes are last-writer-wins. A missing key reads as an empty list.
pub trait KeyValueStore {
    /// Returns the list stored under `key`, or an empty list.
    fn get(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Replaces the list stored under `key`.
    fn set(&mut self, key: &str, values: &[String]) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Vec<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, values: &[String]) -> Result<(), StoreError> {
        (**self).set(key, values)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Vec<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, values: &[String]) -> Result<(), StoreError> {
        (**self).set(key, values)
    }
}
