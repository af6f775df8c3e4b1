use std::collections::BTreeMap;

use super::KeyValueStore;
use crate::error::StoreError;

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<String>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of `set` calls served so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.get(key).cloned().unwrap_or_default())
    }

    fn set(&mut self, key: &str, values: &[String]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), values.to_vec());
        self.writes += 1;
        Ok(())
    }
}
