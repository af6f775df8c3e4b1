//! Per-day dish selections and the index of days that have one.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::date_key::DateKey;
use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Store key listing every date with a stored selection.
pub const DATES_KEY: &str = "dates";

/// Outcome of [`Selection::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
}

/// The ordered dishes chosen for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    date: DateKey,
    dishes: Vec<String>,
}

impl Selection {
    pub fn new(date: DateKey, dishes: Vec<String>) -> Self {
        Self { date, dishes }
    }

    /// Loads the selection stored for `date`, empty if none.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, date: DateKey) -> Result<Self, StoreError> {
        let dishes = store.get(&date.to_string())?;
        Ok(Self { date, dishes })
    }

    pub fn date(&self) -> DateKey {
        self.date
    }

    pub fn dishes(&self) -> &[String] {
        &self.dishes
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dishes.iter().any(|d| d == name)
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    /// Removes `name` if selected, otherwise appends it, then persists.
    pub fn toggle<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> Result<Toggle, StoreError> {
        let outcome = match self.dishes.iter().position(|d| d == name) {
            Some(index) => {
                self.dishes.remove(index);
                Toggle::Deselected
            }
            None => {
                self.dishes.push(name.to_string());
                Toggle::Selected
            }
        };
        self.save(store)?;
        Ok(outcome)
    }

    /// Appends every name not already selected, keeping existing order, then
    /// persists. Returns the names that were appended; nothing is written when
    /// there are none.
    pub fn merge<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        names: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let mut added = Vec::new();
        for name in names {
            if name.is_empty() || self.contains(name) {
                continue;
            }
            self.dishes.push(name.clone());
            added.push(name.clone());
        }
        if !added.is_empty() {
            self.save(store)?;
        }
        Ok(added)
    }

    /// Drops every name in `names` from the in-memory selection.
    ///
    /// Returns true if anything was removed. Does not persist.
    pub fn purge(&mut self, names: &BTreeSet<String>) -> bool {
        let before = self.dishes.len();
        self.dishes.retain(|d| !names.contains(d));
        self.dishes.len() != before
    }

    /// Writes the selection and records its date in the [`DateIndex`].
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set(&self.date.to_string(), &self.dishes)?;
        DateIndex::record(store, self.date)?;
        Ok(())
    }
}

/// Every date that has a stored selection, in the order first used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DateIndex {
    dates: Vec<DateKey>,
}

impl DateIndex {
    /// Loads the index, skipping entries that are not `YYYY-MM-DD`.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let mut dates = Vec::new();
        for raw in store.get(DATES_KEY)? {
            match raw.parse::<DateKey>() {
                Ok(key) if !dates.contains(&key) => dates.push(key),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping date index entry: {}", e),
            }
        }
        Ok(Self { dates })
    }

    pub fn dates(&self) -> &[DateKey] {
        &self.dates
    }

    pub fn contains(&self, date: DateKey) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Appends `date` to the stored index if it is not there yet.
    ///
    /// Entries that do not parse are kept as stored. Returns true if the
    /// index was written.
    pub fn record<S: KeyValueStore + ?Sized>(
        store: &mut S,
        date: DateKey,
    ) -> Result<bool, StoreError> {
        let mut raw = store.get(DATES_KEY)?;
        if raw.iter().any(|entry| entry.parse::<DateKey>().ok() == Some(date)) {
            return Ok(false);
        }
        raw.push(date.to_string());
        store.set(DATES_KEY, &raw)?;
        Ok(true)
    }
}
