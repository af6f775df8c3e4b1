//! The global list of known dish names.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::{PlannerError, StoreError};
use crate::selection::{DateIndex, Selection};
use crate::store::KeyValueStore;

/// Store key holding the catalog.
pub const DISHES_KEY: &str = "dishes";

/// Dish names in insertion order, without duplicates.
///
/// Names compare exactly: no case folding, no whitespace trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    dishes: Vec<String>,
}

impl Catalog {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let dishes = store.get(DISHES_KEY)?;
        tracing::debug!("Loaded {} dish(es)", dishes.len());
        Ok(Self { dishes })
    }

    pub fn dishes(&self) -> &[String] {
        &self.dishes
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dishes.iter().any(|d| d == name)
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    /// Appends `name` and persists.
    ///
    /// Blank and already-known names are rejected without touching the store.
    pub fn add<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> Result<(), PlannerError> {
        if name.trim().is_empty() {
            return Err(PlannerError::EmptyDishName);
        }
        if self.contains(name) {
            return Err(PlannerError::DuplicateDish(name.to_string()));
        }

        self.dishes.push(name.to_string());
        if let Err(e) = self.save(store) {
            self.dishes.pop();
            return Err(e.into());
        }
        Ok(())
    }

    /// Appends every unknown, non-empty name and persists once.
    ///
    /// Returns the names that were appended. Nothing is written when every
    /// name is already known.
    pub fn merge<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        names: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let before = self.dishes.len();
        let mut added = Vec::new();
        for name in names {
            if name.is_empty() || self.contains(name) {
                continue;
            }
            self.dishes.push(name.clone());
            added.push(name.clone());
        }
        if added.is_empty() {
            return Ok(added);
        }

        if let Err(e) = self.save(store) {
            self.dishes.truncate(before);
            return Err(e);
        }
        Ok(added)
    }

    /// Removes `names` from the catalog and from every stored selection.
    ///
    /// Returns the names that were in the catalog. Selections held in memory
    /// by the caller are not touched; see [`Selection::purge`].
    pub fn remove<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        names: &BTreeSet<String>,
    ) -> Result<Vec<String>, StoreError> {
        let removed: Vec<String> = self
            .dishes
            .iter()
            .filter(|d| names.contains(*d))
            .cloned()
            .collect();
        if !removed.is_empty() {
            let previous = self.dishes.clone();
            self.dishes.retain(|d| !names.contains(d));
            if let Err(e) = self.save(store) {
                self.dishes = previous;
                return Err(e);
            }
        }

        let index = DateIndex::load(&*store)?;
        for date in index.dates() {
            let mut selection = Selection::load(&*store, *date)?;
            if selection.purge(names) {
                tracing::debug!("Purged deleted dishes from {}", date);
                selection.save(store)?;
            }
        }

        Ok(removed)
    }

    fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set(DISHES_KEY, &self.dishes)
    }
}
