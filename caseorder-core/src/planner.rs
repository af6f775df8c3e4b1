//! Application state: the store, the catalog and the active day's selection.

use std::collections::BTreeSet;

use crate::catalog::Catalog;
use crate::date_key::DateKey;
use crate::error::PlannerError;
use crate::selection::{DateIndex, Selection, Toggle};
use crate::share::SharePayload;
use crate::store::KeyValueStore;

/// What an import changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub date: DateKey,
    /// Names that were not in the catalog before.
    pub new_dishes: Vec<String>,
    /// Names that were not selected for `date` before.
    pub newly_selected: Vec<String>,
}

/// Owns the store and the state a view needs.
///
/// Every mutation is persisted before the method returns.
pub struct Planner<S: KeyValueStore> {
    store: S,
    catalog: Catalog,
    selection: Selection,
}

impl<S: KeyValueStore> Planner<S> {
    /// Loads the catalog and the selection for `date`.
    pub fn open(store: S, date: DateKey) -> Result<Self, PlannerError> {
        let catalog = Catalog::load(&store)?;
        let selection = Selection::load(&store, date)?;
        Ok(Self {
            store,
            catalog,
            selection,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_date(&self) -> DateKey {
        self.selection.date()
    }

    /// Makes `date` the active day, reloading its selection.
    pub fn select_date(&mut self, date: DateKey) -> Result<(), PlannerError> {
        self.selection = Selection::load(&self.store, date)?;
        Ok(())
    }

    pub fn dates(&self) -> Result<DateIndex, PlannerError> {
        Ok(DateIndex::load(&self.store)?)
    }

    pub fn add_dish(&mut self, name: &str) -> Result<(), PlannerError> {
        self.catalog.add(&mut self.store, name)?;
        tracing::debug!("Added dish '{}'", name);
        Ok(())
    }

    /// Deletes dishes from the catalog, every stored day and the active day.
    ///
    /// Returns the names that were in the catalog.
    pub fn remove_dishes<I, T>(&mut self, names: I) -> Result<Vec<String>, PlannerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let removed = self.catalog.remove(&mut self.store, &names)?;
        // The active day may not be indexed yet; drop the names in memory too.
        self.selection.purge(&names);
        Ok(removed)
    }

    /// Toggles a catalog dish for the active day.
    pub fn toggle(&mut self, name: &str) -> Result<Toggle, PlannerError> {
        if !self.catalog.contains(name) && !self.selection.contains(name) {
            return Err(PlannerError::DishNotFound(name.to_string()));
        }
        Ok(self.selection.toggle(&mut self.store, name)?)
    }

    /// The active day as a share payload.
    pub fn share(&self) -> SharePayload {
        SharePayload::from_selection(&self.selection)
    }

    /// Decodes `text` and imports it.
    ///
    /// Malformed text is rejected before anything is written.
    pub fn receive(&mut self, text: &str) -> Result<ImportSummary, PlannerError> {
        let payload = SharePayload::decode(text).inspect_err(|e| {
            tracing::warn!("Ignoring shared text: {}", e);
        })?;
        self.import(payload)
    }

    /// Merges a payload's dishes into the catalog and into its day's selection.
    pub fn import(&mut self, payload: SharePayload) -> Result<ImportSummary, PlannerError> {
        let date = payload.date_key();
        let new_dishes = self.catalog.merge(&mut self.store, &payload.dishes)?;

        let newly_selected = if date == self.selection.date() {
            self.selection.merge(&mut self.store, &payload.dishes)?
        } else {
            let mut selection = Selection::load(&self.store, date)?;
            selection.merge(&mut self.store, &payload.dishes)?
        };

        tracing::info!(
            "Imported {} dish(es) for {} ({} new to catalog)",
            payload.dishes.len(),
            date,
            new_dishes.len()
        );

        Ok(ImportSummary {
            date,
            new_dishes,
            newly_selected,
        })
    }
}
