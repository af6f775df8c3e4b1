//! CaseOrder Core Library
//!
//! Dish catalog, per-day selections and plain-text share payloads, persisted
//! through an injected [`KeyValueStore`].

pub mod catalog;
pub mod date_key;
pub mod error;
pub mod planner;
pub mod selection;
pub mod share;
pub mod store;
pub mod view;

pub use catalog::{Catalog, DISHES_KEY};
pub use date_key::DateKey;
pub use error::{DateKeyError, PlannerError, ShareError, StoreError};
pub use planner::{ImportSummary, Planner};
pub use selection::{DateIndex, Selection, Toggle, DATES_KEY};
pub use share::{SharePayload, HEADER_PREFIX, HEADER_SUFFIX, SHARE_DATE_FORMAT};
pub use store::{DocumentStore, KeyValueStore, MemoryStore};
pub use view::{DishQuery, Pager, SortOrder};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
