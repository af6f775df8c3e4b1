//! Display-side helpers: search, sort and staged pagination.
//!
//! Nothing here touches the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "asc"),
            SortOrder::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid options: asc, desc",
                s
            )),
        }
    }
}

/// Search text and ordering applied to the catalog before display.
#[derive(Debug, Clone, Default)]
pub struct DishQuery {
    /// Substring to match; blank matches everything.
    pub search: String,
    /// `None` keeps catalog order.
    pub order: Option<SortOrder>,
}

impl DishQuery {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            order: None,
        }
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns true if `name` contains the search text, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        let needle = self.search.trim();
        needle.is_empty() || name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Filters then sorts `dishes`.
    pub fn apply<'a>(&self, dishes: &'a [String]) -> Vec<&'a str> {
        let mut shown: Vec<&str> = dishes
            .iter()
            .map(String::as_str)
            .filter(|name| self.matches(name))
            .collect();

        match self.order {
            Some(SortOrder::Ascending) => shown.sort_unstable(),
            Some(SortOrder::Descending) => shown.sort_unstable_by(|a, b| b.cmp(a)),
            None => {}
        }
        shown
    }
}

/// Reveals a list in fixed increments.
///
/// A "load more" is two steps: [`request_more`](Pager::request_more) arms a
/// single pending reveal, [`finish_loading`](Pager::finish_loading) applies
/// it. Extra requests or completions while idle are no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    visible: usize,
    increment: usize,
    loading: bool,
}

impl Pager {
    pub fn new(initial: usize, increment: usize) -> Self {
        Self {
            visible: initial,
            increment: increment.max(1),
            loading: false,
        }
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible < total
    }

    /// The revealed prefix of `items`.
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible.min(items.len())]
    }

    /// Arms a reveal. Returns false if one is pending or nothing is hidden.
    pub fn request_more(&mut self, total: usize) -> bool {
        if self.loading || !self.has_more(total) {
            return false;
        }
        self.loading = true;
        true
    }

    /// Applies the pending reveal. Returns false if none was pending.
    pub fn finish_loading(&mut self) -> bool {
        if !self.loading {
            return false;
        }
        self.loading = false;
        self.visible = self.visible.saturating_add(self.increment);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_query_keeps_catalog_order() {
        let dishes = strings(&["b", "a", "c"]);
        assert_eq!(DishQuery::default().apply(&dishes), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_search_is_substring() {
        let dishes = strings(&["宫保鸡丁", "麻婆豆腐", "口水鸡", "Chicken Curry"]);

        assert_eq!(DishQuery::new("鸡").apply(&dishes), vec!["宫保鸡丁", "口水鸡"]);
        assert_eq!(DishQuery::new("chicken").apply(&dishes), vec!["Chicken Curry"]);
        assert_eq!(DishQuery::new("   ").apply(&dishes).len(), 4);
        assert!(DishQuery::new("鱼").apply(&dishes).is_empty());
    }

    #[test]
    fn test_sort_orders() {
        let dishes = strings(&["pork", "apple pie", "noodles"]);

        let asc = DishQuery::default().with_order(SortOrder::Ascending);
        assert_eq!(asc.apply(&dishes), vec!["apple pie", "noodles", "pork"]);

        let desc = DishQuery::default().with_order(SortOrder::Descending);
        assert_eq!(desc.apply(&dishes), vec!["pork", "noodles", "apple pie"]);
    }

    #[test]
    fn test_sort_applies_after_filter() {
        let dishes = strings(&["beef noodles", "apple", "chicken noodles"]);
        let query = DishQuery::new("noodles").with_order(SortOrder::Descending);
        assert_eq!(query.apply(&dishes), vec!["chicken noodles", "beef noodles"]);
    }

    #[test]
    fn test_sort_order_parse_and_toggle() {
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Ascending);
        assert!("random".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
        assert_eq!(SortOrder::Descending.toggled().to_string(), "asc");
    }

    #[test]
    fn test_pager_reveals_in_increments() {
        let items: Vec<u32> = (0..25).collect();
        let mut pager = Pager::new(10, 10);
        assert_eq!(pager.page(&items).len(), 10);

        assert!(pager.request_more(items.len()));
        assert_eq!(pager.page(&items).len(), 10);
        assert!(pager.finish_loading());
        assert_eq!(pager.page(&items).len(), 20);

        assert!(pager.request_more(items.len()));
        assert!(pager.finish_loading());
        assert_eq!(pager.page(&items).len(), 25);
        assert!(!pager.has_more(items.len()));
        assert!(!pager.request_more(items.len()));
    }

    #[test]
    fn test_pager_single_shot() {
        let mut pager = Pager::new(5, 5);

        assert!(pager.request_more(100));
        assert!(!pager.request_more(100));
        assert!(pager.is_loading());

        assert!(pager.finish_loading());
        assert!(!pager.finish_loading());
        assert_eq!(pager.visible(), 10);
    }

    #[test]
    fn test_pager_zero_increment_still_advances() {
        let mut pager = Pager::new(0, 0);
        assert!(pager.request_more(3));
        pager.finish_loading();
        assert_eq!(pager.visible(), 1);
    }
}
