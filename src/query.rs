//! Query state driving the list pipeline.
//!
//! Any change to the effective query text, sort key, sort order or page size
//! resets the page to 1. The page itself is only moved by pagination
//! controls and is clamped into `[1, total_pages]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Impact,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "impact" => Ok(SortKey::Impact),
            "title" => Ok(SortKey::Title),
            other => Err(format!("unknown sort key '{}' (expected date, impact or title)", other)),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}' (expected asc or desc)", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Date => "date",
            SortKey::Impact => "impact",
            SortKey::Title => "title",
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// Search, sort and page state owned by the top-level view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    /// Effective (debounced) search text
    pub query: String,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
    pub page_size: usize,
    /// 1-based page number
    pub page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl QueryState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Returns true when the effective query changed (and the page was reset).
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.query {
            return false;
        }
        self.query = query;
        self.page = 1;
        true
    }

    pub fn set_sort_key(&mut self, key: SortKey) -> bool {
        if key == self.sort_key {
            return false;
        }
        self.sort_key = key;
        self.page = 1;
        true
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        if order == self.sort_order {
            return false;
        }
        self.sort_order = order;
        self.page = 1;
        true
    }

    pub fn toggle_sort_order(&mut self) {
        self.set_sort_order(self.sort_order.toggled());
    }

    /// Zero is rejected and leaves the state unchanged.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 || page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.page = 1;
        true
    }

    /// Move to `page`, clamped into `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.go_to_page(self.page.saturating_add(1), total_pages);
    }

    pub fn prev_page(&mut self, total_pages: usize) {
        self.go_to_page(self.page.saturating_sub(1), total_pages);
    }

    /// Re-clamp after the record set was replaced.
    pub fn clamp_page(&mut self, total_pages: usize) {
        self.go_to_page(self.page, total_pages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = QueryState::default();
        assert_eq!(state.query, "");
        assert_eq!(state.sort_key, SortKey::Date);
        assert_eq!(state.sort_order, SortOrder::Desc);
        assert_eq!(state.page_size, 10);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_changes_reset_page() {
        let mut state = QueryState::default();

        state.page = 4;
        assert!(state.set_query("cat"));
        assert_eq!(state.page, 1);

        state.page = 4;
        assert!(state.set_sort_key(SortKey::Impact));
        assert_eq!(state.page, 1);

        state.page = 4;
        state.toggle_sort_order();
        assert_eq!(state.sort_order, SortOrder::Asc);
        assert_eq!(state.page, 1);

        state.page = 4;
        assert!(state.set_page_size(25));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_unchanged_values_keep_page() {
        let mut state = QueryState::default();
        state.page = 3;
        assert!(!state.set_query(""));
        assert!(!state.set_sort_key(SortKey::Date));
        assert!(!state.set_sort_order(SortOrder::Desc));
        assert!(!state.set_page_size(10));
        assert!(!state.set_page_size(0));
        assert_eq!(state.page, 3);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut state = QueryState::default();
        state.go_to_page(9, 3);
        assert_eq!(state.page, 3);
        state.go_to_page(0, 3);
        assert_eq!(state.page, 1);
        state.go_to_page(5, 0);
        assert_eq!(state.page, 1);

        state.go_to_page(3, 3);
        state.next_page(3);
        assert_eq!(state.page, 3);
        state.prev_page(3);
        assert_eq!(state.page, 2);
    }

    #[test]
    fn test_parse_sort_options() {
        assert_eq!("Impact".parse::<SortKey>(), Ok(SortKey::Impact));
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert!("views".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Title.to_string(), "title");
    }
}
