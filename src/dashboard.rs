//! Top-level view state.
//!
//! [`Dashboard`] owns the full record set, the load state, the query state
//! and the detail selection. Every view is derived from those through the
//! list pipeline; nothing is updated incrementally.

use crate::error::Result;
use crate::pagination::{page_controls, PageControl};
use crate::pipeline::{self, PageResult};
use crate::query::{QueryState, SortKey, SortOrder};
use crate::record::{Paper, PaperId};
use crate::selection::Selection;
use crate::source::RecordSource;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// User-visible message; the list is replaced by an error view with a retry action
    Failed(String),
}

#[derive(Debug, Default)]
pub struct Dashboard {
    records: Vec<Paper>,
    load_state: LoadState,
    query: QueryState,
    selection: Selection,
}

impl Dashboard {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: QueryState::with_page_size(page_size),
            ..Self::default()
        }
    }

    /// Fetch the record set from `source`, replacing the current one on success.
    ///
    /// On failure the error is also recorded as [`LoadState::Failed`] so the
    /// view can show it; the previous records are kept but not shown.
    pub async fn load<S: RecordSource>(&mut self, source: &S) -> Result<usize> {
        self.load_state = LoadState::Loading;
        info!(source = %source.describe(), "Loading records");

        match source.fetch_records().await {
            Ok(records) => {
                let count = records.len();
                self.replace_records(records);
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Loading records failed");
                self.load_state = LoadState::Failed(e.user_message());
                Err(e)
            }
        }
    }

    /// Manual refresh; same as the initial load.
    pub async fn refresh<S: RecordSource>(&mut self, source: &S) -> Result<usize> {
        self.load(source).await
    }

    /// The "try again" action of the error view.
    pub async fn retry<S: RecordSource>(&mut self, source: &S) -> Result<usize> {
        self.load(source).await
    }

    /// Install a new record set directly.
    pub fn replace_records(&mut self, records: Vec<Paper>) {
        self.records = records;
        self.load_state = LoadState::Loaded;

        if let Some(active) = self.selection.active() {
            if !self.records.iter().any(|p| &p.id == active) {
                self.selection.clear();
            }
        }
        let total = self.total_pages();
        self.query.clamp_page(total);
    }

    pub fn records(&self) -> &[Paper] {
        &self.records
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load_state {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Apply a settled (debounced) search text.
    pub fn apply_query(&mut self, text: impl Into<String>) -> bool {
        self.query.set_query(text)
    }

    pub fn set_sort_key(&mut self, key: SortKey) -> bool {
        self.query.set_sort_key(key)
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        self.query.set_sort_order(order)
    }

    pub fn toggle_sort_order(&mut self) {
        self.query.toggle_sort_order();
    }

    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        self.query.set_page_size(page_size)
    }

    pub fn go_to_page(&mut self, page: usize) {
        let total = self.total_pages();
        self.query.go_to_page(page, total);
    }

    pub fn next_page(&mut self) {
        let total = self.total_pages();
        self.query.next_page(total);
    }

    pub fn prev_page(&mut self) {
        let total = self.total_pages();
        self.query.prev_page(total);
    }

    /// Pages for the current filter and page size.
    pub fn total_pages(&self) -> usize {
        let matched = pipeline::filter(&self.records, &self.query.query).len();
        pipeline::total_pages(matched, self.query.page_size)
    }

    /// The visible page.
    pub fn view(&self) -> PageResult<'_> {
        pipeline::run_state(&self.records, &self.query)
    }

    pub fn controls(&self) -> Vec<PageControl> {
        page_controls(self.query.page, self.total_pages())
    }

    /// Full filtered/sorted set, as consumed by the exports.
    pub fn export_set(&self) -> Vec<&Paper> {
        pipeline::filter_sort(
            &self.records,
            &self.query.query,
            self.query.sort_key,
            self.query.sort_order,
        )
    }

    /// Find a record by user-supplied id.
    pub fn find(&self, input: &str) -> Option<&Paper> {
        self.records.iter().find(|p| p.id.matches(input))
    }

    /// Make `id` the active record. Returns false if no such record exists.
    pub fn select(&mut self, id: &PaperId) -> bool {
        if self.records.iter().any(|p| &p.id == id) {
            self.selection.select(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> Option<&Paper> {
        let active = self.selection.active()?;
        self.records.iter().find(|p| &p.id == active)
    }
}
