use std::time::{Duration, Instant};

use cosmic_storage::Capture;
use tracing::{debug, error};

use crate::client::ApiClient;
use crate::debounce::Debouncer;
use crate::page::PageState;
use crate::query::{filter_captures, sort_captures, SortField, SortOrder};
use crate::render::{render_gallery, CardView};

/// Gallery view-model. Holds the full dataset fetched once per page load
/// and the subset currently on screen; every input change re-runs
/// filter then sort.
#[derive(Debug, Default)]
pub struct GalleryView {
    all: Vec<Capture>,
    filtered: Vec<Capture>,
    search: String,
    sort: SortField,
    order: SortOrder,
    debounce: Debouncer,
}

impl GalleryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the controls the page was rendered with.
    pub fn from_state(state: &PageState, debounce: Duration) -> Self {
        Self {
            search: state.search.clone(),
            sort: state.sort,
            order: state.order,
            debounce: Debouncer::new(debounce),
            ..Self::default()
        }
    }

    pub fn load(&mut self, captures: Vec<Capture>) {
        self.all = captures;
        self.refresh();
    }

    /// Fetches the dataset. On failure the view keeps what it had (empty on
    /// first load); there is no retry.
    pub async fn fetch(&mut self, client: &ApiClient) -> bool {
        match client.fetch_captures().await {
            Ok(captures) => {
                debug!(count = captures.len(), "fetched captures");
                self.load(captures);
                true
            }
            Err(err) => {
                error!("error fetching captures: {err:#}");
                false
            }
        }
    }

    /// Records typed input; the filter runs once the debounce elapses.
    pub fn set_search(&mut self, term: impl Into<String>, now: Instant) {
        self.search = term.into();
        self.debounce.trigger(now);
    }

    /// Applies a pending search if its debounce has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.debounce.fire(now) {
            self.refresh();
            true
        } else {
            false
        }
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Form submit: filter right away.
    pub fn submit_search(&mut self) {
        self.debounce.cancel();
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortField) {
        self.sort = sort;
        self.refresh();
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
        self.refresh();
    }

    pub fn refresh(&mut self) {
        let mut filtered = filter_captures(&self.all, &self.search);
        sort_captures(&mut filtered, self.sort, self.order);
        self.filtered = filtered;
    }

    pub fn all(&self) -> &[Capture] {
        &self.all
    }

    pub fn visible(&self) -> &[Capture] {
        &self.filtered
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortField {
        self.sort
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn render(&self) -> String {
        render_gallery(&self.filtered)
    }

    /// Display data for a visible card, as handed to the modal viewer.
    pub fn card(&self, id: &str) -> Option<CardView> {
        self.filtered
            .iter()
            .find(|capture| capture.id == id)
            .map(CardView::from)
    }
}
