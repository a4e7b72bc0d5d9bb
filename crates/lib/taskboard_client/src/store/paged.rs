//! Paged collection store, one instance per resource.
//!
//! Concurrent fetches are not coalesced or sequenced: whichever response
//! lands last owns `page` and `filters`. Callers that issue fetches in
//! quick succession (search-as-you-type) should debounce upstream.
//!
//! Mutations only report a status code. Refetching afterwards is the
//! caller's decision, since an edited item may no longer match the
//! active filters.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use super::{RequestState, clear_after};
use crate::error::ErrorKind;
use crate::models::{Page, PageFilter};
use crate::outcome::RequestOutcome;
use crate::services::ResourceService;

/// Everything a view renders for one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T, F> {
    pub request: RequestState,
    pub page: Page<T>,
    /// Filters of the last successful fetch; `None` before the first one.
    pub filters: Option<F>,
}

impl<T, F> Default for StoreState<T, F> {
    fn default() -> Self {
        Self {
            request: RequestState::default(),
            page: Page::default(),
            filters: None,
        }
    }
}

type SharedState<S> =
    Arc<Mutex<StoreState<<S as ResourceService>::Item, <S as ResourceService>::Filter>>>;

pub struct PagedCollectionStore<S: ResourceService> {
    service: Arc<S>,
    state: SharedState<S>,
}

impl<S: ResourceService> Clone for PagedCollectionStore<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: ResourceService> PagedCollectionStore<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            state: Arc::new(Mutex::new(StoreState::default())),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<S::Item, S::Filter>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> StoreState<S::Item, S::Filter> {
        self.lock().clone()
    }

    pub fn page(&self) -> Page<S::Item> {
        self.lock().page.clone()
    }

    pub fn filters(&self) -> Option<S::Filter> {
        self.lock().filters.clone()
    }

    pub fn request_state(&self) -> RequestState {
        self.lock().request
    }

    pub fn is_loading(&self) -> bool {
        self.lock().request.loading
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.lock().request.last_error
    }

    pub fn last_status_code(&self) -> Option<u16> {
        self.lock().request.last_status_code
    }

    /// Load the page described by `filters`, sent exactly as given.
    ///
    /// On failure the page is emptied and the previous filters are kept.
    /// Returns the status code of the call.
    pub async fn fetch(&self, filters: S::Filter) -> u16 {
        self.lock().request.begin();
        let outcome = self.service.list(&filters).await;
        let status = outcome.status_code();

        let mut state = self.lock();
        state.request.record(&outcome);
        match outcome {
            RequestOutcome::Success { data, .. } => {
                state.page = Page::from(data);
                state.filters = Some(filters);
            }
            RequestOutcome::Failure { .. } => state.page = Page::default(),
        }
        debug!(status, items = state.page.items.len(), "collection fetched");
        status
    }

    /// Fetch from the first page, discarding any cursor in `filters`.
    pub async fn fetch_first(&self, mut filters: S::Filter) -> u16 {
        filters.set_cursor(String::new());
        self.fetch(filters).await
    }

    /// Follow `page.next_cursor`. Returns `false` without touching the
    /// network when there is no next page.
    pub async fn next(&self) -> bool {
        match self.at_cursor(|page| &page.next_cursor) {
            Some(filters) => {
                self.fetch(filters).await;
                true
            }
            None => false,
        }
    }

    /// Follow `page.prev_cursor`. Same contract as [`next`](Self::next).
    pub async fn prev(&self) -> bool {
        match self.at_cursor(|page| &page.prev_cursor) {
            Some(filters) => {
                self.fetch(filters).await;
                true
            }
            None => false,
        }
    }

    /// Append the next page to the items already held.
    ///
    /// Returns `false` without a request when there is no next page. A
    /// failed load records the error and keeps the accumulated items.
    pub async fn load_more(&self) -> bool {
        let Some(filters) = self.at_cursor(|page| &page.next_cursor) else {
            return false;
        };

        self.lock().request.begin();
        let outcome = self.service.list(&filters).await;

        let mut state = self.lock();
        state.request.record(&outcome);
        if let RequestOutcome::Success { data, .. } = outcome {
            let more = Page::from(data);
            state.page.items.extend(more.items);
            state.page.next_cursor = more.next_cursor;
            state.page.prev_cursor = more.prev_cursor;
            state.filters = Some(filters);
        }
        true
    }

    fn at_cursor(&self, cursor: impl Fn(&Page<S::Item>) -> &String) -> Option<S::Filter> {
        let state = self.lock();
        let cursor = cursor(&state.page);
        if cursor.is_empty() {
            return None;
        }
        let filters = state.filters.as_ref()?;
        Some(filters.at_cursor(cursor))
    }

    pub async fn create(&self, body: &S::Create) -> u16 {
        self.lock().request.begin();
        let outcome = self.service.create(body).await;
        self.finish_mutation(outcome)
    }

    pub async fn update(&self, body: &S::Update) -> u16 {
        self.lock().request.begin();
        let outcome = self.service.update(body).await;
        self.finish_mutation(outcome)
    }

    pub async fn delete(&self, id: &str) -> u16 {
        self.lock().request.begin();
        let outcome = self.service.delete(id).await;
        self.finish_mutation(outcome)
    }

    fn finish_mutation<T>(&self, outcome: RequestOutcome<T>) -> u16 {
        self.lock().request.record(&outcome);
        outcome.status_code()
    }

    /// Clear loading and error state; `page` and `filters` stay.
    pub fn clear_request_state(&self) {
        self.lock().request.clear();
    }

    /// Clear request state after `after` (normally
    /// [`BANNER_DISMISS_AFTER`](crate::messages::BANNER_DISMISS_AFTER)).
    pub fn schedule_clear_request_state(&self, after: Duration) -> JoinHandle<()> {
        let store = self.clone();
        clear_after(after, move || store.clear_request_state())
    }
}
