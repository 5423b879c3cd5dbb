//! Roll history view - local cache of the first page of roll history
//!
//! Works like a small query cache: readers get cached data while it is fresh,
//! writers can replace it wholesale, and `invalidate` forces the next read to
//! go back to the store. Every cancel or invalidate bumps a generation counter;
//! a refresh that started under an older generation drops its result instead
//! of overwriting newer local state.

use std::future::Future;

use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::application::ports::outbound::{ListResult, StoreError};
use crate::domain::entities::HistoryEntry;

pub type RollPage = ListResult<HistoryEntry>;

#[derive(Debug)]
struct ViewState {
    data: Option<RollPage>,
    stale: bool,
    generation: u64,
}

pub struct RollHistoryView {
    state: RwLock<ViewState>,
    changes: watch::Sender<u64>,
}

impl RollHistoryView {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            state: RwLock::new(ViewState {
                data: None,
                stale: true,
                generation: 0,
            }),
            changes,
        }
    }

    /// Cached page, fresh or not
    pub async fn data(&self) -> Option<RollPage> {
        self.state.read().await.data.clone()
    }

    /// Replace the cached page
    pub async fn set_data(&self, data: Option<RollPage>) {
        self.state.write().await.data = data;
        self.notify();
    }

    /// Replace the cached page with `f(current)` atomically, returning the
    /// page that was there before
    pub async fn update<F>(&self, f: F) -> Option<RollPage>
    where
        F: FnOnce(Option<&RollPage>) -> Option<RollPage>,
    {
        let mut state = self.state.write().await;
        let next = f(state.data.as_ref());
        let previous = std::mem::replace(&mut state.data, next);
        drop(state);
        self.notify();
        previous
    }

    /// Make any in-flight refresh discard its result
    pub async fn cancel_refresh(&self) {
        let mut state = self.state.write().await;
        state.generation += 1;
        debug!(generation = state.generation, "Cancelled roll history refresh");
    }

    /// Mark the cache stale so the next read refetches
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.stale = true;
        state.generation += 1;
        debug!(generation = state.generation, "Invalidated roll history");
    }

    /// Drop cached data entirely, e.g. when the signed-in user changes
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        state.data = None;
        state.stale = true;
        state.generation += 1;
        drop(state);
        self.notify();
    }

    pub async fn is_stale(&self) -> bool {
        self.state.read().await.stale
    }

    /// Receiver bumped on every data change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Return cached data when fresh, otherwise fetch and cache it.
    ///
    /// If the view was cancelled or invalidated while the fetch was in flight
    /// the fetched page is returned to the caller but not cached, and the
    /// current local page wins if there is one.
    pub async fn refresh_with<F, Fut>(&self, fetch: F) -> Result<RollPage, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RollPage, StoreError>>,
    {
        let generation = {
            let state = self.state.read().await;
            if let (false, Some(data)) = (state.stale, &state.data) {
                return Ok(data.clone());
            }
            state.generation
        };

        let page = fetch().await?;

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(
                started = generation,
                current = state.generation,
                "Discarding superseded roll history refresh"
            );
            return Ok(state.data.clone().unwrap_or(page));
        }

        state.data = Some(page.clone());
        state.stale = false;
        drop(state);
        self.notify();

        Ok(page)
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }
}

impl Default for RollHistoryView {
    fn default() -> Self {
        Self::new()
    }
}
