//! Optimistic update - snapshot, speculative apply, then confirm or revert
//!
//! A transaction starts `Pending` with the provisional entry already visible
//! in the history view. It ends exactly once, either `Committed` (the store
//! accepted the write) or `RolledBack` (the view is restored to the snapshot).

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::services::roll_history_view::{RollHistoryView, RollPage};
use crate::application::ports::outbound::ListResult;
use crate::domain::entities::HistoryEntry;
use crate::domain::value_objects::SubmissionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Pending,
    Committed,
    RolledBack,
}

pub struct OptimisticUpdate {
    id: SubmissionId,
    view: Arc<RollHistoryView>,
    snapshot: Option<RollPage>,
    state: TransactionState,
}

impl OptimisticUpdate {
    /// Cancel in-flight refreshes, snapshot the view and prepend `entry`
    pub async fn begin(
        id: SubmissionId,
        view: Arc<RollHistoryView>,
        entry: HistoryEntry,
        per_page: u32,
    ) -> Self {
        view.cancel_refresh().await;
        let snapshot = view
            .update(|current| Some(prepend(current, entry, per_page)))
            .await;

        debug!(submission_id = %id, "Applied provisional roll to history");

        Self {
            id,
            view,
            snapshot,
            state: TransactionState::Pending,
        }
    }

    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// The view as it was before the provisional entry went in
    pub fn snapshot(&self) -> Option<&RollPage> {
        self.snapshot.as_ref()
    }

    /// The store accepted the write; keep the speculative state until the
    /// view is invalidated
    pub fn commit(mut self) -> TransactionState {
        self.state = TransactionState::Committed;
        self.state
    }

    /// The write failed; put the snapshot back exactly as it was
    pub async fn rollback(mut self) -> TransactionState {
        let snapshot = self.snapshot.take();
        self.view.set_data(snapshot).await;
        self.state = TransactionState::RolledBack;
        debug!(submission_id = %self.id, "Rolled back provisional roll");
        self.state
    }
}

impl Drop for OptimisticUpdate {
    fn drop(&mut self) {
        if self.state == TransactionState::Pending {
            warn!(
                submission_id = %self.id,
                "Optimistic update dropped without commit or rollback"
            );
        }
    }
}

fn prepend(current: Option<&RollPage>, entry: HistoryEntry, per_page: u32) -> RollPage {
    match current {
        Some(page) => {
            let mut items = Vec::with_capacity(page.items.len() + 1);
            items.push(entry);
            items.extend(page.items.iter().cloned());
            ListResult {
                page: page.page,
                per_page: page.per_page,
                total_items: page.total_items + 1,
                total_pages: page.total_pages.max(1),
                items,
            }
        }
        None => ListResult {
            page: 1,
            per_page,
            total_items: 1,
            total_pages: 1,
            items: vec![entry],
        },
    }
}
