//! Submission coordinator - persist a roll with an optimistic history update
//!
//! Flow for one submission:
//! 1. cancel in-flight history refreshes, snapshot, prepend a provisional entry
//! 2. create the record in the store
//! 3. on failure restore the snapshot
//! 4. on settlement (either way) invalidate the history view
//! 5. on success notify in the background, ignoring notification failures
//!
//! Overlapping submissions are independent; each carries its own snapshot.

use std::sync::Arc;

use tracing::{info, instrument, warn, Instrument};

use crate::application::ports::outbound::{
    ClockPort, NotificationPort, RecordStorePort, StoreError,
};
use crate::application::services::optimistic_update::OptimisticUpdate;
use crate::application::services::roll_history_view::RollHistoryView;
use crate::domain::entities::{HistoryEntry, ProvisionalRoll, RollPayload, RollRecord};
use crate::domain::value_objects::SubmissionId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Failed to save roll: {0}")]
    Store(#[from] StoreError),
}

pub struct SubmissionCoordinator {
    store: Arc<dyn RecordStorePort>,
    notifier: Arc<dyn NotificationPort>,
    view: Arc<RollHistoryView>,
    clock: Arc<dyn ClockPort>,
    per_page: u32,
}

impl SubmissionCoordinator {
    pub fn new(
        store: Arc<dyn RecordStorePort>,
        notifier: Arc<dyn NotificationPort>,
        view: Arc<RollHistoryView>,
        clock: Arc<dyn ClockPort>,
        per_page: u32,
    ) -> Self {
        Self {
            store,
            notifier,
            view,
            clock,
            per_page,
        }
    }

    #[instrument(skip(self, payload), fields(die = %payload.die, submission_id = tracing::field::Empty))]
    pub async fn submit(&self, payload: RollPayload) -> Result<RollRecord, SubmissionError> {
        let submission_id = SubmissionId::new();
        tracing::Span::current().record("submission_id", tracing::field::display(submission_id));

        let provisional = HistoryEntry::Provisional(ProvisionalRoll {
            created: self.clock.now().to_rfc3339(),
            payload: payload.clone(),
        });
        let update =
            OptimisticUpdate::begin(submission_id, self.view.clone(), provisional, self.per_page)
                .await;

        let result = self.store.create_roll(&payload).await;

        match &result {
            Ok(_) => {
                update.commit();
            }
            Err(e) => {
                warn!(error = %e, "Roll submission failed, rolling back history");
                update.rollback().await;
            }
        }

        // The provisional entry has no store id or timestamp, so the view is
        // refetched whatever happened.
        self.view.invalidate().await;

        let record = result?;
        info!(record_id = %record.id, "Roll saved");

        let notifier = self.notifier.clone();
        let announced = record.clone();
        tokio::spawn(
            async move {
                if let Err(e) = notifier.notify_roll(&announced).await {
                    warn!(record_id = %announced.id, error = %e, "Roll notification failed");
                }
            }
            .in_current_span(),
        );

        Ok(record)
    }
}
