//! Roll Service - roll dice, submit rolls and read roll history

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::ports::outbound::{
    ClockPort, ListQuery, NotificationPort, RandomPort, RecordStorePort, StoreError,
};
use crate::application::services::roll_history_view::{RollHistoryView, RollPage};
use crate::application::services::submission_coordinator::{
    SubmissionCoordinator, SubmissionError,
};
use crate::domain::entities::{HistoryEntry, RollNotes, RollPayload, RollRecord};
use crate::domain::services::roll_engine;
use crate::domain::services::RollError;
use crate::domain::value_objects::{RollOutcome, RollRequest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RollServiceError {
    #[error(transparent)]
    Validation(#[from] RollError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

pub struct RollService {
    store: Arc<dyn RecordStorePort>,
    rng: Arc<dyn RandomPort>,
    history: Arc<RollHistoryView>,
    coordinator: SubmissionCoordinator,
    default_query: ListQuery,
}

impl RollService {
    pub fn new(
        store: Arc<dyn RecordStorePort>,
        notifier: Arc<dyn NotificationPort>,
        rng: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
        history: Arc<RollHistoryView>,
        per_page: u32,
    ) -> Self {
        let coordinator =
            SubmissionCoordinator::new(store.clone(), notifier, history.clone(), clock, per_page);

        Self {
            store,
            rng,
            history,
            coordinator,
            default_query: ListQuery::first_page(per_page),
        }
    }

    /// Run the roll engine against the configured random source
    pub fn roll(&self, request: &RollRequest) -> Result<RollOutcome, RollError> {
        roll_engine::roll(request, |sides| self.rng.roll_die(sides))
    }

    /// Roll and persist the result
    #[instrument(skip(self, request, notes), fields(die = %request.variant()))]
    pub async fn submit_roll(
        &self,
        request: &RollRequest,
        notes: RollNotes,
    ) -> Result<RollRecord, RollServiceError> {
        let outcome = self.roll(request)?;
        debug!(result = outcome.result(), "Rolled");

        let record = self
            .coordinator
            .submit(RollPayload::new(outcome, notes))
            .await?;
        Ok(record)
    }

    /// The query served from the local history view
    pub fn default_query(&self) -> &ListQuery {
        &self.default_query
    }

    /// One page of roll history; the first page goes through the local view
    #[instrument(skip(self))]
    pub async fn list_rolls(&self, query: &ListQuery) -> Result<RollPage, StoreError> {
        if *query == self.default_query {
            return self
                .history
                .refresh_with(|| self.fetch_page(query))
                .await;
        }
        self.fetch_page(query).await
    }

    pub async fn get_roll(&self, id: &str) -> Result<RollRecord, StoreError> {
        self.store.get_roll(id).await
    }

    pub fn history(&self) -> &Arc<RollHistoryView> {
        &self.history
    }

    async fn fetch_page(&self, query: &ListQuery) -> Result<RollPage, StoreError> {
        let page = self.store.list_rolls(query).await?;
        Ok(page.map_items(HistoryEntry::Stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        FixedClock, FixedRandom, MockNotifier, MockStore,
    };
    use crate::domain::value_objects::{
        DieVariant, Modifier, PercentileRequest, PoolRequest, RollValue,
    };

    fn service(store: Arc<MockStore>, draws: &[i32]) -> RollService {
        RollService::new(
            store,
            Arc::new(MockNotifier::default()),
            Arc::new(FixedRandom::new(draws)),
            Arc::new(FixedClock::new()),
            Arc::new(RollHistoryView::new()),
            25,
        )
    }

    #[test]
    fn test_roll_uses_injected_random_source() {
        let service = service(Arc::new(MockStore::default()), &[3, 5, 7]);
        let outcome = service
            .roll(&RollRequest::Percentile(PercentileRequest::new(40)))
            .unwrap();

        match outcome {
            RollOutcome::Percentile(p) => {
                assert_eq!(p.final_pair, [3, 5]);
                assert_eq!(p.parsed_value, 35);
                assert!(p.is_success);
            }
            other => panic!("Expected percentile outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_roll_persists_payload() {
        let store = Arc::new(MockStore::default());
        let service = service(store.clone(), &[6, 6, 2]);

        let request = RollRequest::Exploding(PoolRequest::new(1).with_modifier(Modifier::Value(1)));
        let record = service
            .submit_roll(&request, RollNotes::new("Wren").with_notes("vs. the wyrm"))
            .await
            .unwrap();

        assert_eq!(record.payload.die, DieVariant::Exploding);
        assert_eq!(
            record.payload.rolls,
            vec![RollValue::Number(6), RollValue::Number(6), RollValue::Number(2)]
        );
        assert_eq!(record.payload.output.result(), 15);
        assert_eq!(record.payload.notes.notes.as_deref(), Some("vs. the wyrm"));
    }

    #[tokio::test]
    async fn test_missing_target_blocks_submission() {
        let store = Arc::new(MockStore::default());
        let random = Arc::new(FixedRandom::new(&[1, 2, 3]));
        let service = RollService::new(
            store.clone(),
            Arc::new(MockNotifier::default()),
            random.clone(),
            Arc::new(FixedClock::new()),
            Arc::new(RollHistoryView::new()),
            25,
        );

        let err = service
            .submit_roll(
                &RollRequest::Percentile(PercentileRequest::default()),
                RollNotes::new("Wren"),
            )
            .await
            .unwrap_err();

        assert_eq!(err, RollServiceError::Validation(RollError::MissingTarget));
        assert_eq!(random.remaining(), 3);
        assert!(store.records.lock().unwrap().is_empty());
        assert_eq!(service.history().data().await, None);
    }

    #[tokio::test]
    async fn test_first_page_is_cached_other_pages_are_not() {
        let store = Arc::new(MockStore::default());
        let service = service(store.clone(), &[4, 6]);
        service
            .submit_roll(&RollRequest::Additive(PoolRequest::new(2)), RollNotes::new("Wren"))
            .await
            .unwrap();

        let query = service.default_query().clone();
        let first = service.list_rolls(&query).await.unwrap();
        let again = service.list_rolls(&query).await.unwrap();
        assert_eq!(first, again);
        assert_eq!(store.list_calls(), 1);

        let second_page = ListQuery {
            page: 2,
            ..query.clone()
        };
        let page = service.list_rolls(&second_page).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(store.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_get_roll_not_found() {
        let service = service(Arc::new(MockStore::default()), &[]);
        let err = service.get_roll("missing").await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".to_string()));
    }
}
