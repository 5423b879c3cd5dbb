//! Test doubles for the outbound ports

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::application::ports::outbound::{
    AuthPort, AuthSession, ClockPort, ListQuery, ListResult, NotificationError,
    NotificationPort, RandomPort, RecordStorePort, StoreError, ROLLS_COLLECTION,
};
use crate::application::services::roll_history_view::RollPage;
use crate::domain::entities::{
    HistoryEntry, ProvisionalRoll, RollNotes, RollPayload, RollRecord, User,
};
use crate::domain::value_objects::{AdditiveOutcome, RollOutcome};

pub fn additive_payload(roller: &str) -> RollPayload {
    RollPayload::new(
        RollOutcome::Additive(AdditiveOutcome {
            rolls: vec![4, 6],
            modifier: None,
            total: 10,
        }),
        RollNotes::new(roller),
    )
}

pub fn stored_record(id: &str) -> RollRecord {
    RollRecord {
        id: id.to_string(),
        collection_id: "rolls_col".to_string(),
        collection_name: ROLLS_COLLECTION.to_string(),
        created: "2024-03-01 10:00:00.000Z".to_string(),
        updated: "2024-03-01 10:00:00.000Z".to_string(),
        payload: additive_payload("Wren"),
    }
}

pub fn stored_page(count: usize) -> RollPage {
    ListResult {
        page: 1,
        per_page: 25,
        total_items: count as i64,
        total_pages: 1,
        items: (0..count)
            .map(|i| HistoryEntry::Stored(stored_record(&format!("rec{}", i))))
            .collect(),
    }
}

pub fn provisional_entry() -> HistoryEntry {
    HistoryEntry::Provisional(ProvisionalRoll {
        created: "2024-03-02T09:00:00+00:00".to_string(),
        payload: additive_payload("Wren"),
    })
}

pub fn test_user() -> User {
    User {
        id: "user1".to_string(),
        collection_id: "_pb_users_auth_".to_string(),
        collection_name: "users".to_string(),
        username: "wren".to_string(),
        verified: true,
        email_visibility: false,
        email: "wren@example.com".to_string(),
        created: String::new(),
        updated: String::new(),
        name: "Wren".to_string(),
        avatar: None,
    }
}

/// In-memory store with switchable failures
#[derive(Default)]
pub struct MockStore {
    pub records: Mutex<Vec<RollRecord>>,
    pub fail_create: Mutex<Option<StoreError>>,
    pub list_calls: Mutex<u32>,
    pub session: Mutex<Option<AuthSession>>,
}

impl MockStore {
    pub fn failing_create(error: StoreError) -> Self {
        let store = Self::default();
        *store.fail_create.lock().unwrap() = Some(error);
        store
    }

    pub fn list_calls(&self) -> u32 {
        *self.list_calls.lock().unwrap()
    }
}

#[async_trait]
impl RecordStorePort for MockStore {
    async fn create_roll(&self, payload: &RollPayload) -> Result<RollRecord, StoreError> {
        if let Some(error) = self.fail_create.lock().unwrap().clone() {
            return Err(error);
        }
        let mut records = self.records.lock().unwrap();
        let record = RollRecord {
            id: format!("new{}", records.len()),
            collection_id: "rolls_col".to_string(),
            collection_name: ROLLS_COLLECTION.to_string(),
            created: "2024-03-02 09:00:01.000Z".to_string(),
            updated: "2024-03-02 09:00:01.000Z".to_string(),
            payload: payload.clone(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn get_roll(&self, id: &str) -> Result<RollRecord, StoreError> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_rolls(&self, query: &ListQuery) -> Result<ListResult<RollRecord>, StoreError> {
        *self.list_calls.lock().unwrap() += 1;
        let records = self.records.lock().unwrap();
        let mut items: Vec<RollRecord> = records.iter().rev().cloned().collect();
        let total_items = items.len() as i64;
        let skip = ((query.page.max(1) - 1) * query.per_page) as usize;
        items = items
            .into_iter()
            .skip(skip)
            .take(query.per_page as usize)
            .collect();
        Ok(ListResult {
            page: query.page,
            per_page: query.per_page,
            total_items,
            total_pages: 1,
            items,
        })
    }
}

#[async_trait]
impl AuthPort for MockStore {
    async fn auth_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        if email == "wren@example.com" && password == "hunter22" {
            Ok(AuthSession {
                token: "token-1".to_string(),
                record: test_user(),
            })
        } else {
            Err(StoreError::Api {
                status: 400,
                message: "Failed to authenticate.".to_string(),
            })
        }
    }

    async fn session(&self) -> Option<AuthSession> {
        self.session.lock().unwrap().clone()
    }

    async fn set_session(&self, session: Option<AuthSession>) {
        *self.session.lock().unwrap() = session;
    }
}

/// Records every notified roll, optionally failing
#[derive(Default)]
pub struct MockNotifier {
    pub notified: Mutex<Vec<RollRecord>>,
    pub fail: bool,
}

impl MockNotifier {
    pub fn failing() -> Self {
        Self {
            notified: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn notified_ids(&self) -> Vec<String> {
        self.notified
            .lock()
            .unwrap()
            .iter()
            .map(|record| record.id.clone())
            .collect()
    }

    /// Notifications run in the background; wait until `count` have arrived
    pub async fn wait_for_notified(&self, count: usize) -> Vec<String> {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let ids = self.notified_ids();
                if ids.len() >= count {
                    return ids;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("notifications did not arrive")
    }
}

/// A webhook that accepts the request and never answers
pub struct HangingNotifier;

#[async_trait]
impl NotificationPort for HangingNotifier {
    async fn notify_roll(&self, _record: &RollRecord) -> Result<(), NotificationError> {
        std::future::pending().await
    }
}

#[async_trait]
impl NotificationPort for MockNotifier {
    async fn notify_roll(&self, record: &RollRecord) -> Result<(), NotificationError> {
        self.notified.lock().unwrap().push(record.clone());
        if self.fail {
            return Err(NotificationError::Rejected {
                status: 500,
                body: "webhook down".to_string(),
            });
        }
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn new() -> Self {
        Self(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap())
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Replays scripted draws in order
pub struct FixedRandom {
    draws: Mutex<VecDeque<i32>>,
}

impl FixedRandom {
    pub fn new(draws: &[i32]) -> Self {
        Self {
            draws: Mutex::new(draws.iter().copied().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.lock().unwrap().len()
    }
}

impl RandomPort for FixedRandom {
    fn random_range(&self, min: i32, max: i32) -> i32 {
        let value = self
            .draws
            .lock()
            .unwrap()
            .pop_front()
            .expect("ran out of scripted draws");
        assert!((min..=max).contains(&value), "scripted draw {} outside {}..={}", value, min, max);
        value
    }
}
