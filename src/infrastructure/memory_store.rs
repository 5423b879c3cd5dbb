//! In-memory record store for running without a PocketBase instance

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::outbound::{
    AuthPort, AuthSession, ListQuery, ListResult, RecordStorePort, StoreError, ROLLS_COLLECTION,
    USERS_COLLECTION,
};
use crate::domain::entities::{RollPayload, RollRecord, User};

const RECORD_ID_LEN: usize = 15;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3fZ";

#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    rolls: Arc<Mutex<Vec<RollRecord>>>,
    session: Arc<Mutex<Option<AuthSession>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn record_id() -> String {
    Uuid::new_v4().simple().to_string()[..RECORD_ID_LEN].to_string()
}

fn timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStorePort for InMemoryRecordStore {
    async fn create_roll(&self, payload: &RollPayload) -> Result<RollRecord, StoreError> {
        let now = timestamp();
        let record = RollRecord {
            id: record_id(),
            collection_id: ROLLS_COLLECTION.to_string(),
            collection_name: ROLLS_COLLECTION.to_string(),
            created: now.clone(),
            updated: now,
            payload: payload.clone(),
        };
        lock(&self.rolls).push(record.clone());
        Ok(record)
    }

    async fn get_roll(&self, id: &str) -> Result<RollRecord, StoreError> {
        lock(&self.rolls)
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_rolls(&self, query: &ListQuery) -> Result<ListResult<RollRecord>, StoreError> {
        let rolls = lock(&self.rolls);
        let per_page = query.per_page.max(1);
        let total_items = rolls.len() as i64;
        let total_pages = (total_items + i64::from(per_page) - 1) / i64::from(per_page);

        // Insertion order is creation order
        let newest_first = query.sort != "created";
        let ordered: Vec<&RollRecord> = if newest_first {
            rolls.iter().rev().collect()
        } else {
            rolls.iter().collect()
        };

        let skip = (query.page.max(1) as usize - 1) * per_page as usize;
        let items = ordered
            .into_iter()
            .skip(skip)
            .take(per_page as usize)
            .cloned()
            .collect();

        Ok(ListResult {
            page: query.page.max(1),
            per_page,
            total_items,
            total_pages,
            items,
        })
    }
}

#[async_trait]
impl AuthPort for InMemoryRecordStore {
    /// Any well-formed email with a non-empty password signs in
    async fn auth_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        if password.is_empty() || !email.contains('@') {
            return Err(StoreError::Api {
                status: 400,
                message: "Failed to authenticate.".to_string(),
            });
        }

        let username = email.split('@').next().unwrap_or(email).to_string();
        let now = timestamp();
        Ok(AuthSession {
            token: Uuid::new_v4().to_string(),
            record: User {
                id: record_id(),
                collection_id: USERS_COLLECTION.to_string(),
                collection_name: USERS_COLLECTION.to_string(),
                name: username.clone(),
                username,
                verified: true,
                email_visibility: false,
                email: email.to_string(),
                created: now.clone(),
                updated: now,
                avatar: None,
            },
        })
    }

    async fn session(&self) -> Option<AuthSession> {
        lock(&self.session).clone()
    }

    async fn set_session(&self, session: Option<AuthSession>) {
        *lock(&self.session) = session;
    }
}
