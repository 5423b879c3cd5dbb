//! Record store port - the external backend that owns roll records and users
//!
//! The store is a collection-oriented CRUD service with password auth. The
//! application only relies on the operations below; transport, persistence and
//! the auth protocol live behind the adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{RollPayload, RollRecord, User};

pub const ROLLS_COLLECTION: &str = "rolls";
pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Record store unreachable: {0}")]
    Transport(String),
    #[error("Record store rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Not signed in")]
    Unauthorized,
    #[error("Unexpected record store response: {0}")]
    Decode(String),
}

/// Page request for a collection listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort: String,
}

impl ListQuery {
    pub const DEFAULT_PER_PAGE: u32 = 25;
    pub const DEFAULT_SORT: &'static str = "-created";

    /// First page, newest first
    pub fn first_page(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            sort: Self::DEFAULT_SORT.to_string(),
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::first_page(Self::DEFAULT_PER_PAGE)
    }
}

/// One page of a collection listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl<T> ListResult<T> {
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> ListResult<U> {
        ListResult {
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// Roll collection operations
#[async_trait]
pub trait RecordStorePort: Send + Sync {
    /// Persist a new roll; the store assigns id and timestamps
    async fn create_roll(&self, payload: &RollPayload) -> Result<RollRecord, StoreError>;

    /// Fetch one roll by id
    async fn get_roll(&self, id: &str) -> Result<RollRecord, StoreError>;

    /// Fetch one page of rolls
    async fn list_rolls(&self, query: &ListQuery) -> Result<ListResult<RollRecord>, StoreError>;
}

/// An authenticated session against the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub record: User,
}

/// Auth side of the record store, including its current-session slot
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Sign in against the users collection
    async fn auth_with_password(&self, email: &str, password: &str)
        -> Result<AuthSession, StoreError>;

    /// Current session, if any
    async fn session(&self) -> Option<AuthSession>;

    /// Replace the current session; `None` signs out
    async fn set_session(&self, session: Option<AuthSession>);
}
