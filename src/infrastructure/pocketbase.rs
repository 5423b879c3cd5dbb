//! PocketBase client for roll records and password auth

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    AuthPort, AuthSession, ListQuery, ListResult, RecordStorePort, StoreError, ROLLS_COLLECTION,
    USERS_COLLECTION,
};
use crate::domain::entities::{RollPayload, RollRecord};

/// Client for the PocketBase REST API
pub struct PocketBaseClient {
    client: Client,
    base_url: String,
    session: RwLock<Option<AuthSession>>,
}

/// Error body returned by PocketBase
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl PocketBaseClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session: RwLock::new(None),
        }
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/api/collections/{}/records", self.base_url, collection)
    }

    /// URL of one record; the id is percent-encoded as a single path segment
    fn record_url(&self, collection: &str, id: &str) -> Result<Url, StoreError> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(StoreError::NotFound(id.to_string()));
        }

        let mut url = Url::parse(&self.records_url(collection))
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Transport(format!("Invalid store URL: {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    /// Attach the session token, if signed in
    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.read().await.as_ref() {
            Some(session) => request.header(reqwest::header::AUTHORIZATION, &session.token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        not_found: &str,
    ) -> Result<T, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let response = Self::check_status(response, not_found).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn check_status(response: Response, not_found: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            404 => Err(StoreError::NotFound(not_found.to_string())),
            401 | 403 => Err(StoreError::Unauthorized),
            code => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .map(|parsed| parsed.message)
                    .unwrap_or(body);
                Err(StoreError::Api {
                    status: code,
                    message,
                })
            }
        }
    }
}

#[async_trait]
impl RecordStorePort for PocketBaseClient {
    async fn create_roll(&self, payload: &RollPayload) -> Result<RollRecord, StoreError> {
        let request = self
            .client
            .post(self.records_url(ROLLS_COLLECTION))
            .json(payload);
        let request = self.authorized(request).await;

        self.send(request, ROLLS_COLLECTION).await
    }

    async fn get_roll(&self, id: &str) -> Result<RollRecord, StoreError> {
        let request = self.client.get(self.record_url(ROLLS_COLLECTION, id)?);
        let request = self.authorized(request).await;

        self.send(request, id).await
    }

    async fn list_rolls(&self, query: &ListQuery) -> Result<ListResult<RollRecord>, StoreError> {
        let request = self.client.get(self.records_url(ROLLS_COLLECTION)).query(&[
            ("page", query.page.to_string()),
            ("perPage", query.per_page.to_string()),
            ("sort", query.sort.clone()),
        ]);
        let request = self.authorized(request).await;

        self.send(request, ROLLS_COLLECTION).await
    }
}

#[async_trait]
impl AuthPort for PocketBaseClient {
    async fn auth_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, StoreError> {
        let request = self
            .client
            .post(format!(
                "{}/api/collections/{}/auth-with-password",
                self.base_url, USERS_COLLECTION
            ))
            .json(&serde_json::json!({
                "identity": email,
                "password": password,
            }));

        self.send(request, USERS_COLLECTION).await
    }

    async fn session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    async fn set_session(&self, session: Option<AuthSession>) {
        *self.session.write().await = session;
    }
}
