//! Auth Service - sign in and out against the record store

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::ports::outbound::{AuthPort, StoreError};
use crate::application::services::roll_history_view::RollHistoryView;
use crate::domain::entities::User;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Store(StoreError),
}

pub struct AuthService {
    auth: Arc<dyn AuthPort>,
    history: Arc<RollHistoryView>,
}

impl AuthService {
    pub fn new(auth: Arc<dyn AuthPort>, history: Arc<RollHistoryView>) -> Self {
        Self { auth, history }
    }

    fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
        if !(email.contains('@') && email.contains('.')) {
            return Err(AuthError::InvalidInput("Invalid email".to_string()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput(
                "This field is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Sign in and store the session. Cached history belongs to the previous
    /// session, so it is dropped.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        Self::validate_credentials(email, password)?;

        let session = self
            .auth
            .auth_with_password(email, password)
            .await
            .map_err(|e| match e {
                StoreError::Api { status: 400, .. } | StoreError::Unauthorized => {
                    AuthError::InvalidCredentials
                }
                other => AuthError::Store(other),
            })?;

        let user = session.record.clone();
        self.auth.set_session(Some(session)).await;
        self.history.reset().await;
        info!(user_id = %user.id, "Signed in");

        Ok(user)
    }

    pub async fn logout(&self) {
        self.auth.set_session(None).await;
        self.history.reset().await;
        info!("Signed out");
    }

    pub async fn current_user(&self) -> Option<User> {
        self.auth.session().await.map(|session| session.record)
    }
}
