//! Notification port - best-effort outbound message about a stored roll

use async_trait::async_trait;

use crate::domain::entities::RollRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification request failed: {0}")]
    Transport(String),
    #[error("Notification rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Announce a stored roll. Implementations without a destination return `Ok`.
    async fn notify_roll(&self, record: &RollRecord) -> Result<(), NotificationError>;
}
