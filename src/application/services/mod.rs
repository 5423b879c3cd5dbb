//! Application services - Use case implementations
//!
//! Services depend on the outbound port traits, never on concrete adapters.

pub mod auth_service;
pub mod optimistic_update;
pub mod roll_history_view;
pub mod roll_service;
pub mod submission_coordinator;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_service::{AuthError, AuthService};
pub use optimistic_update::{OptimisticUpdate, TransactionState};
pub use roll_history_view::{RollHistoryView, RollPage};
pub use roll_service::{RollService, RollServiceError};
pub use submission_coordinator::{SubmissionCoordinator, SubmissionError};
