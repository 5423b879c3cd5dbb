//! Domain entities

mod roll_record;
mod user;

pub use roll_record::{HistoryEntry, ProvisionalRoll, RollNotes, RollPayload, RollRecord};
pub use user::User;
