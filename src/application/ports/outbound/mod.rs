//! Outbound ports - Interfaces that the application requires from external systems

mod clock_port;
mod notification_port;
mod random_port;
mod record_store_port;

pub use clock_port::ClockPort;
pub use notification_port::{NotificationError, NotificationPort};
pub use random_port::RandomPort;
pub use record_store_port::{
    AuthPort, AuthSession, ListQuery, ListResult, RecordStorePort, StoreError, ROLLS_COLLECTION,
    USERS_COLLECTION,
};
