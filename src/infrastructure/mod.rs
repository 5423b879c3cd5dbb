//! Infrastructure layer - adapters for the outbound ports and the HTTP API

pub mod clock;
pub mod config;
pub mod discord;
pub mod http;
pub mod memory_store;
pub mod pocketbase;
pub mod random;
pub mod state;
