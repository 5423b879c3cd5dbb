//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP layer can deserialize and
//! validate request bodies without the domain knowing about forms.

pub mod auth;
pub mod roll;

pub use auth::*;
pub use roll::*;
