//! Domain services - Pure business logic operations

pub mod roll_engine;

pub use roll_engine::{PercentileDraws, RollError};
