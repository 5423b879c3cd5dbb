//! Application layer - Use cases over the roll engine and external collaborators

pub mod dto;
pub mod ports;
pub mod services;
