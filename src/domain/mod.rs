//! Domain layer - Core dice rules with no I/O
//!
//! This layer contains:
//! - Value Objects: die variants, roll requests and roll outcomes
//! - Entities: roll records as stored by the record store, users
//! - Domain Services: the roll engine

pub mod entities;
pub mod services;
pub mod value_objects;
