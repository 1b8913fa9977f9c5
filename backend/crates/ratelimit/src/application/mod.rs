//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.
//! Contains use case implementations and the store facade.

pub mod config;
pub mod decrement;
pub mod get_hits;
pub mod increment;
pub mod reset;
pub mod store;
