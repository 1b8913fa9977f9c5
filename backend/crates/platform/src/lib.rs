//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - The hit-store contract consumed by rate limiting middleware
//! - Wall-clock abstraction used as the reference time of every operation

pub mod clock;
pub mod rate_limit;
