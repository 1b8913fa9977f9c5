//! Infrastructure Layer - PostgreSQL implementations

pub mod counter;
pub mod postgres;
pub mod schema;
pub mod session;
