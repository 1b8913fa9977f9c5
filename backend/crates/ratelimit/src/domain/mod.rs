//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Session, HitTally)
//! - Domain value objects (SessionKind, StoreStrategy, WindowLength, SessionScope)
//! - Domain services (window arithmetic)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
