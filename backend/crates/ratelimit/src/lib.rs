//! Fixed-Window Rate Limit Store
//!
//! PostgreSQL-backed hit counter for rate limiting middleware.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and the [`WindowStore`] facade
//! - `infra/` - Session manager, counter engine, schema bootstrap
//!
//! ## Consistency Model
//! - One session (window) per `(prefix, strategy)`, created under a table lock
//! - Windows are fixed: hits never move `expires_at`
//! - Counter rows are owned by their session and cascade away with it
//! - A missing schema is created on the first failing `increment`, which still
//!   reports the failure

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::{DatabaseConfig, StoreConfig};
pub use application::store::{PgWindowStore, WindowStore};
pub use domain::value_objects::StoreStrategy;
pub use error::{RateLimitError, RateLimitResult};
pub use infra::postgres::PgRateLimitRepository;
pub use platform::clock::{Clock, SystemClock};
pub use platform::rate_limit::{ClientRateLimitInfo, RateLimitStore, StoreError};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, ResultExt},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
}
