//! Application Configuration
//!
//! Configuration for the store and for its database connection.

use std::time::Duration;

use chrono::Utc;

use crate::domain::services::window_expiry;
use crate::domain::value_objects::{SessionScope, StoreStrategy, WindowLength};
use crate::error::{RateLimitError, RateLimitResult};

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Session name; distinguishes limiters sharing one database
    pub prefix: String,
    /// Counting strategy
    pub strategy: StoreStrategy,
    /// Window length
    pub window: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prefix: "default".to_string(),
            strategy: StoreStrategy::Summary,
            window: Duration::from_secs(60),
        }
    }
}

impl StoreConfig {
    pub fn new(prefix: impl Into<String>, strategy: StoreStrategy, window: Duration) -> Self {
        Self {
            prefix: prefix.into(),
            strategy,
            window,
        }
    }

    /// Same as `new` with the window given in milliseconds
    pub fn with_window_ms(prefix: impl Into<String>, strategy: StoreStrategy, window_ms: u64) -> Self {
        Self::new(prefix, strategy, Duration::from_millis(window_ms))
    }

    /// Validated window length
    ///
    /// A window whose end, counted from now, lies past the timestamp range
    /// is rejected here rather than failing every later increment.
    pub fn window_length(&self) -> RateLimitResult<WindowLength> {
        let window = WindowLength::from_duration(self.window).ok_or_else(|| {
            RateLimitError::InvalidConfig(format!(
                "window must be a positive number of milliseconds, got {:?}",
                self.window
            ))
        })?;

        if window_expiry(Utc::now(), window).is_none() {
            return Err(RateLimitError::InvalidConfig(format!(
                "window of {}ms exceeds the timestamp range",
                window.as_millis()
            )));
        }

        Ok(window)
    }

    pub fn scope(&self) -> SessionScope {
        SessionScope::new(self.prefix.clone(), self.strategy.session_kind())
    }
}

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `postgres://` connection URL
    pub url: String,
    /// Pool size
    pub max_connections: u32,
    /// How long an operation waits for a pooled connection
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}
