//! Domain Value Objects
//!
//! Immutable value types for the rate limit domain.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::RateLimitError;

/// Discriminator stored with every session row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// One running count per key
    Aggregated,
    /// One row per hit
    Individual,
}

impl SessionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Aggregated => "aggregated",
            SessionKind::Individual => "individual",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "aggregated" => Some(SessionKind::Aggregated),
            "individual" => Some(SessionKind::Individual),
            _ => None,
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counting strategy selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStrategy {
    /// Aggregate count per key
    #[default]
    Summary,
    /// Individual event log per key
    Detailed,
}

impl StoreStrategy {
    pub const fn session_kind(&self) -> SessionKind {
        match self {
            StoreStrategy::Summary => SessionKind::Aggregated,
            StoreStrategy::Detailed => SessionKind::Individual,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StoreStrategy::Summary => "summary",
            StoreStrategy::Detailed => "detailed",
        }
    }
}

impl FromStr for StoreStrategy {
    type Err = RateLimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(StoreStrategy::Summary),
            "detailed" => Ok(StoreStrategy::Detailed),
            other => Err(RateLimitError::InvalidConfig(format!(
                "unknown strategy `{other}`, expected `summary` or `detailed`"
            ))),
        }
    }
}

impl fmt::Display for StoreStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length of a counting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLength(TimeDelta);

impl WindowLength {
    /// Build from milliseconds; zero and out-of-range values are rejected
    pub fn from_millis(ms: u64) -> Option<Self> {
        let ms = i64::try_from(ms).ok().filter(|ms| *ms > 0)?;
        TimeDelta::try_milliseconds(ms).map(Self)
    }

    pub fn from_duration(window: Duration) -> Option<Self> {
        u64::try_from(window.as_millis())
            .ok()
            .and_then(Self::from_millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0.num_milliseconds()
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }
}

/// The (name, kind) pair a session is unique for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionScope {
    pub name: String,
    pub kind: SessionKind,
}

impl SessionScope {
    pub fn new(name: impl Into<String>, kind: SessionKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.kind)
    }
}
