//! Rate Limiting Infrastructure
//!
//! The contract between a rate limiting middleware and the store that
//! counts hits for it. The middleware derives a key per request, calls
//! [`RateLimitStore::increment`] and compares `total_hits` against its limit.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Error type surfaced through the store contract
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Hit count for a client within the current window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRateLimitInfo {
    /// Hits recorded for the key in the current window
    pub total_hits: u32,
    /// When the current window ends; `None` if no window is open
    pub reset_time: Option<DateTime<Utc>>,
}

impl ClientRateLimitInfo {
    pub fn new(total_hits: u32, reset_time: DateTime<Utc>) -> Self {
        Self {
            total_hits,
            reset_time: Some(reset_time),
        }
    }

    /// Hits left before `limit` is exceeded
    pub fn remaining(&self, limit: u32) -> u32 {
        limit.saturating_sub(self.total_hits)
    }

    /// Whether the hit that produced this info exceeded `limit`
    pub fn exceeds(&self, limit: u32) -> bool {
        self.total_hits > limit
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Record one hit for `key` and return the updated count
    async fn increment(&self, key: &str) -> Result<ClientRateLimitInfo, StoreError>;

    /// Undo one hit for `key` (e.g. the request was not counted after all)
    async fn decrement(&self, key: &str) -> Result<(), StoreError>;

    /// Forget all hits for `key` in the current window
    async fn reset_key(&self, key: &str) -> Result<(), StoreError>;

    /// Forget all hits for every key in the current window
    async fn reset_all(&self) -> Result<(), StoreError>;

    /// Read the current count for `key` without recording a hit
    async fn get(&self, key: &str) -> Result<Option<ClientRateLimitInfo>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::{ClientRateLimitInfo, RateLimitStore, StoreError};
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[test]
    fn test_info_serialization() {
        let reset = DateTime::parse_from_rfc3339("2026-01-01T00:01:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let info = ClientRateLimitInfo::new(3, reset);

        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains(r#""totalHits":3"#));
        assert!(json.contains(r#""resetTime":"2026-01-01T00:01:00Z""#));
    }

    #[test]
    fn test_remaining_and_exceeds() {
        let info = ClientRateLimitInfo::new(4, Utc::now());
        assert_eq!(info.remaining(5), 1);
        assert_eq!(info.remaining(3), 0);
        assert!(!info.exceeds(4));
        assert!(info.exceeds(3));
    }

    /// Minimal store used to check the trait is usable from generic middleware code
    #[derive(Default)]
    struct CountingStore {
        hits: Mutex<HashMap<String, u32>>,
    }

    impl RateLimitStore for CountingStore {
        async fn increment(&self, key: &str) -> Result<ClientRateLimitInfo, StoreError> {
            let mut hits = self.hits.lock().unwrap();
            let count = hits.entry(key.to_string()).or_default();
            *count += 1;
            Ok(ClientRateLimitInfo::new(*count, Utc::now()))
        }

        async fn decrement(&self, key: &str) -> Result<(), StoreError> {
            if let Some(count) = self.hits.lock().unwrap().get_mut(key) {
                *count = count.saturating_sub(1);
            }
            Ok(())
        }

        async fn reset_key(&self, key: &str) -> Result<(), StoreError> {
            self.hits.lock().unwrap().remove(key);
            Ok(())
        }

        async fn reset_all(&self) -> Result<(), StoreError> {
            self.hits.lock().unwrap().clear();
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<ClientRateLimitInfo>, StoreError> {
            Ok(self
                .hits
                .lock()
                .unwrap()
                .get(key)
                .map(|count| ClientRateLimitInfo {
                    total_hits: *count,
                    reset_time: None,
                }))
        }
    }

    async fn allow<S: RateLimitStore>(store: &S, key: &str, limit: u32) -> bool {
        let info = store.increment(key).await.unwrap();
        !info.exceeds(limit)
    }

    #[tokio::test]
    async fn test_generic_middleware_usage() {
        let store = CountingStore::default();
        assert!(allow(&store, "a", 2).await);
        assert!(allow(&store, "a", 2).await);
        assert!(!allow(&store, "a", 2).await);

        store.decrement("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().unwrap().total_hits, 2);

        store.reset_key("a").await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());

        assert!(allow(&store, "b", 1).await);
        store.reset_all().await.unwrap();
        assert!(store.get("b").await.unwrap().is_none());
    }
}
