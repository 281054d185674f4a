use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cached artwork and genre for one video
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheEntry {
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genre: Option<String>,
    /// Milliseconds since the Unix epoch of the last write
    pub timestamp_ms: i64,
}

impl CacheEntry {
    pub fn has_poster(&self) -> bool {
        self.poster_url.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        is_fresh(self.timestamp_ms, now_ms, ttl)
    }
}

/// Individually readable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheField {
    PosterUrl,
    BackdropUrl,
    Genre,
}

/// A row is fresh while `now - timestamp < ttl`
pub fn is_fresh(timestamp_ms: i64, now_ms: i64, ttl: Duration) -> bool {
    now_ms.saturating_sub(timestamp_ms) < ttl_ms(ttl)
}

pub fn ttl_ms(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
