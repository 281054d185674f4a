use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Per lookup-key request counters.
///
/// Every scheduled lookup takes a token; only the holder of the newest token
/// for a key may apply results. Older tokens go stale silently.
///
/// Values come from one tracker-wide sequence, so they increase per key even
/// after a finished key's counter has been released and is later recreated.
#[derive(Debug, Clone, Default)]
pub struct GenerationTracker {
    counters: Arc<DashMap<String, u64>>,
    sequence: Arc<AtomicU64>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the counter for `key` and capture the new value
    pub fn next(&self, key: &str) -> GenerationToken {
        let mut counter = self.counters.entry(key.to_string()).or_insert(0);
        let generation = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        *counter = generation;
        drop(counter);

        GenerationToken {
            key: key.to_string(),
            generation,
            counters: Arc::clone(&self.counters),
        }
    }

    pub fn current(&self, key: &str) -> u64 {
        self.counters.get(key).map(|c| *c.value()).unwrap_or(0)
    }

    /// Number of keys with a live counter
    pub fn tracked_keys(&self) -> usize {
        self.counters.len()
    }
}

/// Immutable capture of a key's generation at scheduling time
#[derive(Debug, Clone)]
pub struct GenerationToken {
    key: String,
    generation: u64,
    counters: Arc<DashMap<String, u64>>,
}

impl GenerationToken {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.counters
            .get(&self.key)
            .is_some_and(|live| *live.value() == self.generation)
    }

    /// Drop the key's counter if this token is still the newest one.
    ///
    /// Called once the lookup is terminal. A newer request keeps the counter
    /// alive; stale tokens stay stale because their values are never reissued.
    pub fn release(&self) -> bool {
        self.counters
            .remove_if(&self.key, |_, live| *live == self.generation)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_token_supersedes_older() {
        let tracker = GenerationTracker::new();
        let first = tracker.next("heat");
        assert!(first.is_current());

        let second = tracker.next("heat");
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(second.generation(), 2);
        assert_eq!(tracker.current("heat"), 2);
    }

    #[test]
    fn test_keys_are_independent() {
        let tracker = GenerationTracker::new();
        let heat = tracker.next("heat");
        let alien = tracker.next("alien");
        tracker.next("alien");

        assert!(heat.is_current());
        assert!(!alien.is_current());
        assert_eq!(tracker.current("unknown"), 0);
    }

    #[test]
    fn test_release_drops_counter_of_finished_lookup() {
        let tracker = GenerationTracker::new();
        let token = tracker.next("heat");

        assert!(token.release());
        assert_eq!(tracker.tracked_keys(), 0);
        assert!(!token.is_current());
        assert!(!token.release());
    }

    #[test]
    fn test_release_keeps_newer_request_alive() {
        let tracker = GenerationTracker::new();
        let older = tracker.next("heat");
        let newer = tracker.next("heat");

        assert!(!older.release());
        assert!(newer.is_current());
        assert_eq!(tracker.tracked_keys(), 1);
    }

    #[test]
    fn test_stale_token_stays_stale_after_key_is_recreated() {
        let tracker = GenerationTracker::new();
        let stale = tracker.next("heat");
        let finished = tracker.next("heat");
        assert!(finished.release());

        let fresh = tracker.next("heat");
        assert!(fresh.generation() > finished.generation());
        assert!(fresh.is_current());
        assert!(!stale.is_current());
        assert!(!finished.is_current());
    }

    #[tokio::test]
    async fn test_concurrent_bumps_are_not_lost() {
        let tracker = GenerationTracker::new();
        let tasks = (0..16).map(|_| {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.next("heat").generation() })
        });

        let mut seen: Vec<u64> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        seen.sort_unstable();

        assert_eq!(seen, (1..=16).collect::<Vec<_>>());
        assert_eq!(tracker.current("heat"), 16);
    }
}
