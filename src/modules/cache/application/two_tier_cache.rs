use crate::modules::cache::domain::{now_ms, CacheEntry, CacheField, PosterCacheRepository};
use crate::modules::cache::infrastructure::MemoryUrlCache;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::LogContext;
use std::sync::Arc;

/// Persistent store in front of the in-memory URL cache.
///
/// The store is authoritative and keyed by video id; memory is keyed by
/// lookup key. Store failures are logged and read as misses, never surfaced.
pub struct TwoTierCache {
    store: Option<Arc<dyn PosterCacheRepository>>,
    memory: MemoryUrlCache,
}

impl TwoTierCache {
    pub fn new(store: Option<Arc<dyn PosterCacheRepository>>) -> Self {
        Self {
            store,
            memory: MemoryUrlCache::new(),
        }
    }

    /// Memory-only cache, used when the database cannot be opened
    pub fn memory_only() -> Self {
        Self::new(None)
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Find a usable entry (one with a poster), store first
    pub fn lookup(&self, video_id: Option<&str>, lookup_key: &str) -> Option<CacheEntry> {
        if let Some(entry) = video_id.and_then(|id| self.lookup_store(id)) {
            return Some(entry);
        }

        match self.memory.poster(lookup_key) {
            Some(poster) => {
                LogContext::cache_lookup("memory", lookup_key, true);
                Some(CacheEntry {
                    poster_url: Some(poster),
                    backdrop_url: self.memory.backdrop(lookup_key),
                    genre: None,
                    timestamp_ms: now_ms(),
                })
            }
            None => {
                LogContext::cache_lookup("memory", lookup_key, false);
                None
            }
        }
    }

    fn lookup_store(&self, video_id: &str) -> Option<CacheEntry> {
        let store = self.store.as_ref()?;
        swallow(store.get_entry(video_id), "read cache entry")
            .flatten()
            .filter(CacheEntry::has_poster)
    }

    /// Remember URLs in memory under the lookup key
    pub fn remember_urls(&self, lookup_key: &str, poster_url: &str, backdrop_url: Option<&str>) {
        self.memory.put_poster(lookup_key, poster_url);
        if let Some(backdrop) = backdrop_url {
            self.memory.put_backdrop(lookup_key, backdrop);
        }
    }

    /// Upsert URLs into the persistent store. Blocks on the database.
    pub fn persist_urls(&self, video_id: &str, poster_url: Option<&str>, backdrop_url: Option<&str>) {
        if let Some(store) = &self.store {
            swallow(store.put(video_id, poster_url, backdrop_url), "store artwork urls");
        }
    }

    /// Memory and store in one call
    pub fn record_urls(
        &self,
        video_id: Option<&str>,
        lookup_key: &str,
        poster_url: &str,
        backdrop_url: Option<&str>,
    ) {
        self.remember_urls(lookup_key, poster_url, backdrop_url);
        if let Some(id) = video_id {
            self.persist_urls(id, Some(poster_url), backdrop_url);
        }
    }

    pub fn persist_genre(&self, video_id: &str, genre: &str) {
        if let Some(store) = &self.store {
            swallow(store.put_genre(video_id, genre), "store genre");
        }
    }

    pub fn stored_field(&self, video_id: &str, field: CacheField) -> Option<String> {
        let store = self.store.as_ref()?;
        swallow(store.get_field(video_id, field), "read cache field").flatten()
    }

    pub fn memory(&self) -> &MemoryUrlCache {
        &self.memory
    }
}

fn swallow<T>(result: AppResult<T>, context: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            LogContext::error_with_context(&e, &format!("Cache store failed to {}", context));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::AppError;
    use std::sync::Mutex;

    /// Store that fails every call
    struct BrokenStore;

    impl PosterCacheRepository for BrokenStore {
        fn get_entry(&self, _: &str) -> AppResult<Option<CacheEntry>> {
            Err(AppError::StoreError("disk I/O error".to_string()))
        }
        fn get_field(&self, _: &str, _: CacheField) -> AppResult<Option<String>> {
            Err(AppError::StoreError("disk I/O error".to_string()))
        }
        fn put(&self, _: &str, _: Option<&str>, _: Option<&str>) -> AppResult<()> {
            Err(AppError::StoreError("disk I/O error".to_string()))
        }
        fn put_genre(&self, _: &str, _: &str) -> AppResult<()> {
            Err(AppError::StoreError("disk I/O error".to_string()))
        }
        fn purge_expired(&self) -> AppResult<usize> {
            Err(AppError::StoreError("disk I/O error".to_string()))
        }
    }

    /// Store with a single fixed entry that records writes
    #[derive(Default)]
    struct FixedStore {
        entry: Option<CacheEntry>,
        writes: Mutex<Vec<String>>,
    }

    impl PosterCacheRepository for FixedStore {
        fn get_entry(&self, _: &str) -> AppResult<Option<CacheEntry>> {
            Ok(self.entry.clone())
        }
        fn get_field(&self, _: &str, _: CacheField) -> AppResult<Option<String>> {
            Ok(None)
        }
        fn put(&self, id: &str, _: Option<&str>, _: Option<&str>) -> AppResult<()> {
            self.writes.lock().unwrap().push(id.to_string());
            Ok(())
        }
        fn put_genre(&self, _: &str, _: &str) -> AppResult<()> {
            Ok(())
        }
        fn purge_expired(&self) -> AppResult<usize> {
            Ok(0)
        }
    }

    #[test]
    fn test_store_errors_read_as_miss() {
        let cache = TwoTierCache::new(Some(Arc::new(BrokenStore)));
        assert!(cache.lookup(Some("vid"), "heat").is_none());

        cache.record_urls(Some("vid"), "heat", "https://img/p.jpg", None);
        let entry = cache.lookup(Some("vid"), "heat").unwrap();
        assert_eq!(entry.poster_url.as_deref(), Some("https://img/p.jpg"));
    }

    #[test]
    fn test_store_entry_wins_over_memory() {
        let store = FixedStore {
            entry: Some(CacheEntry {
                poster_url: Some("https://img/store.jpg".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cache = TwoTierCache::new(Some(Arc::new(store)));
        cache.remember_urls("heat", "https://img/memory.jpg", None);

        let entry = cache.lookup(Some("vid"), "heat").unwrap();
        assert_eq!(entry.poster_url.as_deref(), Some("https://img/store.jpg"));

        let entry = cache.lookup(None, "heat").unwrap();
        assert_eq!(entry.poster_url.as_deref(), Some("https://img/memory.jpg"));
    }

    #[test]
    fn test_backdrop_only_store_row_is_not_a_hit() {
        let store = FixedStore {
            entry: Some(CacheEntry {
                backdrop_url: Some("https://img/b.jpg".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cache = TwoTierCache::new(Some(Arc::new(store)));
        assert!(cache.lookup(Some("vid"), "heat").is_none());
    }

    #[test]
    fn test_writes_without_video_id_stay_in_memory() {
        let store = Arc::new(FixedStore::default());
        let cache = TwoTierCache::new(Some(store.clone()));

        cache.record_urls(None, "heat", "https://img/p.jpg", None);
        assert!(store.writes.lock().unwrap().is_empty());

        cache.record_urls(Some("vid"), "heat", "https://img/p.jpg", Some("https://img/b.jpg"));
        assert_eq!(*store.writes.lock().unwrap(), vec!["vid".to_string()]);
        assert_eq!(cache.memory().backdrop("heat").as_deref(), Some("https://img/b.jpg"));
    }
}
