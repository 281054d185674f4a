use dashmap::DashMap;

/// Process-lifetime URL cache keyed by lookup key (normalized title)
#[derive(Debug, Default)]
pub struct MemoryUrlCache {
    posters: DashMap<String, String>,
    backdrops: DashMap<String, String>,
}

impl MemoryUrlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poster(&self, key: &str) -> Option<String> {
        self.posters.get(key).map(|v| v.value().clone())
    }

    pub fn backdrop(&self, key: &str) -> Option<String> {
        self.backdrops.get(key).map(|v| v.value().clone())
    }

    pub fn put_poster(&self, key: &str, url: &str) {
        self.posters.insert(key.to_string(), url.to_string());
    }

    pub fn put_backdrop(&self, key: &str, url: &str) {
        self.backdrops.insert(key.to_string(), url.to_string());
    }

    pub fn len(&self) -> usize {
        self.posters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posters.is_empty()
    }

    pub fn clear(&self) {
        self.posters.clear();
        self.backdrops.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poster_and_backdrop_are_independent() {
        let cache = MemoryUrlCache::new();
        cache.put_backdrop("heat", "https://img/b.jpg");

        assert!(cache.poster("heat").is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.backdrop("heat").as_deref(), Some("https://img/b.jpg"));

        cache.put_poster("heat", "https://img/p.jpg");
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.backdrop("heat").is_none());
    }
}
