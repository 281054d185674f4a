pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::TwoTierCache;
pub use domain::{CacheEntry, CacheField, PosterCacheRepository};
pub use infrastructure::{MemoryUrlCache, SqliteCacheRepository};
