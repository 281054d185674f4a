pub mod entities;
pub mod repositories;

pub use entities::{now_ms, CacheEntry, CacheField};
pub use repositories::PosterCacheRepository;
