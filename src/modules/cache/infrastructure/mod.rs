pub mod memory_cache;
pub mod models;
pub mod sqlite_cache_repository;

pub use memory_cache::MemoryUrlCache;
pub use sqlite_cache_repository::SqliteCacheRepository;
