pub mod http_client;
pub mod tmdb;

// Re-export commonly used types
pub use http_client::{RateLimitClient, RetryPolicy};
pub use tmdb::TmdbClient;
