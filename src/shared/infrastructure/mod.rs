/// Shared infrastructure concerns
///
/// Infrastructure used by more than one module (the cache database pool).
pub mod database;
pub mod database_state;

// Re-exports for convenience
pub use database::Database;
pub use database_state::DatabaseState;
