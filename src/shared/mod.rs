// Shared kernel: concerns used by every module

pub mod config; // Resolver configuration
pub mod errors; // Shared error types
pub mod infrastructure; // Shared infrastructure (database pool)
pub mod utils; // Shared utilities (logging)

// Re-exports for convenience
pub use config::ResolverConfig;
pub use errors::{AppError, AppResult};
pub use infrastructure::database::Database;
pub use infrastructure::database_state::DatabaseState;
