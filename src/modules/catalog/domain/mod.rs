pub mod entities;
pub mod repositories;
pub mod services;

// Re-exports for easy access
pub use entities::*;
pub use repositories::CatalogClient;
pub use services::select_certification;
