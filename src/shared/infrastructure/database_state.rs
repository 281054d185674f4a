use super::database::Database;
use crate::shared::errors::AppError;
use std::path::Path;
use std::sync::Arc;

/// Represents the state of the cache database
/// This allows the resolver to keep serving lookups (as cache misses)
/// when the database file cannot be opened
#[derive(Debug, Clone)]
pub enum DatabaseState {
    /// Database is available and ready for use
    Available(Arc<Database>),
    /// Database is unavailable with the reason for failure
    Unavailable { reason: String },
}

impl DatabaseState {
    /// Create a new database state by attempting to open the database
    pub fn initialize(path: impl AsRef<Path>) -> Self {
        match Database::open(path) {
            Ok(db) => DatabaseState::Available(Arc::new(db)),
            Err(e) => {
                log::error!("Cache database initialization failed: {}", e);
                log::warn!("Continuing without persistent cache - every lookup will miss");
                DatabaseState::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DatabaseState::Available(_))
    }

    /// Get the database if available, otherwise return an error
    pub fn get_database(&self) -> Result<Arc<Database>, AppError> {
        match self {
            DatabaseState::Available(db) => Ok(Arc::clone(db)),
            DatabaseState::Unavailable { reason } => Err(AppError::StoreError(format!(
                "Cache database unavailable: {}",
                reason
            ))),
        }
    }
}
