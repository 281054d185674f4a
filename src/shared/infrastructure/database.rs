use crate::log_info;
use crate::shared::errors::AppError;
use crate::shared::utils::logger::LogContext;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use std::path::Path;
use std::time::Duration;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Pragmas applied to every connection handed out by the pool
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

/// Pooled SQLite handle. Every store operation checks out a connection and
/// returns it on drop, so reads from the caller and writes from the worker
/// interleave safely.
#[derive(Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let database_url = Self::validated_database_url(path)?;

        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = r2d2::Pool::builder()
            // SQLite serializes writers anyway; a small pool keeps file handles low
            .max_size(4)
            .min_idle(Some(1))
            .connection_timeout(Duration::from_secs(10))
            .idle_timeout(Some(Duration::from_secs(300)))
            .connection_customizer(Box::new(SqlitePragmas {
                busy_timeout: Duration::from_secs(5),
            }))
            .build(manager)
            .map_err(|e| AppError::StoreError(format!("Failed to create connection pool: {}", e)))?;

        log_info!(
            "Cache database opened at {} (pool max_size: {})",
            path.display(),
            pool.max_size()
        );

        Ok(Self { pool })
    }

    fn validated_database_url(path: &Path) -> Result<String, AppError> {
        let url = path.to_str().ok_or_else(|| {
            AppError::ConfigError(format!(
                "Cache database path is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        if url.trim().is_empty() {
            return Err(AppError::ConfigError(
                "Cache database path cannot be empty".to_string(),
            ));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::StoreError(format!(
                        "Failed to create cache directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(url.to_string())
    }

    pub fn get_connection(&self) -> Result<DbConnection, AppError> {
        let start = std::time::Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let duration = start.elapsed().as_millis() as u64;
                if duration > 100 {
                    let info = format!("slow, {}", self.pool_status());
                    LogContext::performance_metric("db_connection_acquire", duration, Some(&info));
                }
                Ok(conn)
            }
            Err(e) => {
                LogContext::error_with_context(
                    &e,
                    "Failed to acquire cache database connection from pool",
                );
                Err(AppError::from(e))
            }
        }
    }

    /// Snapshot of pool occupancy, reported alongside slow checkouts
    pub fn pool_status(&self) -> PoolStatus {
        let state = self.pool.state();
        PoolStatus {
            connections: state.connections,
            idle_connections: state.idle_connections,
            max_size: self.pool.max_size(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub connections: u32,
    pub idle_connections: u32,
    pub max_size: u32,
}

impl std::fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} connections, {} idle",
            self.connections, self.max_size, self.idle_connections
        )
    }
}
