/// SQLite implementation of PosterCacheRepository
///
/// Each call checks out its own pooled connection. Upserts run inside an
/// immediate transaction so the read-modify-write is atomic against the
/// worker writing the same row.
use crate::modules::cache::domain::entities::{is_fresh, now_ms, ttl_ms, CacheEntry, CacheField};
use crate::modules::cache::domain::repositories::PosterCacheRepository;
use crate::modules::cache::infrastructure::models::{
    GenreCacheRow, NewGenreCacheRow, NewPosterCacheRow, PosterCacheChanges, PosterCacheRow,
};
use crate::schema::{genre_cache, poster_cache};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::{Database, DbConnection};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_info, log_warn};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use std::sync::Arc;
use std::time::Duration;

/// Layout version written to `PRAGMA user_version`
pub const SCHEMA_VERSION: i32 = 2;

const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS poster_cache (
        video_id TEXT PRIMARY KEY NOT NULL,
        poster_url TEXT,
        backdrop_url TEXT,
        timestamp INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_poster_cache_timestamp ON poster_cache (timestamp);
    CREATE TABLE IF NOT EXISTS genre_cache (
        video_id TEXT PRIMARY KEY NOT NULL,
        genre TEXT,
        timestamp INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_genre_cache_timestamp ON genre_cache (timestamp);
";

/// Version 1 stores had no backdrop column
const ADD_BACKDROP_COLUMN: &str = "ALTER TABLE poster_cache ADD COLUMN backdrop_url TEXT";

#[derive(QueryableByName)]
struct UserVersion {
    #[diesel(sql_type = Integer)]
    user_version: i32,
}

pub struct SqliteCacheRepository {
    db: Arc<Database>,
    ttl: Duration,
}

impl SqliteCacheRepository {
    /// Bring the schema up to date and drop expired rows.
    ///
    /// Purging happens here and nowhere else; reads only filter.
    pub fn initialize(db: Arc<Database>, ttl: Duration) -> AppResult<Self> {
        let repo = Self { db, ttl };

        {
            let mut conn = repo.get_conn()?;
            ensure_schema(&mut conn)?;
        }

        match repo.purge_expired() {
            Ok(0) => log_debug!("Cache cleanup: no expired entries"),
            Ok(removed) => log_info!("Cache cleanup: removed {} expired entries", removed),
            Err(e) => log_warn!("Cache cleanup failed: {}", e),
        }

        Ok(repo)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn get_conn(&self) -> AppResult<DbConnection> {
        self.db.get_connection()
    }

    fn find_poster_row(
        &self,
        conn: &mut DbConnection,
        video_id: &str,
    ) -> AppResult<Option<PosterCacheRow>> {
        poster_cache::table
            .find(video_id)
            .select(PosterCacheRow::as_select())
            .first(conn)
            .optional()
            .map_err(|e| AppError::StoreError(format!("Failed to read poster cache: {}", e)))
    }

    fn find_genre_row(
        &self,
        conn: &mut DbConnection,
        video_id: &str,
    ) -> AppResult<Option<GenreCacheRow>> {
        genre_cache::table
            .find(video_id)
            .select(GenreCacheRow::as_select())
            .first(conn)
            .optional()
            .map_err(|e| AppError::StoreError(format!("Failed to read genre cache: {}", e)))
    }

    /// Upsert with an explicit write time (backfills and tests)
    pub fn put_at(
        &self,
        video_id: &str,
        poster_url: Option<&str>,
        backdrop_url: Option<&str>,
        timestamp_ms: i64,
    ) -> AppResult<()> {
        if poster_url.is_none() && backdrop_url.is_none() {
            return Ok(());
        }

        let timer = TimedOperation::new("poster_cache upsert");
        let mut conn = self.get_conn()?;

        conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            let exists = poster_cache::table
                .find(video_id)
                .select(poster_cache::video_id)
                .first::<String>(conn)
                .optional()?
                .is_some();

            if exists {
                diesel::update(poster_cache::table.find(video_id))
                    .set(&PosterCacheChanges {
                        poster_url,
                        backdrop_url,
                        cached_at: timestamp_ms,
                    })
                    .execute(conn)?;
            } else {
                diesel::insert_into(poster_cache::table)
                    .values(&NewPosterCacheRow {
                        video_id,
                        poster_url,
                        backdrop_url,
                        cached_at: timestamp_ms,
                    })
                    .execute(conn)?;
            }
            Ok(())
        })
        .map_err(|e| AppError::StoreError(format!("Failed to store cache row for {}: {}", video_id, e)))?;

        LogContext::store_operation("upsert", "poster_cache", Some(timer.elapsed_ms()));
        Ok(())
    }

    /// Genre write with an explicit write time
    pub fn put_genre_at(&self, video_id: &str, genre: &str, timestamp_ms: i64) -> AppResult<()> {
        let mut conn = self.get_conn()?;

        diesel::replace_into(genre_cache::table)
            .values(&NewGenreCacheRow {
                video_id,
                genre,
                cached_at: timestamp_ms,
            })
            .execute(&mut conn)
            .map_err(|e| AppError::StoreError(format!("Failed to store genre for {}: {}", video_id, e)))?;

        LogContext::store_operation("replace", "genre_cache", None);
        Ok(())
    }

    /// Row count per table, stale rows included
    pub fn row_counts(&self) -> AppResult<(i64, i64)> {
        let mut conn = self.get_conn()?;
        let posters = poster_cache::table.count().get_result(&mut conn)?;
        let genres = genre_cache::table.count().get_result(&mut conn)?;
        Ok((posters, genres))
    }
}

impl PosterCacheRepository for SqliteCacheRepository {
    fn get_entry(&self, video_id: &str) -> AppResult<Option<CacheEntry>> {
        let mut conn = self.get_conn()?;
        let now = now_ms();

        let Some(row) = self.find_poster_row(&mut conn, video_id)? else {
            LogContext::cache_lookup("store", video_id, false);
            return Ok(None);
        };

        if !is_fresh(row.cached_at, now, self.ttl) {
            log_debug!(
                "Cache expired for {} (age: {}s)",
                video_id,
                (now - row.cached_at) / 1000
            );
            return Ok(None);
        }

        let genre = self
            .find_genre_row(&mut conn, video_id)?
            .filter(|g| is_fresh(g.cached_at, now, self.ttl))
            .and_then(|g| g.genre);

        LogContext::cache_lookup("store", video_id, true);
        Ok(Some(CacheEntry {
            poster_url: row.poster_url,
            backdrop_url: row.backdrop_url,
            genre,
            timestamp_ms: row.cached_at,
        }))
    }

    fn get_field(&self, video_id: &str, field: CacheField) -> AppResult<Option<String>> {
        let mut conn = self.get_conn()?;
        let now = now_ms();

        let value = match field {
            CacheField::PosterUrl | CacheField::BackdropUrl => self
                .find_poster_row(&mut conn, video_id)?
                .filter(|row| is_fresh(row.cached_at, now, self.ttl))
                .and_then(|row| match field {
                    CacheField::PosterUrl => row.poster_url,
                    _ => row.backdrop_url,
                }),
            CacheField::Genre => self
                .find_genre_row(&mut conn, video_id)?
                .filter(|row| is_fresh(row.cached_at, now, self.ttl))
                .and_then(|row| row.genre),
        };

        Ok(value.filter(|v| !v.is_empty()))
    }

    fn put(
        &self,
        video_id: &str,
        poster_url: Option<&str>,
        backdrop_url: Option<&str>,
    ) -> AppResult<()> {
        self.put_at(video_id, poster_url, backdrop_url, now_ms())
    }

    fn put_genre(&self, video_id: &str, genre: &str) -> AppResult<()> {
        self.put_genre_at(video_id, genre, now_ms())
    }

    fn purge_expired(&self) -> AppResult<usize> {
        let mut conn = self.get_conn()?;
        let threshold = now_ms().saturating_sub(ttl_ms(self.ttl));

        let posters = diesel::delete(poster_cache::table.filter(poster_cache::cached_at.lt(threshold)))
            .execute(&mut conn)?;
        let genres = diesel::delete(genre_cache::table.filter(genre_cache::cached_at.lt(threshold)))
            .execute(&mut conn)?;

        Ok(posters + genres)
    }
}

/// Create tables and apply additive migrations. Safe to run on every start.
pub fn ensure_schema(conn: &mut DbConnection) -> AppResult<()> {
    conn.batch_execute(CREATE_TABLES)
        .map_err(|e| AppError::SchemaError(format!("Failed to create cache tables: {}", e)))?;

    let version = diesel::sql_query("PRAGMA user_version")
        .get_result::<UserVersion>(conn)
        .map(|v| v.user_version)
        .map_err(|e| AppError::SchemaError(format!("Failed to read schema version: {}", e)))?;

    if version < SCHEMA_VERSION {
        match add_column(conn, ADD_BACKDROP_COLUMN) {
            Ok(()) => log_info!("Cache schema: added backdrop_url column"),
            Err(AppError::SchemaError(msg)) => {
                log_debug!("Cache schema: backdrop_url already present ({})", msg)
            }
            Err(e) => return Err(e),
        }

        conn.batch_execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
            .map_err(|e| AppError::SchemaError(format!("Failed to write schema version: {}", e)))?;
    }

    Ok(())
}

/// Run an `ADD COLUMN`. A duplicate column comes back as `SchemaError` so the
/// caller can treat it as already applied; anything else is a `StoreError`.
pub fn add_column(conn: &mut DbConnection, ddl: &str) -> AppResult<()> {
    match conn.batch_execute(ddl) {
        Ok(()) => Ok(()),
        Err(e) if e.to_string().contains("duplicate column") => {
            Err(AppError::SchemaError(e.to_string()))
        }
        Err(e) => Err(AppError::StoreError(format!("Schema migration failed: {}", e))),
    }
}
