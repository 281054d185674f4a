/// Persistent poster cache against a real SQLite file
mod utils;

use diesel::connection::SimpleConnection;
use marquee::modules::cache::domain::now_ms;
use marquee::modules::cache::{CacheField, PosterCacheRepository};
use marquee::shared::Database;
use marquee::{SqliteCacheRepository, TwoTierCache};
use std::sync::Arc;
use std::time::Duration;
use utils::helpers::temp_store;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

// ================================================================================================
// UPSERT SEMANTICS
// ================================================================================================

#[test]
fn per_field_reads_after_partial_writes() {
    let (_dir, store) = temp_store();

    tokio_test::assert_ok!(store.put("vid", Some("https://img/p.jpg"), None));
    assert_eq!(store.get_poster_url("vid").unwrap().as_deref(), Some("https://img/p.jpg"));
    assert!(store.get_backdrop_url("vid").unwrap().is_none());

    tokio_test::assert_ok!(store.put("vid", None, Some("https://img/b.jpg")));
    assert_eq!(store.get_poster_url("vid").unwrap().as_deref(), Some("https://img/p.jpg"));
    assert_eq!(store.get_backdrop_url("vid").unwrap().as_deref(), Some("https://img/b.jpg"));

    store.put_genre("vid", "Crime").unwrap();
    let entry = store.get_entry("vid").unwrap().unwrap();
    assert_eq!(entry.genre.as_deref(), Some("Crime"));
    assert_eq!(store.get_genre("vid").unwrap().as_deref(), Some("Crime"));
}

#[test]
fn empty_put_is_a_noop() {
    let (_dir, store) = temp_store();
    store.put("vid", None, None).unwrap();
    assert!(store.get_entry("vid").unwrap().is_none());
    assert_eq!(store.row_counts().unwrap(), (0, 0));
}

// ================================================================================================
// EXPIRY
// ================================================================================================

#[test]
fn stale_rows_miss_until_purged() {
    let (_dir, store) = temp_store();
    let stale = now_ms() - 25 * HOUR_MS;

    store.put_at("old", Some("https://img/old.jpg"), None, stale).unwrap();
    store.put_genre_at("old", "Drama", stale).unwrap();
    store.put("new", Some("https://img/new.jpg"), None).unwrap();

    assert!(store.get_entry("old").unwrap().is_none());
    assert!(store.get_field("old", CacheField::Genre).unwrap().is_none());
    assert_eq!(store.row_counts().unwrap(), (2, 1));

    assert_eq!(store.purge_expired().unwrap(), 2);
    assert_eq!(store.row_counts().unwrap(), (1, 0));
    assert!(store.get_entry("new").unwrap().is_some());
}

#[test]
fn reopening_purges_expired_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tmdb_cache.db");

    {
        let db = Arc::new(Database::open(&path).unwrap());
        let store = SqliteCacheRepository::initialize(db, DAY).unwrap();
        store
            .put_at("old", Some("https://img/old.jpg"), None, now_ms() - 30 * HOUR_MS)
            .unwrap();
        store.put("fresh", Some("https://img/fresh.jpg"), None).unwrap();
    }

    let db = Arc::new(Database::open(&path).unwrap());
    let store = SqliteCacheRepository::initialize(db, DAY).unwrap();
    assert_eq!(store.row_counts().unwrap(), (1, 0));
    assert!(store.get_entry("fresh").unwrap().is_some());
}

// ================================================================================================
// SCHEMA UPGRADE
// ================================================================================================

#[test]
fn upgrades_store_without_backdrop_column() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::open(dir.path().join("legacy.db")).unwrap());

    {
        let mut conn = db.get_connection().unwrap();
        conn.batch_execute(
            "CREATE TABLE poster_cache (
                video_id TEXT PRIMARY KEY NOT NULL,
                poster_url TEXT,
                timestamp INTEGER NOT NULL
            );",
        )
        .unwrap();
    }

    let store = SqliteCacheRepository::initialize(Arc::clone(&db), DAY).unwrap();
    store.put("vid", Some("https://img/p.jpg"), Some("https://img/b.jpg")).unwrap();
    assert_eq!(store.get_backdrop_url("vid").unwrap().as_deref(), Some("https://img/b.jpg"));

    // Second start on the upgraded file
    let store = SqliteCacheRepository::initialize(db, DAY).unwrap();
    assert!(store.get_entry("vid").unwrap().is_some());
}

// ================================================================================================
// TWO-TIER LOOKUP
// ================================================================================================

#[test]
fn two_tier_prefers_store_by_video_id() {
    let (_dir, store) = temp_store();
    store.put("vid", Some("https://img/store.jpg"), None).unwrap();

    let cache = TwoTierCache::new(Some(store.clone()));
    cache.remember_urls("heat", "https://img/memory.jpg", None);

    let hit = cache.lookup(Some("vid"), "heat").unwrap();
    assert_eq!(hit.poster_url.as_deref(), Some("https://img/store.jpg"));

    let hit = cache.lookup(Some("other"), "heat").unwrap();
    assert_eq!(hit.poster_url.as_deref(), Some("https://img/memory.jpg"));

    assert!(cache.lookup(Some("other"), "alien").is_none());
}

#[test]
fn two_tier_record_writes_both_tiers() {
    let (_dir, store) = temp_store();
    let cache = TwoTierCache::new(Some(store.clone()));

    cache.record_urls(Some("vid"), "heat", "https://img/p.jpg", Some("https://img/b.jpg"));
    cache.persist_genre("vid", "Crime");

    assert_eq!(cache.memory().poster("heat").as_deref(), Some("https://img/p.jpg"));
    assert_eq!(store.get_backdrop_url("vid").unwrap().as_deref(), Some("https://img/b.jpg"));
    assert_eq!(
        cache.stored_field("vid", CacheField::Genre).as_deref(),
        Some("Crime")
    );
}
