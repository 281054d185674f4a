/// Test helper functions and service builders
use super::fakes::FakeCatalog;
use marquee::modules::cache::PosterCacheRepository;
use marquee::shared::Database;
use marquee::{CallbackEvent, CatalogClient, MetadataService, ResolverConfig, SqliteCacheRepository};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

pub const DEBOUNCE: Duration = Duration::from_millis(30);
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn test_config() -> ResolverConfig {
    let mut config = ResolverConfig::new("test-key").without_pacing();
    config.debounce_delay = DEBOUNCE;
    config
}

/// SQLite cache in a temporary directory; keep the `TempDir` alive
pub fn temp_store() -> (TempDir, Arc<SqliteCacheRepository>) {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Database::open(dir.path().join("tmdb_cache.db")).unwrap());
    let repo = SqliteCacheRepository::initialize(db, Duration::from_secs(24 * 60 * 60)).unwrap();
    (dir, Arc::new(repo))
}

pub struct TestServices {
    pub service: MetadataService,
    pub catalog: Arc<FakeCatalog>,
    pub fallback: Option<Arc<FakeCatalog>>,
}

/// Build a service over fakes, optionally with a persistent store
pub fn build_service(
    catalog: FakeCatalog,
    fallback: Option<FakeCatalog>,
    store: Option<Arc<SqliteCacheRepository>>,
) -> TestServices {
    let catalog = Arc::new(catalog);
    let fallback = fallback.map(Arc::new);
    let service = MetadataService::from_parts(
        &test_config(),
        Arc::clone(&catalog) as Arc<dyn CatalogClient>,
        fallback
            .as_ref()
            .map(|f| Arc::clone(f) as Arc<dyn CatalogClient>),
        store.map(|s| s as Arc<dyn PosterCacheRepository>),
    )
    .unwrap();

    TestServices {
        service,
        catalog,
        fallback,
    }
}

/// Collect callback events up to and including the terminal one
pub async fn collect_until_terminal(rx: &mut UnboundedReceiver<CallbackEvent>) -> Vec<CallbackEvent> {
    let mut events = Vec::new();
    loop {
        let event = tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
            .await
            .expect("timed out waiting for callback")
            .expect("callback channel closed");
        let terminal = event.is_terminal();
        events.push(event);
        if terminal {
            return events;
        }
    }
}

/// Wait until every scheduled lookup has released its generation counter
pub async fn wait_until_idle(service: &MetadataService) {
    tokio::time::timeout(EVENT_TIMEOUT, async {
        while service.pending_lookups() > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("lookups still pending");
}

/// Assert the receiver got nothing
pub fn assert_silent(rx: &mut UnboundedReceiver<CallbackEvent>) {
    if let Ok(event) = rx.try_recv() {
        panic!("superseded request received {:?}", event);
    }
}
