use crate::modules::cache::{CacheEntry, CacheField, PosterCacheRepository, SqliteCacheRepository, TwoTierCache};
use crate::modules::catalog::domain::{CatalogClient, DetailedMovieInfo, ImageUrls};
use crate::modules::catalog::TmdbClient;
use crate::modules::matching::lookup_key;
use crate::modules::registry::MetadataRegistry;
use crate::modules::resolver::application::{Debouncer, FetchJob, FetchOrchestrator, StageDelays};
use crate::modules::resolver::domain::{
    GenerationTracker, PosterCallback, PosterRequest, Resolution,
};
use crate::modules::resolver::worker::FetchWorker;
use crate::shared::config::ResolverConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use crate::shared::DatabaseState;
use crate::{log_debug, log_info, log_warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const POPULAR_PAGES: u32 = 20;

/// Entry point for poster and metadata lookups.
///
/// Owns the caches, the registry and the fetch worker. Build it with
/// [`MetadataService::start`] inside a tokio runtime and call
/// [`MetadataService::shutdown`] when done.
pub struct MetadataService {
    catalog: Arc<dyn CatalogClient>,
    images: ImageUrls,
    cache: Arc<TwoTierCache>,
    registry: Arc<MetadataRegistry>,
    generations: GenerationTracker,
    debouncer: Debouncer,
    worker: Arc<FetchWorker>,
    worker_handle: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl MetadataService {
    /// Open the cache database, build the TMDB clients and start the worker
    pub fn start(config: ResolverConfig) -> AppResult<Self> {
        config.validate()?;

        let store: Option<Arc<dyn PosterCacheRepository>> =
            match DatabaseState::initialize(&config.database_path).get_database() {
                Ok(db) => match SqliteCacheRepository::initialize(db, config.cache_ttl) {
                    Ok(repo) => Some(Arc::new(repo)),
                    Err(e) => {
                        LogContext::error_with_context(&e, "Cache schema setup failed");
                        log_warn!("Continuing with the in-memory cache only");
                        None
                    }
                },
                Err(_) => None,
            };

        let primary: Arc<dyn CatalogClient> = Arc::new(TmdbClient::new(&config)?);
        let fallback: Arc<dyn CatalogClient> = Arc::new(TmdbClient::fallback(&config)?);

        Self::from_parts(&config, primary, Some(fallback), store)
    }

    /// Assemble a service from explicit collaborators
    pub fn from_parts(
        config: &ResolverConfig,
        catalog: Arc<dyn CatalogClient>,
        fallback: Option<Arc<dyn CatalogClient>>,
        store: Option<Arc<dyn PosterCacheRepository>>,
    ) -> AppResult<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            AppError::InternalError(format!("Metadata service needs a tokio runtime: {}", e))
        })?;

        let images = ImageUrls::new(&config.poster_base_url, &config.backdrop_base_url);
        let cache = Arc::new(TwoTierCache::new(store));
        let registry = Arc::new(MetadataRegistry::new());
        let shutdown = CancellationToken::new();

        let orchestrator = Arc::new(FetchOrchestrator::new(
            Arc::clone(&catalog),
            fallback,
            images.clone(),
            Arc::clone(&cache),
            Arc::clone(&registry),
            StageDelays::from_config(config),
        ));
        let (worker, queue) =
            FetchWorker::new(orchestrator, config.worker_pool_size, shutdown.clone());
        let worker = Arc::new(worker);
        let worker_handle = runtime.spawn(Arc::clone(&worker).run());

        log_info!(
            "Metadata service started (persistent cache: {})",
            if cache.has_store() { "on" } else { "off" }
        );

        Ok(Self {
            catalog,
            images,
            cache,
            registry,
            generations: GenerationTracker::new(),
            debouncer: Debouncer::new(config.debounce_delay, queue, shutdown.clone()),
            worker,
            worker_handle,
            shutdown,
        })
    }

    /// Resolve artwork for a title.
    ///
    /// A cache hit fires the callback before returning. A miss schedules a
    /// debounced fetch; a newer request for the same title supersedes it, and
    /// the superseded callback hears nothing.
    pub async fn resolve_poster(
        &self,
        request: PosterRequest,
        callback: Arc<dyn PosterCallback>,
    ) -> Resolution {
        let key = lookup_key(&request.title);
        if key.is_empty() {
            callback.on_image_url(None);
            callback.on_detailed_info(None);
            return Resolution::NoResult;
        }

        if let Some(entry) = self.lookup_cache(request.video_id.as_deref(), &key).await {
            callback.on_image_url(entry.poster_url.clone());
            if let Some(backdrop) = &entry.backdrop_url {
                callback.on_backdrop_url(backdrop.clone());
            }
            return Resolution::Cached(entry);
        }

        let token = self.generations.next(&key);
        let generation = token.generation();
        log_debug!("Scheduling lookup '{}' (generation {})", key, generation);

        self.debouncer.schedule(FetchJob {
            request,
            lookup_key: key,
            token,
            callback,
        });
        Resolution::Scheduled { generation }
    }

    async fn lookup_cache(&self, video_id: Option<&str>, key: &str) -> Option<CacheEntry> {
        if !self.cache.has_store() || video_id.is_none() {
            return self.cache.lookup(video_id, key);
        }

        let cache = Arc::clone(&self.cache);
        let video_id = video_id.map(str::to_string);
        let key = key.to_string();
        match tokio::task::spawn_blocking(move || cache.lookup(video_id.as_deref(), &key)).await {
            Ok(entry) => entry,
            Err(e) => {
                log_warn!("Cache lookup task failed: {}", e);
                None
            }
        }
    }

    /// First genre of the video, from the registry or the persistent cache
    pub async fn get_primary_genre(&self, video_id: &str) -> Option<String> {
        if let Some(genre) = self.registry.primary_genre(video_id) {
            return Some(genre);
        }
        if !self.cache.has_store() {
            return None;
        }

        let cache = Arc::clone(&self.cache);
        let video_id = video_id.to_string();
        tokio::task::spawn_blocking(move || cache.stored_field(&video_id, CacheField::Genre))
            .await
            .unwrap_or_else(|e| {
                log_warn!("Genre lookup task failed: {}", e);
                None
            })
    }

    pub fn get_all_genres(&self, video_id: &str) -> Vec<String> {
        self.registry.all_genres(video_id)
    }

    pub fn get_detailed_info(&self, video_id: &str) -> Option<DetailedMovieInfo> {
        self.registry.get(video_id)
    }

    /// Replace the certification of a known video; false if unknown
    pub fn update_certification(&self, video_id: &str, certification: &str) -> bool {
        self.registry.update_certification(video_id, certification)
    }

    /// Poster of a random movie from one of the first popular pages
    pub async fn random_popular_poster(&self) -> Option<String> {
        let page = rand::thread_rng().gen_range(1..=POPULAR_PAGES);

        let movies = match self.catalog.get_popular_movies(page).await {
            Ok(movies) => movies,
            Err(e) => {
                LogContext::error_with_context(&e, "Popular movies request failed");
                return None;
            }
        };

        let movie = movies.choose(&mut rand::thread_rng())?;
        self.images.poster(movie.poster_path.as_deref())
    }

    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &TwoTierCache {
        &self.cache
    }

    /// Lookup keys with a scheduled or running fetch
    pub fn pending_lookups(&self) -> usize {
        self.generations.tracked_keys()
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    /// Stop accepting work, cancel pending timers and in-flight lookups
    pub async fn shutdown(self) {
        self.worker.stop();
        if let Err(e) = self.worker_handle.await {
            log_warn!("Fetch worker ended abnormally: {}", e);
        }
        self.worker.drain().await;
        log_info!("Metadata service stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::domain::repositories::MockCatalogClient;
    use crate::modules::catalog::domain::MovieSummary;
    use crate::modules::resolver::domain::CallbackEvent;
    use crate::shared::errors::AppError;
    use tokio::sync::mpsc;

    fn service(catalog: MockCatalogClient) -> MetadataService {
        let config = ResolverConfig::new("test-key").without_pacing();
        MetadataService::from_parts(&config, Arc::new(catalog), None, None).unwrap()
    }

    #[tokio::test]
    async fn test_blank_title_resolves_to_no_result() {
        let service = service(MockCatalogClient::new());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let resolution = service
            .resolve_poster(PosterRequest::new("   "), Arc::new(tx))
            .await;

        assert_eq!(resolution, Resolution::NoResult);
        assert_eq!(rx.try_recv().unwrap(), CallbackEvent::ImageUrl(None));
        assert_eq!(rx.try_recv().unwrap(), CallbackEvent::DetailedInfo(None));
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_memory_hit_skips_network() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_search_movies().never();
        let service = service(catalog);
        service
            .cache()
            .remember_urls("heat", "https://img/heat.jpg", Some("https://img/heat-b.jpg"));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let resolution = service
            .resolve_poster(PosterRequest::new(" Heat "), Arc::new(tx))
            .await;

        assert!(resolution.is_cached());
        assert_eq!(
            rx.try_recv().unwrap(),
            CallbackEvent::ImageUrl(Some("https://img/heat.jpg".to_string()))
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            CallbackEvent::BackdropUrl("https://img/heat-b.jpg".to_string())
        );
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_miss_schedules_increasing_generations() {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_search_movies().returning(|_| Ok(vec![]));
        let service = service(catalog);

        let (tx, _rx) = mpsc::unbounded_channel();
        let callback: Arc<dyn PosterCallback> = Arc::new(tx);
        let first = service
            .resolve_poster(PosterRequest::new("Heat"), Arc::clone(&callback))
            .await;
        let second = service
            .resolve_poster(PosterRequest::new("heat"), callback)
            .await;

        assert_eq!(first, Resolution::Scheduled { generation: 1 });
        assert_eq!(second, Resolution::Scheduled { generation: 2 });
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_update_certification_requires_record() {
        let service = service(MockCatalogClient::new());
        assert!(!service.update_certification("vid", "PG-13"));
        assert!(service.get_detailed_info("vid").is_none());
        assert!(service.get_all_genres("vid").is_empty());
        assert!(service.get_primary_genre("vid").await.is_none());
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_random_popular_poster() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_get_popular_movies()
            .withf(|page| (1..=POPULAR_PAGES).contains(page))
            .times(1)
            .returning(|_| {
                Ok(vec![MovieSummary {
                    id: 1,
                    poster_path: Some("/pop.jpg".to_string()),
                    ..Default::default()
                }])
            });
        let service = service(catalog);

        assert_eq!(
            service.random_popular_poster().await.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/pop.jpg")
        );
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_random_popular_poster_failure_is_none() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_get_popular_movies()
            .returning(|_| Err(AppError::TransportError("offline".to_string())));
        let service = service(catalog);

        assert!(service.random_popular_poster().await.is_none());
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_stop_marks_service_not_running() {
        let service = service(MockCatalogClient::new());
        assert!(service.is_running());
        assert!(!service.worker.is_stopped());

        service.worker.stop();
        assert!(!service.is_running());
        assert!(service.worker.is_stopped());
        service.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_opens_persistent_cache_at_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("posters.db");
        let config = ResolverConfig::new("test-key").with_database_path(&path);
        assert_eq!(config.database_path, path);

        let service = MetadataService::start(config).unwrap();
        assert!(service.cache().has_store());
        assert!(path.exists());
        service.shutdown().await;
    }

    #[test]
    fn test_requires_runtime() {
        let config = ResolverConfig::new("test-key");
        let result =
            MetadataService::from_parts(&config, Arc::new(MockCatalogClient::new()), None, None);
        assert!(matches!(result, Err(AppError::InternalError(_))));
    }
}
