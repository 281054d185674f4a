//! Staged fetch pipeline for one scheduled lookup.
//!
//! Every stage transition re-checks the job's generation token, so results of
//! a superseded request never reach the caller or the caches.

use crate::modules::cache::TwoTierCache;
use crate::modules::catalog::domain::{
    select_certification, BasicDetails, CatalogClient, DetailedMovieInfo, ImageUrls, MovieSummary,
};
use crate::modules::matching::{clean_title, extract_external_id, TitleMatcher};
use crate::modules::registry::MetadataRegistry;
use crate::modules::resolver::domain::{GenerationToken, PosterCallback, PosterRequest};
use crate::shared::config::ResolverConfig;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_warn};
use std::sync::Arc;
use std::time::Duration;

/// A lookup scheduled after its debounce delay
pub struct FetchJob {
    pub request: PosterRequest,
    pub lookup_key: String,
    pub token: GenerationToken,
    pub callback: Arc<dyn PosterCallback>,
}

impl FetchJob {
    pub fn is_current(&self) -> bool {
        self.token.is_current()
    }
}

/// Pauses between stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageDelays {
    pub search_settle: Duration,
    pub detail_fetch: Duration,
}

impl StageDelays {
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            search_settle: config.search_settle_delay,
            detail_fetch: config.detail_fetch_delay,
        }
    }
}

#[derive(Debug)]
enum FetchStage {
    IdLookup,
    DirectFetch(u64),
    Search,
    MatchSelection {
        query: String,
        candidates: Vec<MovieSummary>,
    },
    PartialResult(MovieSummary),
    DetailedFetch(u64),
    CertificationFetch {
        movie_id: u64,
        info: DetailedMovieInfo,
    },
    Terminal(Option<DetailedMovieInfo>),
    Abandoned,
}

/// How a job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Poster delivered; `detailed` tells whether full details followed
    Completed { detailed: bool },
    /// No usable poster, a null poster was reported
    NoResult,
    /// Superseded by a newer request for the same key, nothing reported
    Abandoned,
}

pub struct FetchOrchestrator {
    catalog: Arc<dyn CatalogClient>,
    fallback: Option<Arc<dyn CatalogClient>>,
    matcher: TitleMatcher,
    images: ImageUrls,
    cache: Arc<TwoTierCache>,
    registry: Arc<MetadataRegistry>,
    delays: StageDelays,
}

impl FetchOrchestrator {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        fallback: Option<Arc<dyn CatalogClient>>,
        images: ImageUrls,
        cache: Arc<TwoTierCache>,
        registry: Arc<MetadataRegistry>,
        delays: StageDelays,
    ) -> Self {
        Self {
            catalog,
            fallback,
            matcher: TitleMatcher::default(),
            images,
            cache,
            registry,
            delays,
        }
    }

    /// Drive one job to a terminal state
    pub async fn run(&self, job: &FetchJob) -> FetchOutcome {
        let timer = TimedOperation::new(&format!("lookup '{}'", job.lookup_key));
        let mut stage = FetchStage::IdLookup;
        let mut poster_delivered = false;

        let outcome = loop {
            if !job.is_current() {
                break FetchOutcome::Abandoned;
            }

            stage = match stage {
                FetchStage::IdLookup => self.id_lookup(&job.request),
                FetchStage::DirectFetch(movie_id) => self.direct_fetch(movie_id).await,
                FetchStage::Search => self.search(job).await,
                FetchStage::MatchSelection { query, candidates } => {
                    self.select_match(&query, candidates)
                }
                FetchStage::PartialResult(movie) => {
                    if !self.deliver_partial(job, &movie).await {
                        break FetchOutcome::Abandoned;
                    }
                    poster_delivered = true;
                    FetchStage::DetailedFetch(movie.id)
                }
                FetchStage::DetailedFetch(movie_id) => self.detailed_fetch(job, movie_id).await,
                FetchStage::CertificationFetch { movie_id, info } => {
                    self.certification_fetch(movie_id, info).await
                }
                FetchStage::Terminal(info) => {
                    break self.finish(job, info, poster_delivered).await;
                }
                FetchStage::Abandoned => break FetchOutcome::Abandoned,
            };
        };

        match outcome {
            FetchOutcome::Abandoned => {
                log_debug!(
                    "Lookup '{}' superseded (generation {})",
                    job.lookup_key,
                    job.token.generation()
                );
            }
            _ => {
                timer.finish_with_info(&format!("{:?}", outcome));
            }
        }
        outcome
    }

    fn id_lookup(&self, request: &PosterRequest) -> FetchStage {
        match extract_external_id(&request.title, request.description.as_deref()) {
            Some(movie_id) => {
                log_debug!("Explicit movie id {} for '{}'", movie_id, request.title);
                FetchStage::DirectFetch(movie_id)
            }
            None => FetchStage::Search,
        }
    }

    async fn direct_fetch(&self, movie_id: u64) -> FetchStage {
        match self.catalog.get_movie(movie_id).await {
            Ok(movie) if movie.has_poster() => FetchStage::PartialResult(movie),
            Ok(_) => {
                log_debug!("Movie {} has no poster", movie_id);
                FetchStage::Terminal(None)
            }
            Err(e) => {
                LogContext::error_with_context(&e, &format!("Fetch of movie {} failed", movie_id));
                FetchStage::Terminal(None)
            }
        }
    }

    async fn search(&self, job: &FetchJob) -> FetchStage {
        let query = clean_title(&job.request.title);
        if query.is_empty() {
            log_debug!("Title '{}' is empty after cleaning", job.request.title);
            return FetchStage::Terminal(None);
        }

        sleep_unless_zero(self.delays.search_settle).await;
        if !job.is_current() {
            return FetchStage::Abandoned;
        }

        match self.catalog.search_movies(&query).await {
            Ok(candidates) => FetchStage::MatchSelection { query, candidates },
            Err(e) if e.is_transport() => match &self.fallback {
                Some(fallback) => {
                    log_warn!("Search for '{}' failed ({}), retrying with fallback client", query, e);
                    match fallback.search_movies(&query).await {
                        Ok(candidates) => FetchStage::MatchSelection { query, candidates },
                        Err(e) => {
                            LogContext::error_with_context(
                                &e,
                                &format!("Fallback search for '{}' failed", query),
                            );
                            FetchStage::Terminal(None)
                        }
                    }
                }
                None => {
                    LogContext::error_with_context(&e, &format!("Search for '{}' failed", query));
                    FetchStage::Terminal(None)
                }
            },
            Err(e) => {
                LogContext::error_with_context(&e, &format!("Search for '{}' failed", query));
                FetchStage::Terminal(None)
            }
        }
    }

    fn select_match(&self, query: &str, candidates: Vec<MovieSummary>) -> FetchStage {
        match self.matcher.find_best_match(query, &candidates) {
            Some((movie, tier)) if movie.has_poster() => {
                log_debug!("Matched '{}' to movie {} ({:?})", query, movie.id, tier);
                FetchStage::PartialResult(movie.clone())
            }
            Some((movie, _)) => {
                log_debug!("Best match {} for '{}' has no poster", movie.id, query);
                FetchStage::Terminal(None)
            }
            None => {
                log_debug!("No results for '{}'", query);
                FetchStage::Terminal(None)
            }
        }
    }

    /// Cache the matched artwork, then report it if the job is still live
    async fn deliver_partial(&self, job: &FetchJob, movie: &MovieSummary) -> bool {
        let Some(poster_url) = self.images.poster(movie.poster_path.as_deref()) else {
            return false;
        };
        let backdrop_url = self.images.backdrop(movie.backdrop_path.as_deref());

        self.cache
            .remember_urls(&job.lookup_key, &poster_url, backdrop_url.as_deref());
        if let Some(video_id) = job.request.video_id.clone() {
            let (poster, backdrop) = (poster_url.clone(), backdrop_url.clone());
            self.with_store(move |cache| {
                cache.persist_urls(&video_id, Some(&poster), backdrop.as_deref())
            })
            .await;
        }

        if !job.is_current() {
            return false;
        }
        let basic = BasicDetails::from_summary(movie, &poster_url);
        job.callback.on_image_url(Some(poster_url));
        if let Some(backdrop) = backdrop_url {
            job.callback.on_backdrop_url(backdrop);
        }
        job.callback.on_basic_details(basic);
        true
    }

    async fn detailed_fetch(&self, job: &FetchJob, movie_id: u64) -> FetchStage {
        sleep_unless_zero(self.delays.detail_fetch).await;
        if !job.is_current() {
            return FetchStage::Abandoned;
        }

        match self.catalog.get_movie_with_credits(movie_id).await {
            Ok(details) => FetchStage::CertificationFetch {
                movie_id,
                info: DetailedMovieInfo::from_details(&details, &self.images),
            },
            Err(e) => {
                LogContext::error_with_context(
                    &e,
                    &format!("Detailed fetch of movie {} failed", movie_id),
                );
                FetchStage::Terminal(None)
            }
        }
    }

    async fn certification_fetch(&self, movie_id: u64, mut info: DetailedMovieInfo) -> FetchStage {
        match self.catalog.get_release_dates(movie_id).await {
            Ok(releases) => info.certification = select_certification(&releases),
            Err(e) => log_warn!("No release dates for movie {}: {}", movie_id, e),
        }
        FetchStage::Terminal(Some(info))
    }

    async fn finish(
        &self,
        job: &FetchJob,
        info: Option<DetailedMovieInfo>,
        poster_delivered: bool,
    ) -> FetchOutcome {
        let Some(info) = info else {
            if !poster_delivered {
                job.callback.on_image_url(None);
            }
            job.callback.on_detailed_info(None);
            return if poster_delivered {
                FetchOutcome::Completed { detailed: false }
            } else {
                FetchOutcome::NoResult
            };
        };

        if let Some(video_id) = &job.request.video_id {
            self.registry.put(video_id, info.clone());
            if let Some(genre) = info.primary_genre().map(str::to_string) {
                let video_id = video_id.clone();
                self.with_store(move |cache| cache.persist_genre(&video_id, &genre))
                    .await;
            }
        }

        if !job.is_current() {
            return FetchOutcome::Abandoned;
        }
        job.callback.on_detailed_info(Some(info));
        FetchOutcome::Completed { detailed: true }
    }

    /// Run a store write on the blocking pool; skipped without a store
    async fn with_store<F>(&self, write: F)
    where
        F: FnOnce(&TwoTierCache) + Send + 'static,
    {
        if !self.cache.has_store() {
            return;
        }
        let cache = Arc::clone(&self.cache);
        if let Err(e) = tokio::task::spawn_blocking(move || write(&cache)).await {
            log_warn!("Cache write task failed: {}", e);
        }
    }
}

async fn sleep_unless_zero(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
