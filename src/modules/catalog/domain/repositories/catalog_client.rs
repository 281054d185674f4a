use async_trait::async_trait;

use crate::{
    modules::catalog::domain::entities::{CountryRelease, MovieDetails, MovieSummary},
    shared::errors::AppResult,
};

/// Remote movie catalog contract.
///
/// Implementations surface transport failures as `AppError::TransportError`
/// so the orchestrator can decide whether a fallback search is warranted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Ranked title search. An empty list is a valid answer.
    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// Shallow record for a known catalog id
    async fn get_movie(&self, id: u64) -> AppResult<MovieSummary>;

    /// Full record including cast and crew
    async fn get_movie_with_credits(&self, id: u64) -> AppResult<MovieDetails>;

    async fn get_release_dates(&self, id: u64) -> AppResult<Vec<CountryRelease>>;

    /// One page of the popularity chart (1-based)
    async fn get_popular_movies(&self, page: u32) -> AppResult<Vec<MovieSummary>>;
}
