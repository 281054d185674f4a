use crate::{
    modules::catalog::{
        domain::{
            entities::{CountryRelease, MovieDetails, MovieSummary},
            repositories::CatalogClient,
        },
        infrastructure::{http_client::RateLimitClient, tmdb::mapper::TmdbMapper},
    },
    shared::{config::ResolverConfig, errors::AppResult},
};
use async_trait::async_trait;

use super::models::*;

/// Which request shape the client issues for searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchProfile {
    /// `include_adult=false` with the primary transport
    Standard,
    /// Bare `query` only, for the one-shot fallback transport
    Minimal,
}

/// TMDB v3 REST client. Authenticates with the `api_key` query parameter.
pub struct TmdbClient {
    http_client: RateLimitClient,
    base_url: String,
    api_key: String,
    mapper: TmdbMapper,
    search_profile: SearchProfile,
}

impl TmdbClient {
    /// Primary client built from resolver configuration
    pub fn new(config: &ResolverConfig) -> AppResult<Self> {
        Ok(Self::with_client(
            RateLimitClient::for_tmdb(config)?,
            &config.api_base_url,
            &config.api_key,
        ))
    }

    /// Minimal single-shot client used after a transport failure during search
    pub fn fallback(config: &ResolverConfig) -> AppResult<Self> {
        let mut client = Self::with_client(
            RateLimitClient::for_tmdb_fallback(config)?,
            &config.api_base_url,
            &config.api_key,
        );
        client.search_profile = SearchProfile::Minimal;
        Ok(client)
    }

    /// Create client with custom HTTP client (for testing)
    pub fn with_client(http_client: RateLimitClient, base_url: &str, api_key: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            mapper: TmdbMapper::new(),
            search_profile: SearchProfile::Standard,
        }
    }

    /// Build URL with API key parameter
    fn build_url(&self, endpoint: &str) -> String {
        self.build_url_with_params(endpoint, &[])
    }

    /// Build URL with API key and additional query parameters
    fn build_url_with_params(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}",
            self.base_url,
            endpoint,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            if *key != "api_key" {
                url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
            }
        }
        url
    }

    fn search_params(&self, query: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", query.to_string())];
        if self.search_profile == SearchProfile::Standard {
            params.push(("include_adult", "false".to_string()));
        }
        params
    }
}

#[async_trait]
impl CatalogClient for TmdbClient {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        let url = self.build_url_with_params("/search/movie", &self.search_params(query));

        log::info!("TMDB: Searching for '{}'", query);

        let response: TmdbSearchResponse = self.http_client.get(&url).await?;
        let movies = self.mapper.map_movies(response.results);

        log::info!("TMDB: Found {} results for '{}'", movies.len(), query);
        Ok(movies)
    }

    async fn get_movie(&self, id: u64) -> AppResult<MovieSummary> {
        let url = self.build_url(&format!("/movie/{}", id));

        log::info!("TMDB: Getting movie for ID '{}'", id);

        let details: TmdbMovieDetails = self.http_client.get(&url).await?;
        Ok(self.mapper.map_details_to_summary(details))
    }

    async fn get_movie_with_credits(&self, id: u64) -> AppResult<MovieDetails> {
        let url = self.build_url_with_params(
            &format!("/movie/{}", id),
            &[("append_to_response", "credits".to_string())],
        );

        log::info!("TMDB: Getting detailed info with credits for ID '{}'", id);

        let details: TmdbMovieDetails = self.http_client.get(&url).await?;
        Ok(self.mapper.map_details(details))
    }

    async fn get_release_dates(&self, id: u64) -> AppResult<Vec<CountryRelease>> {
        let url = self.build_url(&format!("/movie/{}/release_dates", id));

        log::debug!("TMDB: Getting release dates for ID '{}'", id);

        let response: ReleaseDatesResponse = self.http_client.get(&url).await?;
        Ok(self.mapper.map_release_dates(response.results))
    }

    async fn get_popular_movies(&self, page: u32) -> AppResult<Vec<MovieSummary>> {
        let url = self.build_url_with_params("/movie/popular", &[("page", page.to_string())]);

        log::debug!("TMDB: Getting popular movies page {}", page);

        let response: TmdbSearchResponse = self.http_client.get(&url).await?;
        Ok(self.mapper.map_movies(response.results))
    }
}
