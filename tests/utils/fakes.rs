/// Hand-written catalog fake with call recording
use async_trait::async_trait;
use marquee::modules::catalog::domain::{CountryRelease, MovieDetails};
use marquee::{AppError, AppResult, CatalogClient, MovieSummary};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct CallLog {
    pub searches: Vec<String>,
    pub fetches_by_id: Vec<u64>,
    pub detail_fetches: Vec<u64>,
    pub release_date_fetches: Vec<u64>,
    pub popular_pages: Vec<u32>,
}

impl CallLog {
    pub fn total(&self) -> usize {
        self.searches.len()
            + self.fetches_by_id.len()
            + self.detail_fetches.len()
            + self.release_date_fetches.len()
            + self.popular_pages.len()
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    movies: Vec<MovieSummary>,
    search_delay: Duration,
    search_transport_failure: bool,
    calls: Mutex<CallLog>,
}

impl FakeCatalog {
    pub fn with_movies(movies: Vec<MovieSummary>) -> Self {
        Self {
            movies,
            ..Self::default()
        }
    }

    pub fn search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    /// Every search fails with a transport error
    pub fn failing_search(mut self) -> Self {
        self.search_transport_failure = true;
        self
    }

    pub fn calls(&self) -> CallLog {
        self.calls.lock().unwrap().clone()
    }

    fn find(&self, id: u64) -> AppResult<MovieSummary> {
        self.movies
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("movie {}", id)))
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        self.calls.lock().unwrap().searches.push(query.to_string());
        if !self.search_delay.is_zero() {
            tokio::time::sleep(self.search_delay).await;
        }
        if self.search_transport_failure {
            return Err(AppError::TransportError("connection timed out".to_string()));
        }
        Ok(self.movies.clone())
    }

    async fn get_movie(&self, id: u64) -> AppResult<MovieSummary> {
        self.calls.lock().unwrap().fetches_by_id.push(id);
        self.find(id)
    }

    async fn get_movie_with_credits(&self, id: u64) -> AppResult<MovieDetails> {
        self.calls.lock().unwrap().detail_fetches.push(id);
        let summary = self.find(id)?;
        Ok(MovieDetails {
            summary,
            runtime: 170,
            status: Some("Released".to_string()),
            genres: vec!["Crime".to_string(), "Drama".to_string()],
            ..Default::default()
        })
    }

    async fn get_release_dates(&self, id: u64) -> AppResult<Vec<CountryRelease>> {
        self.calls.lock().unwrap().release_date_fetches.push(id);
        Ok(vec![
            CountryRelease {
                country: "FR".to_string(),
                certifications: vec!["12".to_string()],
            },
            CountryRelease {
                country: "US".to_string(),
                certifications: vec!["R".to_string()],
            },
        ])
    }

    async fn get_popular_movies(&self, page: u32) -> AppResult<Vec<MovieSummary>> {
        self.calls.lock().unwrap().popular_pages.push(page);
        Ok(self.movies.clone())
    }
}

pub fn movie(id: u64, title: &str, poster: Option<&str>) -> MovieSummary {
    MovieSummary {
        id,
        title: Some(title.to_string()),
        overview: Some(format!("{} overview", title)),
        poster_path: poster.map(str::to_string),
        backdrop_path: poster.map(|p| format!("/backdrop{}", p)),
        vote_average: 8.3,
        release_date: Some("1995-12-15".to_string()),
    }
}
