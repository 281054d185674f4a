//! Resolver configuration
//!
//! Defaults mirror the constrained-hardware profile the resolver was tuned
//! for: one network job at a time, a 24h cache window and short debounce.

use crate::shared::errors::{AppError, AppResult};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/w1280";

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub poster_base_url: String,
    pub backdrop_base_url: String,

    /// SQLite file backing the persistent cache
    pub database_path: PathBuf,
    /// Freshness window for persisted cache rows
    pub cache_ttl: Duration,

    /// Delay before a scheduled lookup fires
    pub debounce_delay: Duration,
    /// Extra settling delay before the search call
    pub search_settle_delay: Duration,
    /// Pause before the detailed fetch (rate limit and memory pressure)
    pub detail_fetch_delay: Duration,
    /// Maximum concurrent fetch jobs
    pub worker_pool_size: usize,

    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    /// Retries on connect failures and timeouts for the primary client
    pub max_retries: u32,

    /// Skip certificate validation. Only for devices with a broken trust store.
    pub allow_insecure_tls: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poster_base_url: DEFAULT_POSTER_BASE_URL.to_string(),
            backdrop_base_url: DEFAULT_BACKDROP_BASE_URL.to_string(),
            database_path: PathBuf::from("tmdb_cache.db"),
            cache_ttl: Duration::from_secs(24 * 60 * 60),
            debounce_delay: Duration::from_millis(100),
            search_settle_delay: Duration::from_millis(20),
            detail_fetch_delay: Duration::from_millis(500),
            worker_pool_size: 1,
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 2,
            pool_idle_timeout: Duration::from_secs(5 * 60),
            max_retries: 1,
            allow_insecure_tls: false,
        }
    }
}

impl ResolverConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Build configuration from the environment (and `.env` if present)
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("TMDB_API_KEY").map_err(|_| {
            AppError::ConfigError("TMDB_API_KEY environment variable not found".to_string())
        })?;

        let mut config = Self::new(api_key);

        if let Ok(url) = std::env::var("TMDB_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(path) = std::env::var("MARQUEE_CACHE_DB") {
            config.database_path = PathBuf::from(path);
        }
        if let Ok(ms) = std::env::var("MARQUEE_DEBOUNCE_MS") {
            config.debounce_delay = Duration::from_millis(ms.trim().parse()?);
        }
        if let Ok(workers) = std::env::var("MARQUEE_WORKERS") {
            config.worker_pool_size = workers.trim().parse()?;
        }
        if let Ok(flag) = std::env::var("MARQUEE_INSECURE_TLS") {
            config.allow_insecure_tls = parse_flag(&flag);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::ConfigError("API key cannot be empty".to_string()));
        }
        if self.worker_pool_size == 0 {
            return Err(AppError::ConfigError(
                "Worker pool size must be at least 1".to_string(),
            ));
        }
        if self.cache_ttl.is_zero() {
            return Err(AppError::ConfigError("Cache TTL must be positive".to_string()));
        }
        Ok(())
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Zero out all pacing delays except the debounce (used by tests and tooling)
    pub fn without_pacing(mut self) -> Self {
        self.search_settle_delay = Duration::ZERO;
        self.detail_fetch_delay = Duration::ZERO;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constrained_profile() {
        let config = ResolverConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(86_400));
        assert_eq!(config.debounce_delay, Duration::from_millis(100));
        assert_eq!(config.worker_pool_size, 1);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.pool_max_idle_per_host, 2);
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(300));
        assert!(!config.allow_insecure_tls);
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let err = ResolverConfig::default().validate().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let mut config = ResolverConfig::new("key");
        config.worker_pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("no"));
        assert!(!parse_flag(""));
    }
}
