//! HTTP client with rate limiting, retries and configurable transport
//!
//! One instance per transport profile: the primary client used for every
//! stage, and a minimal single-shot client used once when a search fails at
//! the transport level.

use super::retry_policy::{is_retryable_error, RateLimitInfo, RetryPolicy};
use crate::shared::config::ResolverConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::{Client, Response, StatusCode};
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

const USER_AGENT: &str = concat!("marquee/", env!("CARGO_PKG_VERSION"));

/// Transport-level settings for building a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub accept_invalid_certs: bool,
}

impl TransportSettings {
    pub fn primary(config: &ResolverConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            // reqwest 0.11 has a single whole-request timeout covering reads and writes
            request_timeout: config.read_timeout.max(config.write_timeout),
            pool_max_idle_per_host: config.pool_max_idle_per_host,
            pool_idle_timeout: config.pool_idle_timeout,
            accept_invalid_certs: config.allow_insecure_tls,
        }
    }

    /// Short timeouts, no keep-alive pool
    pub fn minimal(config: &ResolverConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(15),
            pool_max_idle_per_host: 0,
            pool_idle_timeout: Duration::from_secs(5),
            accept_invalid_certs: config.allow_insecure_tls,
        }
    }

    pub fn build_client(&self) -> AppResult<Client> {
        if self.accept_invalid_certs {
            log::warn!("Catalog transport configured to accept invalid TLS certificates");
        }

        Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
    }
}

/// HTTP client that handles rate limiting and retries
pub struct RateLimitClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    retry_policy: RetryPolicy,
    client_name: String,
}

impl RateLimitClient {
    /// Primary TMDB client
    pub fn for_tmdb(config: &ResolverConfig) -> AppResult<Self> {
        Ok(Self::new(
            "TMDB",
            TransportSettings::primary(config).build_client()?,
            RetryPolicy::tmdb(config.max_retries),
            // TMDB allows roughly 40 requests per 10 seconds
            Self::create_rate_limiter(4.0, 8),
        ))
    }

    /// Minimal single-shot client for the search fallback
    pub fn for_tmdb_fallback(config: &ResolverConfig) -> AppResult<Self> {
        Ok(Self::new(
            "TMDB-fallback",
            TransportSettings::minimal(config).build_client()?,
            RetryPolicy::single_attempt(),
            Self::create_rate_limiter(4.0, 8),
        ))
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    fn create_rate_limiter(requests_per_second: f64, burst_size: u32) -> DirectRateLimiter {
        let period = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::from_secs(1)
        };

        let burst = NonZeroU32::new(burst_size.max(1)).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst);

        GovernorRateLimiter::direct(quota)
    }

    pub fn new(
        client_name: &str,
        client: Client,
        retry_policy: RetryPolicy,
        rate_limiter: DirectRateLimiter,
    ) -> Self {
        Self {
            client,
            rate_limiter,
            retry_policy,
            client_name: client_name.to_string(),
        }
    }

    /// Make a GET request with rate limiting and retries
    pub async fn get<T>(&self, url: &str) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let endpoint = redact_query(url);
        let timer = TimedOperation::new(&format!("{} GET {}", self.client_name, endpoint));
        LogContext::api_call(&self.client_name, endpoint, "started", None);

        let result = self.request_with_retries(url, endpoint).await;

        let status = match &result {
            Ok(_) => "ok",
            Err(AppError::NotFound(_)) => "not found",
            Err(_) => "failed",
        };
        LogContext::api_call(&self.client_name, endpoint, status, Some(timer.elapsed_ms()));
        result
    }

    async fn request_with_retries<T>(&self, url: &str, endpoint: &str) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;

        loop {
            self.rate_limiter.until_ready().await;

            match self.client.get(url).header("Accept", "application/json").send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS
                        && attempt < self.retry_policy.max_retries
                    {
                        let info = RateLimitInfo::from_headers(response.headers());
                        let delay = self.retry_policy.calculate_delay(attempt, info.retry_after);
                        log::warn!(
                            "{} rate limited on {} (attempt {}/{}). Waiting {:?}",
                            self.client_name,
                            endpoint,
                            attempt + 1,
                            self.retry_policy.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if status == StatusCode::NOT_FOUND {
                        return Err(AppError::NotFound(format!(
                            "{} has no resource at {}",
                            self.client_name, endpoint
                        )));
                    }

                    if !status.is_success() {
                        return Err(AppError::ApiError(format!(
                            "{} returned {} for {}",
                            self.client_name, status, endpoint
                        )));
                    }

                    return self.parse_response(response).await;
                }
                Err(e) => {
                    if is_retryable_error(&e) && attempt < self.retry_policy.max_retries {
                        let delay = self.retry_policy.calculate_delay(attempt, None);
                        log::warn!(
                            "{} request to {} failed (attempt {}/{}): {}. Retrying in {:?}",
                            self.client_name,
                            endpoint,
                            attempt + 1,
                            self.retry_policy.max_retries + 1,
                            e,
                            delay
                        );
                        sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let err = AppError::from(e);
                    log::warn!("{} request to {} failed: {}", self.client_name, endpoint, err);
                    return Err(err);
                }
            }
        }
    }

    async fn parse_response<T>(&self, response: Response) -> AppResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response_text = response.text().await.map_err(|e| {
            AppError::TransportError(format!(
                "Failed to read {} response body: {}",
                self.client_name, e
            ))
        })?;

        serde_json::from_str(&response_text).map_err(|e| {
            let preview: String = response_text.chars().take(200).collect();
            AppError::ParseError(format!(
                "Failed to parse {} response: {}. Response: {}",
                self.client_name, e, preview
            ))
        })
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }
}

/// Strip the query string so API keys never reach the logs
fn redact_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ResolverConfig::new("test-key");
        let primary = RateLimitClient::for_tmdb(&config).unwrap();
        assert_eq!(primary.client_name(), "TMDB");
        assert!(primary.can_make_request_now());

        let fallback = RateLimitClient::for_tmdb_fallback(&config).unwrap();
        assert_eq!(fallback.client_name(), "TMDB-fallback");
    }

    #[test]
    fn test_minimal_transport_is_shorter_than_primary() {
        let config = ResolverConfig::new("test-key");
        let primary = TransportSettings::primary(&config);
        let minimal = TransportSettings::minimal(&config);
        assert!(minimal.connect_timeout < primary.connect_timeout);
        assert!(minimal.request_timeout < primary.request_timeout);
        assert_eq!(minimal.pool_max_idle_per_host, 0);
    }

    #[test]
    fn test_insecure_tls_is_opt_in() {
        let mut config = ResolverConfig::new("test-key");
        assert!(!TransportSettings::primary(&config).accept_invalid_certs);

        config.allow_insecure_tls = true;
        assert!(TransportSettings::primary(&config).accept_invalid_certs);
        assert!(TransportSettings::minimal(&config).accept_invalid_certs);
    }

    #[test]
    fn test_redact_query_hides_api_key() {
        assert_eq!(
            redact_query("https://api.themoviedb.org/3/movie/603?api_key=secret"),
            "https://api.themoviedb.org/3/movie/603"
        );
        assert_eq!(redact_query("/search/movie"), "/search/movie");
    }
}
