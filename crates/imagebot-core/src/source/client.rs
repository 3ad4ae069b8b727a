//! Generic rate-limited HTTP client shared by both backends.

use super::rate_limit::RateLimiter;
use super::retry::{self, Attempt};
use super::{Backend, ImageSource};
use crate::config::Config;
use crate::error::{FetchError, FetchResult, ImagebotError, Result};
use crate::types::{ImageResult, SearchRequest, SourceKind};
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use std::time::{Duration, Instant};

/// Pacing and timeout settings for one client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Minimum spacing between requests to this backend
    pub min_interval: Duration,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Wait used when a 429 has no usable Retry-After
    pub default_retry_after: Duration,
}

impl ClientSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_interval: config.min_request_interval(),
            request_timeout: config.request_timeout(),
            default_retry_after: config.default_retry_after(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// HTTP client for one upstream image API.
///
/// Owns its connection pool and its rate limiter; nothing else touches
/// either.
pub struct ImageSourceClient<B> {
    backend: B,
    http: reqwest::Client,
    limiter: RateLimiter,
    default_retry_after: Duration,
}

impl<B: Backend> ImageSourceClient<B> {
    pub fn new(backend: B, settings: ClientSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(backend.default_headers())
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ImagebotError::HttpClient {
                source_kind: backend.kind(),
                message: e.to_string(),
            })?;

        let limiter = RateLimiter::new(settings.min_interval);
        tracing::debug!(
            source = %backend.kind(),
            "Client ready, min interval {:?}, timeout {:?}",
            limiter.min_interval(),
            settings.request_timeout
        );

        Ok(Self {
            backend,
            http,
            limiter,
            default_retry_after: settings.default_retry_after,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Search the backend and return normalized images (possibly empty).
    pub async fn search(&self, request: &SearchRequest) -> FetchResult<Vec<ImageResult>> {
        let url = self.backend.search_url(request);
        let query = self.backend.search_query(request);
        tracing::debug!(source = %self.backend.kind(), "GET {url} with params {query:?}");

        let start = Instant::now();
        let body = self.get(&url, &query).await?;
        let images = self.backend.normalize(&body, request)?;

        tracing::info!(
            source = %self.backend.kind(),
            "Got {} images in {}ms",
            images.len(),
            start.elapsed().as_millis()
        );
        Ok(images)
    }

    /// Rate-limited GET returning the 200 body, with one retry on 429.
    pub(crate) async fn get(&self, url: &str, query: &[(&str, String)]) -> FetchResult<String> {
        retry::with_single_retry(move || self.attempt(url, query)).await
    }

    async fn attempt(&self, url: &str, query: &[(&str, String)]) -> Attempt<String> {
        self.limiter.await_turn().await;

        let resp = match self.http.get(url).query(query).send().await {
            Ok(resp) => resp,
            Err(e) => {
                return Attempt::Done(Err(FetchError::NetworkFailure {
                    message: format!("{} request failed: {e}", self.backend.kind()),
                }))
            }
        };

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let header = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok());
            let retry_after = retry::parse_retry_after(header, self.default_retry_after);
            return Attempt::RateLimited { retry_after };
        }

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(source = %self.backend.kind(), "HTTP {status}: {body}");
            return Attempt::Done(Err(FetchError::UpstreamError {
                status: status.as_u16(),
                body,
            }));
        }

        Attempt::Done(resp.text().await.map_err(|e| FetchError::NetworkFailure {
            message: format!("Failed to read {} response body: {e}", self.backend.kind()),
        }))
    }
}

#[async_trait]
impl<B: Backend> ImageSource for ImageSourceClient<B> {
    fn kind(&self) -> SourceKind {
        self.backend.kind()
    }

    async fn search(&self, request: &SearchRequest) -> FetchResult<Vec<ImageResult>> {
        ImageSourceClient::search(self, request).await
    }
}
