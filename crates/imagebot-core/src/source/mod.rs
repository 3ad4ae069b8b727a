//! Upstream image APIs.
//!
//! One generic [`ImageSourceClient`] owns the HTTP session, the per-host
//! [`RateLimiter`] and the 429 retry; each backend plugs in only its URL,
//! query-parameter and payload conventions through the [`Backend`] trait.

pub(crate) mod client;
pub(crate) mod furry;
pub(crate) mod rate_limit;
pub(crate) mod retry;
pub(crate) mod waifu;

pub use client::{ClientSettings, ImageSourceClient};
pub use furry::FurryBackend;
pub use rate_limit::RateLimiter;
pub use retry::{parse_retry_after, with_single_retry, Attempt};
pub use waifu::WaifuBackend;

use crate::catalog::RawTag;
use crate::error::FetchResult;
use crate::types::{ImageResult, SearchRequest, SourceKind, TagRef};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// Client for the primary backend.
pub type WaifuClient = ImageSourceClient<WaifuBackend>;

/// Client for the secondary backend.
pub type FurryClient = ImageSourceClient<FurryBackend>;

/// Backend-specific conventions plugged into [`ImageSourceClient`].
pub trait Backend: Send + Sync + 'static {
    /// Which source this backend serves.
    fn kind(&self) -> SourceKind;

    /// Headers sent with every request (User-Agent, auth).
    fn default_headers(&self) -> HeaderMap;

    /// Absolute URL of the search endpoint for `request`.
    fn search_url(&self, request: &SearchRequest) -> String;

    /// Query parameters for `request`, page size already capped.
    fn search_query(&self, request: &SearchRequest) -> Vec<(&'static str, String)>;

    /// Map a 200 body into results, dropping items without a usable URL.
    fn normalize(&self, body: &str, request: &SearchRequest) -> FetchResult<Vec<ImageResult>>;
}

/// Object-safe search interface consumed by the orchestrator.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Source name for logging.
    fn kind(&self) -> SourceKind;

    /// Search for images matching `request`.
    async fn search(&self, request: &SearchRequest) -> FetchResult<Vec<ImageResult>>;
}

/// Provider of the raw tag vocabulary used to build the catalog.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Fetch every tag the upstream knows about.
    async fn fetch_tags(&self) -> FetchResult<Vec<RawTag>>;
}

/// Extract a tag name from an upstream tag entry.
///
/// Accepts either a bare string or an object carrying `slug` (preferred) or
/// `name`. Anything else, and blank names, yield `None`.
pub(crate) fn tag_ref_from_value(value: &Value) -> Option<TagRef> {
    match value {
        Value::String(name) => TagRef::new(name.as_str()),
        Value::Object(map) => ["slug", "name"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find_map(TagRef::new),
        _ => None,
    }
}

/// Non-empty string field of a JSON object.
pub(crate) fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Non-negative integer field that fits a pixel dimension.
pub(crate) fn dimension_field(value: &Value, key: &str) -> Option<u32> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}
