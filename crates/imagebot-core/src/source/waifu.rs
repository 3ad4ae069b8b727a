//! waifu.im backend (primary).
//!
//! `GET {base}/images` for searches, `GET {base}/tags` for the vocabulary.
//! Items carry their own NSFW flag, a list of tag objects and an optional
//! list of artists.

use super::{dimension_field, str_field, tag_ref_from_value, Backend, TagSource, WaifuClient};
use crate::catalog::RawTag;
use crate::config::{resolve_env_var, Config};
use crate::error::{FetchError, FetchResult};
use crate::types::{Artist, ImageResult, SearchRequest, SourceKind};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::Value;

/// Largest page size the images endpoint accepts.
pub const WAIFU_MAX_PAGE_SIZE: u32 = 30;

/// waifu.im URL, auth and payload conventions.
#[derive(Debug, Clone)]
pub struct WaifuBackend {
    base_url: String,
    token: Option<String>,
    user_agent: String,
    max_tag_pages: u32,
}

impl WaifuBackend {
    pub fn new(base_url: &str, token: Option<String>, user_agent: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            user_agent: user_agent.to_string(),
            max_tag_pages: 50,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let token = resolve_env_var(&config.waifu.api_token);
        if token.is_none() {
            tracing::debug!("No waifu.im token configured, using anonymous access");
        }
        Self::new(&config.waifu.base_url, token, &config.waifu.user_agent)
            .with_max_tag_pages(config.limits.max_tag_pages)
    }

    pub fn with_max_tag_pages(mut self, pages: u32) -> Self {
        self.max_tag_pages = pages.max(1);
        self
    }

    pub fn tags_url(&self) -> String {
        format!("{}/tags", self.base_url)
    }
}

impl Backend for WaifuBackend {
    fn kind(&self) -> SourceKind {
        SourceKind::Waifu
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        match HeaderValue::from_str(&self.user_agent) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(_) => tracing::warn!("Ignoring invalid waifu.im user agent"),
        }
        if let Some(token) = &self.token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("Ignoring waifu.im token with invalid characters"),
            }
        }
        headers
    }

    fn search_url(&self, _request: &SearchRequest) -> String {
        format!("{}/images", self.base_url)
    }

    fn search_query(&self, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !request.tags.is_empty() {
            params.push(("tags", request.tags.join(",")));
        }
        if !request.excluded_tags.is_empty() {
            params.push(("excludedTags", request.excluded_tags.join(",")));
        }
        params.push(("isNsfw", request.nsfw.to_string()));
        if let Some(animated) = request.is_animated {
            params.push(("isAnimated", animated.to_string()));
        }
        if let Some(orientation) = &request.orientation {
            params.push(("orientation", orientation.clone()));
        }
        if let Some(order_by) = &request.order_by {
            params.push(("orderBy", order_by.clone()));
        }
        params.push((
            "pageSize",
            request.count.min(WAIFU_MAX_PAGE_SIZE).to_string(),
        ));
        params
    }

    fn normalize(&self, body: &str, request: &SearchRequest) -> FetchResult<Vec<ImageResult>> {
        let root = parse_object(body, "images")?;
        let items = root.get("items").and_then(Value::as_array);
        Ok(items
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| normalize_item(item, request.nsfw))
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn normalize_item(item: &Value, requested_nsfw: bool) -> Option<ImageResult> {
    let url = str_field(item, "url")?;
    let tags = item
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().filter_map(tag_ref_from_value).collect())
        .unwrap_or_default();
    let artist = item
        .get("artists")
        .and_then(Value::as_array)
        .and_then(|artists| artists.first())
        .and_then(|first| str_field(first, "name"))
        .map(|name| Artist {
            name: name.to_string(),
        });

    Some(ImageResult {
        url: url.to_string(),
        width: dimension_field(item, "width"),
        height: dimension_field(item, "height"),
        is_nsfw: item
            .get("isNsfw")
            .and_then(Value::as_bool)
            .unwrap_or(requested_nsfw),
        dominant_color: str_field(item, "dominantColor").map(str::to_string),
        tags,
        artist,
        rating: None,
        score: None,
    })
}

fn parse_object(body: &str, what: &str) -> FetchResult<Value> {
    let root: Value = serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse {
        message: format!("waifu.im {what} response is not JSON: {e}"),
    })?;
    if !root.is_object() {
        return Err(FetchError::InvalidResponse {
            message: format!("waifu.im {what} response is not a JSON object"),
        });
    }
    Ok(root)
}

/// One page of the tag listing.
#[derive(Debug, Default)]
pub(crate) struct TagPage {
    pub tags: Vec<RawTag>,
    pub has_next: bool,
}

/// Parse a `/tags` page.
///
/// Pagination is only followed when the payload says so, through either
/// `hasNextPage` or `pageNumber`/`totalPages`.
pub(crate) fn parse_tag_page(body: &str) -> FetchResult<TagPage> {
    let root = parse_object(body, "tags")?;
    let items = root
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::InvalidResponse {
            message: "waifu.im tags response has no items list".to_string(),
        })?;

    let tags = items.iter().filter_map(RawTag::from_value).collect();

    let has_next = match root.get("hasNextPage").and_then(Value::as_bool) {
        Some(flag) => flag,
        None => {
            let page = root.get("pageNumber").and_then(Value::as_u64);
            let total = root.get("totalPages").and_then(Value::as_u64);
            matches!((page, total), (Some(page), Some(total)) if page < total)
        }
    };

    Ok(TagPage { tags, has_next })
}

#[async_trait]
impl TagSource for WaifuClient {
    async fn fetch_tags(&self) -> FetchResult<Vec<RawTag>> {
        let url = self.backend().tags_url();
        let max_pages = self.backend().max_tag_pages;
        let mut tags = Vec::new();

        for page in 1..=max_pages {
            let query = if page == 1 {
                Vec::new()
            } else {
                vec![("page", page.to_string())]
            };
            let body = self.get(&url, &query).await?;
            let parsed = parse_tag_page(&body)?;
            tracing::debug!("Tag page {page}: {} tags", parsed.tags.len());
            tags.extend(parsed.tags);

            if !parsed.has_next {
                return Ok(tags);
            }
        }

        tracing::warn!("Stopped tag listing after {max_pages} pages");
        Ok(tags)
    }
}
