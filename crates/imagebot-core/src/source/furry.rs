//! e621 / e926 backend (secondary).
//!
//! Both hosts serve `GET /posts.json`; the host queried decides whether
//! explicit posts can come back, so posts carry no NSFW flag of their own.

use super::{dimension_field, str_field, Backend};
use crate::config::Config;
use crate::error::{FetchError, FetchResult};
use crate::types::{ImageResult, Rating, SearchRequest, SourceKind, TagRef};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;

/// Largest `limit` the posts endpoint accepts.
pub const FURRY_MAX_LIMIT: u32 = 320;

/// Sentinel tag asking upstream for a random ordering.
pub const RANDOM_ORDER_TAG: &str = "order:random";

/// Number of general tags kept per post.
const MAX_TAGS_PER_POST: usize = 5;

/// e621/e926 URL and payload conventions.
#[derive(Debug, Clone)]
pub struct FurryBackend {
    nsfw_base_url: String,
    sfw_base_url: String,
    user_agent: String,
}

impl FurryBackend {
    pub fn new(nsfw_base_url: &str, sfw_base_url: &str, user_agent: &str) -> Self {
        Self {
            nsfw_base_url: nsfw_base_url.trim_end_matches('/').to_string(),
            sfw_base_url: sfw_base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.furry.nsfw_base_url,
            &config.furry.sfw_base_url,
            &config.furry.user_agent,
        )
    }

    /// Host queried for a request with the given NSFW permission.
    pub fn base_url(&self, nsfw: bool) -> &str {
        if nsfw {
            &self.nsfw_base_url
        } else {
            &self.sfw_base_url
        }
    }

    /// Hostname shown to users as the source of the results.
    pub fn host_label(&self, nsfw: bool) -> &str {
        let base = self.base_url(nsfw);
        base.split_once("://").map_or(base, |(_, host)| host)
    }
}

impl Backend for FurryBackend {
    fn kind(&self) -> SourceKind {
        SourceKind::Furry
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        match HeaderValue::from_str(&self.user_agent) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(_) => tracing::warn!("Ignoring invalid e621 user agent"),
        }
        headers
    }

    fn search_url(&self, request: &SearchRequest) -> String {
        format!("{}/posts.json", self.base_url(request.nsfw))
    }

    fn search_query(&self, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut tags: Vec<&str> = request.tags.iter().map(String::as_str).collect();
        tags.push(RANDOM_ORDER_TAG);
        vec![
            ("limit", request.count.min(FURRY_MAX_LIMIT).to_string()),
            ("tags", tags.join(" ")),
        ]
    }

    fn normalize(&self, body: &str, request: &SearchRequest) -> FetchResult<Vec<ImageResult>> {
        let root: Value = serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse {
            message: format!("e621 posts response is not JSON: {e}"),
        })?;
        if !root.is_object() {
            return Err(FetchError::InvalidResponse {
                message: "e621 posts response is not a JSON object".to_string(),
            });
        }

        Ok(root
            .get("posts")
            .and_then(Value::as_array)
            .map(|posts| {
                posts
                    .iter()
                    .filter_map(|post| normalize_post(post, request.nsfw))
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn normalize_post(post: &Value, requested_nsfw: bool) -> Option<ImageResult> {
    let file = post.get("file")?;
    let url = str_field(file, "url")?;

    let tags = post
        .get("tags")
        .and_then(|t| t.get("general"))
        .and_then(Value::as_array)
        .map(|general| {
            general
                .iter()
                .filter_map(Value::as_str)
                .filter_map(TagRef::new)
                .take(MAX_TAGS_PER_POST)
                .collect()
        })
        .unwrap_or_default();

    let score = post
        .get("score")
        .and_then(|s| s.get("total"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    Some(ImageResult {
        url: url.to_string(),
        width: dimension_field(file, "width"),
        height: dimension_field(file, "height"),
        is_nsfw: requested_nsfw,
        dominant_color: None,
        tags,
        artist: None,
        rating: str_field(post, "rating").and_then(Rating::from_code),
        score: Some(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> FurryBackend {
        FurryBackend::new("https://e621.net", "https://e926.net/", "test-agent")
    }

    #[test]
    fn test_host_selects_nsfw() {
        let backend = backend();
        let sfw = SearchRequest::furry(None, false, 1);
        let nsfw = SearchRequest::furry(None, true, 1);
        assert_eq!(backend.search_url(&sfw), "https://e926.net/posts.json");
        assert_eq!(backend.search_url(&nsfw), "https://e621.net/posts.json");
        assert_eq!(backend.host_label(true), "e621.net");
        assert_eq!(backend.host_label(false), "e926.net");
    }

    #[test]
    fn test_random_query_sends_only_sentinel() {
        let request = SearchRequest::furry(None, false, 2);
        let params = backend().search_query(&request);
        assert_eq!(
            params,
            vec![
                ("limit", "2".to_string()),
                ("tags", "order:random".to_string())
            ]
        );
    }

    #[test]
    fn test_tagged_query_appends_sentinel() {
        let mut request = SearchRequest::furry(Some("wolf solo"), true, 1);
        request.count = 1000;
        let params = backend().search_query(&request);
        assert_eq!(params[0], ("limit", "320".to_string()));
        assert_eq!(params[1], ("tags", "wolf solo order:random".to_string()));
    }

    #[test]
    fn test_normalize_maps_fields() {
        let body = json!({
            "posts": [{
                "file": {"url": "https://static1.e926.net/a.png", "width": 500, "height": 400},
                "tags": {"general": ["a", "b", "c", "d", "e", "f", "g"], "species": ["wolf"]},
                "rating": "s",
                "score": {"up": 10, "down": -2, "total": 8}
            }]
        })
        .to_string();
        let request = SearchRequest::furry(None, false, 1);

        let images = backend().normalize(&body, &request).unwrap();
        assert_eq!(images.len(), 1);
        let image = &images[0];
        assert_eq!(image.url, "https://static1.e926.net/a.png");
        assert_eq!(image.size_label(), "500x400");
        assert!(!image.is_nsfw);
        assert_eq!(image.tags_label(), "a, b, c, d, e");
        assert_eq!(image.rating, Some(Rating::Safe));
        assert_eq!(image.score, Some(8));
        assert!(image.dominant_color.is_none());
        assert!(image.artist.is_none());
    }

    #[test]
    fn test_normalize_uses_requested_nsfw_flag() {
        let body = json!({"posts": [{"file": {"url": "https://x/1.png"}, "rating": "s"}]}).to_string();
        let request = SearchRequest::furry(None, true, 1);
        let images = backend().normalize(&body, &request).unwrap();
        assert!(images[0].is_nsfw);
        assert_eq!(images[0].score, Some(0));
        assert!(images[0].tags.is_empty());
    }

    #[test]
    fn test_normalize_drops_posts_without_file_url() {
        // e621 hides URLs of some posts from anonymous users.
        let body = json!({
            "posts": [
                {"file": {"url": null, "width": 1, "height": 1}},
                {"file": {}},
                {"tags": {"general": ["x"]}},
                {"file": {"url": "https://x/ok.png"}}
            ]
        })
        .to_string();
        let request = SearchRequest::furry(None, false, 5);
        let images = backend().normalize(&body, &request).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "https://x/ok.png");
    }

    #[test]
    fn test_normalize_rejects_non_json() {
        let request = SearchRequest::furry(None, false, 1);
        assert!(matches!(
            backend().normalize("not json", &request),
            Err(FetchError::InvalidResponse { .. })
        ));
    }
}
