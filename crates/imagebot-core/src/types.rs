//! Core data types shared by the clients, the tag catalog and the front end.
//!
//! Both backends normalize into [`ImageResult`], so callers never see the
//! upstream payload shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard cap on images returned for one request.
pub const MAX_IMAGES_PER_REQUEST: u32 = 5;

/// Which upstream API a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// waifu.im: tag catalog, per-item NSFW flag
    Waifu,
    /// e621 / e926: free-form tags, NSFW chosen by host
    Furry,
}

impl SourceKind {
    /// Short lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waifu => "waifu",
            Self::Furry => "furry",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tag attached to an image, as received from upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
}

impl TagRef {
    /// Build a tag reference, rejecting blank names.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            None
        } else {
            Some(Self { name })
        }
    }
}

/// Credited artist of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

/// Content rating reported by the secondary backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Safe,
    Questionable,
    Explicit,
}

impl Rating {
    /// Parse the single-letter upstream code (`s`, `q`, `e`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "s" | "safe" => Some(Self::Safe),
            "q" | "questionable" => Some(Self::Questionable),
            "e" | "explicit" => Some(Self::Explicit),
            _ => None,
        }
    }

    /// Single-letter code as used upstream.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Safe => "s",
            Self::Questionable => "q",
            Self::Explicit => "e",
        }
    }
}

/// One image, normalized from either backend.
///
/// `url` is always non-empty: items without a resolvable URL are dropped
/// during normalization and never reach this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    pub is_nsfw: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_color: Option<String>,

    pub tags: Vec<TagRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<Artist>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl ImageResult {
    /// Minimal result with only the URL and NSFW flag set.
    pub fn new(url: impl Into<String>, is_nsfw: bool) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
            is_nsfw,
            dominant_color: None,
            tags: Vec::new(),
            artist: None,
            rating: None,
            score: None,
        }
    }

    /// "WxH", with `?` for unknown dimensions.
    pub fn size_label(&self) -> String {
        let dim = |d: Option<u32>| d.map_or_else(|| "?".to_string(), |v| v.to_string());
        format!("{}x{}", dim(self.width), dim(self.height))
    }

    /// Comma-joined tag names, or "None" when untagged.
    pub fn tags_label(&self) -> String {
        if self.tags.is_empty() {
            "None".to_string()
        } else {
            self.tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Uppercased rating code, or "UNKNOWN".
    pub fn rating_label(&self) -> String {
        self.rating
            .map_or_else(|| "UNKNOWN".to_string(), |r| r.code().to_uppercase())
    }
}

/// A search for images against one backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub source: SourceKind,

    /// Included tags, in the order the user gave them
    pub tags: Vec<String>,

    /// NSFW permission, already resolved by the caller
    pub nsfw: bool,

    /// Requested image count, always within 1..=5
    pub count: u32,

    /// Tags to exclude (primary backend only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_tags: Vec<String>,

    /// Restrict to animated / still images (primary backend only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_animated: Option<bool>,

    /// "LANDSCAPE" or "PORTRAIT" (primary backend only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,

    /// Upstream ordering, e.g. "FAVORITES" (primary backend only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl SearchRequest {
    /// Build a request, clamping `count` into `1..=MAX_IMAGES_PER_REQUEST`.
    pub fn new(source: SourceKind, tags: Vec<String>, nsfw: bool, count: u32) -> Self {
        Self {
            source,
            tags,
            nsfw,
            count: clamp_count(count),
            excluded_tags: Vec::new(),
            is_animated: None,
            orientation: None,
            order_by: None,
        }
    }

    /// Random primary-backend request with a single optional tag.
    pub fn waifu(tag: Option<&str>, nsfw: bool, count: u32) -> Self {
        let tags = tag.map(|t| vec![t.to_string()]).unwrap_or_default();
        Self::new(SourceKind::Waifu, tags, nsfw, count)
    }

    /// Secondary-backend request from a space-separated tag string.
    pub fn furry(tags: Option<&str>, nsfw: bool, count: u32) -> Self {
        let tags = tags
            .map(|t| t.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        Self::new(SourceKind::Furry, tags, nsfw, count)
    }

    pub fn with_excluded_tags(mut self, tags: Vec<String>) -> Self {
        self.excluded_tags = tags;
        self
    }

    pub fn with_animated(mut self, animated: Option<bool>) -> Self {
        self.is_animated = animated;
        self
    }

    pub fn with_orientation(mut self, orientation: Option<String>) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_order_by(mut self, order_by: Option<String>) -> Self {
        self.order_by = order_by;
        self
    }
}

/// Clamp a requested image count into `1..=MAX_IMAGES_PER_REQUEST`.
pub fn clamp_count(count: u32) -> u32 {
    count.clamp(1, MAX_IMAGES_PER_REQUEST)
}

/// Display title for the `index`-th (0-based) image of a result set.
pub fn result_title(source: SourceKind, index: usize, query: Option<&str>) -> String {
    let prefix = match source {
        SourceKind::Waifu => "Waifu",
        SourceKind::Furry => "Furry",
    };
    match query {
        Some(q) if !q.is_empty() => format!("{prefix} #{} - {q}", index + 1),
        _ => format!("{prefix} #{}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(SearchRequest::waifu(None, false, 7).count, 5);
        assert_eq!(SearchRequest::waifu(None, false, 0).count, 1);
        assert_eq!(SearchRequest::waifu(None, false, 3).count, 3);
    }

    #[test]
    fn test_furry_tags_split_on_whitespace() {
        let req = SearchRequest::furry(Some("  wolf   solo "), true, 2);
        assert_eq!(req.tags, vec!["wolf", "solo"]);
        assert!(req.nsfw);
        assert_eq!(req.source, SourceKind::Furry);
    }

    #[test]
    fn test_tag_ref_rejects_blank() {
        assert!(TagRef::new("").is_none());
        assert!(TagRef::new("   ").is_none());
        assert_eq!(TagRef::new("maid").unwrap().name, "maid");
    }

    #[test]
    fn test_rating_codes() {
        assert_eq!(Rating::from_code("e"), Some(Rating::Explicit));
        assert_eq!(Rating::from_code("S"), Some(Rating::Safe));
        assert_eq!(Rating::from_code("x"), None);
        assert_eq!(Rating::Questionable.code(), "q");
    }

    #[test]
    fn test_labels() {
        let mut image = ImageResult::new("https://x/1.png", false);
        assert_eq!(image.size_label(), "?x?");
        assert_eq!(image.tags_label(), "None");
        assert_eq!(image.rating_label(), "UNKNOWN");

        image.width = Some(800);
        image.height = Some(600);
        image.tags = vec![TagRef::new("maid").unwrap(), TagRef::new("uniform").unwrap()];
        image.rating = Some(Rating::Safe);
        assert_eq!(image.size_label(), "800x600");
        assert_eq!(image.tags_label(), "maid, uniform");
        assert_eq!(image.rating_label(), "S");
    }

    #[test]
    fn test_result_title() {
        assert_eq!(result_title(SourceKind::Waifu, 0, None), "Waifu #1");
        assert_eq!(result_title(SourceKind::Waifu, 1, Some("maid")), "Waifu #2 - maid");
        assert_eq!(result_title(SourceKind::Furry, 2, Some("")), "Furry #3");
    }

    #[test]
    fn test_image_result_serializes_without_empty_options() {
        let image = ImageResult::new("https://x/1.png", true);
        let json = serde_json::to_string(&image).unwrap();
        assert!(!json.contains("artist"));
        assert!(json.contains("\"is_nsfw\":true"));
    }
}
