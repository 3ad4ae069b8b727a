//! Tag classification into NSFW and versatile buckets.
//!
//! Precedence: the fixed NSFW list, then the fixed SFW list, then a keyword
//! scan of the tag description. Classification is a pure function of the
//! raw tag list, so the same input always yields the same snapshot.

use serde_json::Value;
use std::collections::BTreeSet;

use super::snapshot::{SnapshotOrigin, TagSnapshot};

/// Tags that are always NSFW regardless of description.
pub const KNOWN_NSFW_TAGS: &[&str] = &["hentai", "ecchi", "ero", "oral", "paizuri", "ass", "milf"];

/// Tags that are always versatile regardless of description.
pub const KNOWN_SFW_TAGS: &[&str] = &["waifu", "maid", "uniform", "selfies", "oppai"];

/// Description keywords marking a tag as NSFW (case-insensitive substring).
pub const NSFW_DESCRIPTION_KEYWORDS: &[&str] = &["nsfw", "explicit", "sexual", "erotic", "nude"];

/// A tag as listed by the upstream vocabulary endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    /// Identifier used in search queries
    pub slug: String,
    /// Free-text description, empty if upstream gave none
    pub description: String,
}

impl RawTag {
    pub fn new(slug: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            description: description.into(),
        }
    }

    /// Parse one entry of the tag listing.
    ///
    /// Prefers `slug`; otherwise lowercases `name`. Bare strings are taken
    /// as slugs. Entries with neither yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let (slug, description) = match value {
            Value::String(s) => (s.clone(), String::new()),
            Value::Object(map) => {
                let slug = map
                    .get("slug")
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
                    .or_else(|| {
                        map.get("name")
                            .and_then(Value::as_str)
                            .map(str::to_lowercase)
                    })?;
                let description = map
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                (slug, description)
            }
            _ => return None,
        };

        let slug = slug.trim().to_string();
        if slug.is_empty() {
            None
        } else {
            Some(Self { slug, description })
        }
    }
}

/// Whether a single tag belongs in the NSFW bucket.
pub fn is_nsfw_tag(tag: &RawTag) -> bool {
    let slug = tag.slug.to_lowercase();
    if KNOWN_NSFW_TAGS.contains(&slug.as_str()) {
        return true;
    }
    if KNOWN_SFW_TAGS.contains(&slug.as_str()) {
        return false;
    }
    let description = tag.description.to_lowercase();
    NSFW_DESCRIPTION_KEYWORDS
        .iter()
        .any(|keyword| description.contains(keyword))
}

/// Classify a fetched vocabulary into a snapshot.
pub fn classify(tags: &[RawTag]) -> TagSnapshot {
    let mut versatile = BTreeSet::new();
    let mut nsfw = BTreeSet::new();
    for tag in tags {
        if is_nsfw_tag(tag) {
            nsfw.insert(tag.slug.clone());
        } else {
            versatile.insert(tag.slug.clone());
        }
    }
    TagSnapshot::new(versatile, nsfw, SnapshotOrigin::Fetched)
}
