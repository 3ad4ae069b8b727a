//! Immutable tag-catalog snapshots.

use std::collections::BTreeSet;

/// Versatile tags used when the vocabulary cannot be fetched.
pub const FALLBACK_VERSATILE_TAGS: &[&str] = &["waifu", "maid", "uniform", "selfies"];

/// NSFW tags used when the vocabulary cannot be fetched.
pub const FALLBACK_NSFW_TAGS: &[&str] = &["hentai", "ecchi", "ero"];

/// Where a snapshot's contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// Nothing loaded yet
    Empty,
    /// Classified from the upstream vocabulary
    Fetched,
    /// Built-in vocabulary after a failed fetch
    Fallback,
}

/// Which slice of the vocabulary a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagScope {
    /// Versatile tags that are not also NSFW
    Sfw,
    /// NSFW tags only
    Nsfw,
    /// Everything
    All,
}

impl TagScope {
    /// Scope visible to a request with the given NSFW permission.
    pub fn visible(allow_nsfw: bool) -> Self {
        if allow_nsfw {
            Self::All
        } else {
            Self::Sfw
        }
    }
}

/// A fully built view of the tag vocabulary.
///
/// `versatile` and `nsfw` may overlap in source data; the SFW view is always
/// `versatile - nsfw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSnapshot {
    versatile: BTreeSet<String>,
    nsfw: BTreeSet<String>,
    origin: SnapshotOrigin,
}

impl TagSnapshot {
    pub fn new(
        versatile: BTreeSet<String>,
        nsfw: BTreeSet<String>,
        origin: SnapshotOrigin,
    ) -> Self {
        Self {
            versatile,
            nsfw,
            origin,
        }
    }

    pub fn empty() -> Self {
        Self::new(BTreeSet::new(), BTreeSet::new(), SnapshotOrigin::Empty)
    }

    /// The small built-in vocabulary.
    pub fn fallback() -> Self {
        let set = |tags: &[&str]| -> BTreeSet<String> {
            tags.iter().map(|t| t.to_string()).collect()
        };
        Self::new(
            set(FALLBACK_VERSATILE_TAGS),
            set(FALLBACK_NSFW_TAGS),
            SnapshotOrigin::Fallback,
        )
    }

    pub fn origin(&self) -> SnapshotOrigin {
        self.origin
    }

    pub fn versatile(&self) -> &BTreeSet<String> {
        &self.versatile
    }

    pub fn nsfw(&self) -> &BTreeSet<String> {
        &self.nsfw
    }

    /// `versatile ∪ nsfw`.
    pub fn all(&self) -> BTreeSet<&str> {
        self.versatile
            .iter()
            .chain(self.nsfw.iter())
            .map(String::as_str)
            .collect()
    }

    /// `versatile - nsfw`.
    pub fn sfw(&self) -> BTreeSet<&str> {
        self.versatile
            .difference(&self.nsfw)
            .map(String::as_str)
            .collect()
    }

    /// Sorted tags in `scope`.
    pub fn tags(&self, scope: TagScope) -> Vec<&str> {
        match scope {
            TagScope::Sfw => self.sfw().into_iter().collect(),
            TagScope::Nsfw => self.nsfw.iter().map(String::as_str).collect(),
            TagScope::All => self.all().into_iter().collect(),
        }
    }

    /// Whether `tag` is in `scope` (exact, case-sensitive).
    pub fn contains(&self, tag: &str, scope: TagScope) -> bool {
        match scope {
            TagScope::Sfw => self.versatile.contains(tag) && !self.nsfw.contains(tag),
            TagScope::Nsfw => self.nsfw.contains(tag),
            TagScope::All => self.versatile.contains(tag) || self.nsfw.contains(tag),
        }
    }

    pub fn counts(&self) -> CatalogCounts {
        CatalogCounts {
            sfw: self.sfw().len(),
            nsfw: self.nsfw.len(),
            total: self.all().len(),
        }
    }
}

/// Tag counts for display after a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    pub sfw: usize,
    pub nsfw: usize,
    pub total: usize,
}
