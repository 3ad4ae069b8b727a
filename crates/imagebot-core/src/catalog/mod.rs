//! Runtime tag catalog for the primary backend.
//!
//! The catalog holds one immutable [`TagSnapshot`] behind a lock that is
//! only taken to clone or replace an `Arc`. A reload builds the new
//! snapshot completely before swapping it in, so readers see either the old
//! vocabulary or the new one and never wait on the network.

pub mod classify;
pub mod listing;
pub mod snapshot;

pub use classify::{classify, RawTag, KNOWN_NSFW_TAGS, KNOWN_SFW_TAGS};
pub use listing::TagListing;
pub use snapshot::{CatalogCounts, SnapshotOrigin, TagScope, TagSnapshot};

use crate::error::{FetchError, FetchResult};
use crate::source::TagSource;
use std::sync::{Arc, RwLock};

/// Outcome of [`TagCatalog::reload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadStatus {
    /// The upstream vocabulary was fetched and installed
    Fresh { counts: CatalogCounts },
    /// The fetch failed and the built-in vocabulary was installed
    Degraded {
        counts: CatalogCounts,
        cause: FetchError,
    },
}

impl ReloadStatus {
    pub fn counts(&self) -> CatalogCounts {
        match self {
            Self::Fresh { counts } | Self::Degraded { counts, .. } => *counts,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Fetch the upstream vocabulary and classify it, without touching any
/// catalog.
pub async fn fetch_snapshot(source: &dyn TagSource) -> FetchResult<TagSnapshot> {
    let tags = source.fetch_tags().await?;
    if tags.is_empty() {
        return Err(FetchError::InvalidResponse {
            message: "tag listing contained no usable tags".to_string(),
        });
    }
    Ok(classify(&tags))
}

/// Shared, atomically replaceable tag vocabulary.
#[derive(Debug)]
pub struct TagCatalog {
    current: RwLock<Arc<TagSnapshot>>,
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TagCatalog {
    /// An unloaded catalog: every lookup misses until the first reload.
    pub fn new() -> Self {
        Self::with_snapshot(TagSnapshot::empty())
    }

    pub fn with_snapshot(snapshot: TagSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot readers currently see.
    pub fn snapshot(&self) -> Arc<TagSnapshot> {
        // Poisoning cannot leave a half-written Arc behind.
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the current snapshot.
    pub fn install(&self, snapshot: TagSnapshot) {
        let snapshot = Arc::new(snapshot);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = snapshot;
    }

    pub fn origin(&self) -> SnapshotOrigin {
        self.snapshot().origin()
    }

    /// Fetch, classify and install a new vocabulary.
    ///
    /// The fetch-and-classify half is [`fetch_snapshot`], which never touches
    /// shared state; the snapshot (fetched or built-in) is only swapped in
    /// through [`install`](Self::install), so readers never see a partial
    /// vocabulary. On any failure the built-in vocabulary is installed and
    /// the status reports the cause.
    pub async fn reload(&self, source: &dyn TagSource) -> ReloadStatus {
        match fetch_snapshot(source).await {
            Ok(snapshot) => {
                let counts = snapshot.counts();
                self.install(snapshot);
                tracing::info!(
                    "Loaded tags: SFW={}, NSFW={}, Total={}",
                    counts.sfw,
                    counts.nsfw,
                    counts.total
                );
                ReloadStatus::Fresh { counts }
            }
            Err(cause) => {
                let snapshot = TagSnapshot::fallback();
                let counts = snapshot.counts();
                self.install(snapshot);
                tracing::warn!("Failed to load tags ({cause}), using built-in tags");
                ReloadStatus::Degraded { counts, cause }
            }
        }
    }

    /// Whether `tag` may be requested with the given NSFW permission.
    pub fn validate(&self, tag: &str, allow_nsfw: bool) -> bool {
        self.snapshot().contains(tag, TagScope::visible(allow_nsfw))
    }

    /// Visible tags resembling `tag`, at most `limit`.
    pub fn suggest(&self, tag: &str, allow_nsfw: bool, limit: usize) -> Vec<String> {
        let snapshot = self.snapshot();
        let visible = snapshot.tags(TagScope::visible(allow_nsfw));
        listing::suggest(&visible, tag, limit)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Autocomplete choices for a partial tag.
    ///
    /// `scope` is [`TagScope::Nsfw`] for the NSFW-only command and the
    /// visible scope otherwise.
    pub fn autocomplete(&self, input: &str, scope: TagScope) -> Vec<String> {
        let snapshot = self.snapshot();
        let candidates = snapshot.tags(scope);
        let popular = match scope {
            TagScope::Nsfw => listing::POPULAR_NSFW_TAGS,
            TagScope::Sfw | TagScope::All => listing::POPULAR_TAGS,
        };
        listing::autocomplete(&candidates, input, popular, listing::AUTOCOMPLETE_LIMIT)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Paged listing of the SFW view, or of NSFW tags when `nsfw` is set.
    pub fn listing(&self, nsfw: bool, search: Option<&str>) -> TagListing {
        let snapshot = self.snapshot();
        let scope = if nsfw { TagScope::Nsfw } else { TagScope::Sfw };
        TagListing::build(&snapshot.tags(scope), search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Tag source returning a canned result and counting calls.
    struct StaticTags {
        result: FetchResult<Vec<RawTag>>,
        calls: AtomicU32,
    }

    impl StaticTags {
        fn ok(tags: &[(&str, &str)]) -> Self {
            Self {
                result: Ok(tags.iter().map(|(s, d)| RawTag::new(*s, *d)).collect()),
                calls: AtomicU32::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err(FetchError::NetworkFailure {
                    message: "connection refused".to_string(),
                }),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl TagSource for StaticTags {
        async fn fetch_tags(&self) -> FetchResult<Vec<RawTag>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn snapshot(versatile: &[&str], nsfw: &[&str]) -> TagSnapshot {
        let set = |tags: &[&str]| -> BTreeSet<String> {
            tags.iter().map(|t| t.to_string()).collect()
        };
        TagSnapshot::new(set(versatile), set(nsfw), SnapshotOrigin::Fetched)
    }

    #[test]
    fn test_unloaded_catalog_rejects_everything() {
        let catalog = TagCatalog::new();
        assert_eq!(catalog.origin(), SnapshotOrigin::Empty);
        assert!(!catalog.validate("maid", true));
        assert!(catalog.suggest("maid", true, 5).is_empty());
    }

    #[test]
    fn test_validate_respects_nsfw_permission() {
        let catalog = TagCatalog::with_snapshot(snapshot(&["maid", "uniform"], &["hentai"]));
        assert!(catalog.validate("maid", false));
        assert!(catalog.validate("maid", true));
        assert!(!catalog.validate("hentai", false));
        assert!(catalog.validate("hentai", true));
        assert!(!catalog.validate("unknown", true));
    }

    #[test]
    fn test_suggest_respects_nsfw_permission() {
        let catalog = TagCatalog::with_snapshot(snapshot(&["maid"], &["hentai"]));
        assert!(catalog.suggest("hentai", false, 5).is_empty());
        assert_eq!(catalog.suggest("hentai", true, 5), vec!["hentai"]);
        assert_eq!(catalog.suggest("maids", false, 5), vec!["maid"]);
    }

    #[tokio::test]
    async fn test_reload_installs_fetched_snapshot() {
        let catalog = TagCatalog::new();
        let source = StaticTags::ok(&[("maid", ""), ("hentai", ""), ("raiden-shogun", "nude")]);

        let status = catalog.reload(&source).await;
        assert_eq!(
            status,
            ReloadStatus::Fresh {
                counts: CatalogCounts {
                    sfw: 1,
                    nsfw: 2,
                    total: 3
                }
            }
        );
        assert_eq!(catalog.origin(), SnapshotOrigin::Fetched);
        assert!(catalog.validate("maid", false));
        assert!(!catalog.validate("raiden-shogun", false));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reload_failure_installs_fallback() {
        let catalog = TagCatalog::new();
        let status = catalog.reload(&StaticTags::failing()).await;

        assert!(status.is_degraded());
        assert_eq!(status.counts().sfw, 4);
        assert_eq!(status.counts().nsfw, 3);
        let snapshot = catalog.snapshot();
        assert_eq!(snapshot.origin(), SnapshotOrigin::Fallback);
        assert_eq!(
            snapshot.tags(TagScope::Sfw),
            vec!["maid", "selfies", "uniform", "waifu"]
        );
        assert_eq!(snapshot.tags(TagScope::Nsfw), vec!["ecchi", "ero", "hentai"]);
    }

    #[tokio::test]
    async fn test_empty_listing_counts_as_failure() {
        let catalog = TagCatalog::new();
        let status = catalog.reload(&StaticTags::ok(&[])).await;
        assert!(matches!(
            status,
            ReloadStatus::Degraded {
                cause: FetchError::InvalidResponse { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_known_nsfw_tags_never_validate_without_permission() {
        let fetched = StaticTags::ok(&[
            ("hentai", ""),
            ("ecchi", "cute"),
            ("ero", ""),
            ("oral", ""),
            ("paizuri", ""),
            ("ass", "wholesome"),
            ("milf", ""),
            ("maid", ""),
        ]);
        for source in [fetched, StaticTags::failing()] {
            let catalog = TagCatalog::new();
            catalog.reload(&source).await;
            for tag in KNOWN_NSFW_TAGS {
                assert!(!catalog.validate(tag, false), "{tag} visible without NSFW");
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_snapshot_leaves_catalog_untouched() {
        let catalog = TagCatalog::with_snapshot(snapshot(&["maid"], &[]));
        let fetched = fetch_snapshot(&StaticTags::ok(&[("uniform", "")]))
            .await
            .unwrap();

        assert!(catalog.validate("maid", false));
        assert!(!catalog.validate("uniform", false));

        catalog.install(fetched);
        assert!(catalog.validate("uniform", false));
        assert!(!catalog.validate("maid", false));
    }

    #[tokio::test]
    async fn test_old_snapshot_survives_reload() {
        let catalog = TagCatalog::with_snapshot(snapshot(&["maid"], &[]));
        let before = catalog.snapshot();

        catalog.reload(&StaticTags::ok(&[("uniform", "")])).await;

        assert!(before.contains("maid", TagScope::Sfw));
        assert!(!catalog.validate("maid", false));
        assert!(catalog.validate("uniform", false));
    }

    #[test]
    fn test_listing_scopes() {
        let catalog = TagCatalog::with_snapshot(snapshot(&["maid", "ass"], &["ass", "hentai"]));
        assert_eq!(catalog.listing(false, None).pages, vec!["maid"]);
        assert_eq!(catalog.listing(true, None).pages, vec!["ass, hentai"]);
        assert_eq!(catalog.listing(true, Some("HEN")).total, 1);
    }

    #[test]
    fn test_autocomplete_scopes() {
        let catalog = TagCatalog::with_snapshot(snapshot(&["maid", "waifu"], &["ero", "hentai"]));
        assert_eq!(
            catalog.autocomplete("", TagScope::Nsfw),
            vec!["hentai", "ero"]
        );
        assert_eq!(catalog.autocomplete("", TagScope::Sfw), vec!["waifu", "maid"]);
        assert_eq!(catalog.autocomplete("e", TagScope::All), vec!["ero", "hentai"]);
    }
}
