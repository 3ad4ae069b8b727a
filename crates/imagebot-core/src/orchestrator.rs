//! Request orchestration: validate against the tag catalog, delegate to the
//! right upstream client, and fold every outcome into a typed result.

use crate::catalog::{ReloadStatus, TagCatalog};
use crate::config::Config;
use crate::error::OrchestratorError;
use crate::source::{
    ClientSettings, FurryBackend, FurryClient, ImageSource, TagSource, WaifuBackend, WaifuClient,
};
use crate::types::{clamp_count, ImageResult, SearchRequest, SourceKind, MAX_IMAGES_PER_REQUEST};
use std::sync::Arc;
use std::time::Instant;

/// Number of suggestions attached to an unknown-tag failure.
pub const SUGGESTION_LIMIT: usize = 5;

/// Entry point for the front end.
///
/// Owns the tag catalog and one client per backend. Cloning is cheap and
/// every clone shares the same catalog and rate limiters.
#[derive(Clone)]
pub struct RequestOrchestrator {
    catalog: Arc<TagCatalog>,
    waifu: Arc<dyn ImageSource>,
    furry: Arc<dyn ImageSource>,
    tags: Arc<dyn TagSource>,
    max_images: u32,
}

impl RequestOrchestrator {
    /// Assemble an orchestrator from its parts.
    pub fn new(
        catalog: Arc<TagCatalog>,
        waifu: Arc<dyn ImageSource>,
        furry: Arc<dyn ImageSource>,
        tags: Arc<dyn TagSource>,
    ) -> Self {
        Self {
            catalog,
            waifu,
            furry,
            tags,
            max_images: MAX_IMAGES_PER_REQUEST,
        }
    }

    /// Validate `config` and build both HTTP clients from it. The catalog
    /// starts empty; call [`reload_tags`](Self::reload_tags) before serving
    /// primary requests.
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        config.validate()?;
        let settings = ClientSettings::from_config(config);
        let waifu = Arc::new(WaifuClient::new(
            WaifuBackend::from_config(config),
            settings.clone(),
        )?);
        let furry = Arc::new(FurryClient::new(FurryBackend::from_config(config), settings)?);

        Ok(Self::new(
            Arc::new(TagCatalog::new()),
            waifu.clone(),
            furry,
            waifu,
        )
        .with_max_images(config.limits.max_images_per_request))
    }

    /// Lower the per-request image cap (never above the hard cap).
    pub fn with_max_images(mut self, max: u32) -> Self {
        self.max_images = clamp_count(max);
        self
    }

    pub fn catalog(&self) -> &Arc<TagCatalog> {
        &self.catalog
    }

    /// Refresh the tag catalog from the primary backend.
    pub async fn reload_tags(&self) -> ReloadStatus {
        self.catalog.reload(self.tags.as_ref()).await
    }

    /// Serve one search request.
    ///
    /// Primary-backend tags must be visible in the catalog under the
    /// request's NSFW permission. Secondary-backend tags are free-form and
    /// passed through unchecked.
    pub async fn fulfill(
        &self,
        mut request: SearchRequest,
    ) -> Result<Vec<ImageResult>, OrchestratorError> {
        request.count = clamp_count(request.count).min(self.max_images);

        if request.source == SourceKind::Waifu {
            self.check_tags(&request)?;
        }

        let source = match request.source {
            SourceKind::Waifu => &self.waifu,
            SourceKind::Furry => &self.furry,
        };

        let start = Instant::now();
        let mut images = source.search(&request).await.map_err(|e| {
            tracing::warn!(source = %request.source, status = ?e.status(), "Search failed: {e}");
            OrchestratorError::Upstream(e)
        })?;

        if images.is_empty() {
            tracing::info!(source = %request.source, "No results for tags {:?}", request.tags);
            return Err(OrchestratorError::NoResults);
        }

        images.truncate(request.count as usize);
        tracing::debug!(
            source = %request.source,
            "Fulfilled request with {} images in {}ms",
            images.len(),
            start.elapsed().as_millis()
        );
        Ok(images)
    }

    fn check_tags(&self, request: &SearchRequest) -> Result<(), OrchestratorError> {
        for tag in &request.tags {
            if !self.catalog.validate(tag, request.nsfw) {
                let suggestions = self.catalog.suggest(tag, request.nsfw, SUGGESTION_LIMIT);
                tracing::debug!("Rejected tag {tag:?} (nsfw={})", request.nsfw);
                return Err(OrchestratorError::UnknownTag {
                    tag: tag.clone(),
                    suggestions,
                });
            }
        }
        Ok(())
    }
}
