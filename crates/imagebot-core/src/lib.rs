//! Imagebot Core - rate-limited image search relay.
//!
//! Imagebot fetches images from two public APIs and hands back a normalized
//! result list: waifu.im (tag catalog, per-image NSFW flag) and e621/e926
//! (free-form tags, NSFW chosen by host).
//!
//! # Architecture
//!
//! ```text
//! front end → RequestOrchestrator → TagCatalog (validation)
//!                                 → ImageSourceClient → RateLimiter → HTTP
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use imagebot_core::{Config, RequestOrchestrator, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let orchestrator = RequestOrchestrator::from_config(&config)?;
//!     orchestrator.reload_tags().await;
//!
//!     let images = orchestrator
//!         .fulfill(SearchRequest::waifu(Some("maid"), false, 3))
//!         .await?;
//!     for image in images {
//!         println!("{}", image.url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod source;
pub mod types;

pub use catalog::{CatalogCounts, ReloadStatus, SnapshotOrigin, TagCatalog, TagListing, TagScope};
pub use config::Config;
pub use error::{ConfigError, FetchError, FetchResult, ImagebotError, OrchestratorError, Result};
pub use orchestrator::RequestOrchestrator;
pub use source::{FurryBackend, ImageSource, TagSource, WaifuBackend};
pub use types::{result_title, ImageResult, Rating, SearchRequest, SourceKind, TagRef};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
