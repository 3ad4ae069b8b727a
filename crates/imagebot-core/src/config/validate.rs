//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.waifu.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "waifu.base_url must not be empty".into(),
            ));
        }
        if self.furry.nsfw_base_url.trim().is_empty() || self.furry.sfw_base_url.trim().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "furry.nsfw_base_url and furry.sfw_base_url must not be empty".into(),
            ));
        }
        if self.limits.min_request_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.min_request_interval_ms must be > 0".into(),
            ));
        }
        if self.limits.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.request_timeout_ms must be > 0".into(),
            ));
        }
        if !(1..=5).contains(&self.limits.max_images_per_request) {
            return Err(ConfigError::ValidationError(
                "limits.max_images_per_request must be between 1 and 5".into(),
            ));
        }
        if self.limits.max_tag_pages == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_tag_pages must be > 0".into(),
            ));
        }
        Ok(())
    }
}
