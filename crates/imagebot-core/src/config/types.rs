//! Sub-configuration structs with defaults matching the public upstream APIs.

use serde::{Deserialize, Serialize};

/// waifu.im (primary backend) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaifuConfig {
    /// API base URL, without trailing slash
    pub base_url: String,

    /// Bearer token (supports ${ENV_VAR} syntax; empty means anonymous)
    pub api_token: String,

    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for WaifuConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.waifu.im".to_string(),
            api_token: "${WAIFU_API_TOKEN}".to_string(),
            user_agent: "WaifuDiscordBot/2.0 (Rust/reqwest)".to_string(),
        }
    }
}

/// e621/e926 (secondary backend) settings.
///
/// The two hosts serve the same API; which one is queried decides whether
/// explicit content can come back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FurryConfig {
    /// Host queried for NSFW requests
    pub nsfw_base_url: String,

    /// Host queried for SFW requests
    pub sfw_base_url: String,

    /// User-Agent sent with every request (e621 rejects anonymous agents)
    pub user_agent: String,
}

impl Default for FurryConfig {
    fn default() -> Self {
        Self {
            nsfw_base_url: "https://e621.net".to_string(),
            sfw_base_url: "https://e926.net".to_string(),
            user_agent: "CatGirlDiscordBot/2.0 (by sqrilizz on GitHub)".to_string(),
        }
    }
}

/// Pacing, timeout and size limits shared by both backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Minimum spacing between two requests to the same backend
    pub min_request_interval_ms: u64,

    /// Per-request HTTP timeout
    pub request_timeout_ms: u64,

    /// Wait used when a 429 carries no usable Retry-After header
    pub default_retry_after_secs: u64,

    /// Upper bound on images returned for a single request (1-5)
    pub max_images_per_request: u32,

    /// Safety bound on tag-listing pages fetched during a catalog reload
    pub max_tag_pages: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_request_interval_ms: 1000,
            request_timeout_ms: 10_000,
            default_retry_after_secs: 5,
            max_images_per_request: 5,
            max_tag_pages: 50,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
///
/// Plain values pass through; empty values and unset variables yield `None`.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
