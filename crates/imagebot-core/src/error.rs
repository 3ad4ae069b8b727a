//! Error types for the image relay core.
//!
//! Errors are split by layer: configuration, upstream fetches, and request
//! orchestration. Each user-facing error knows how to describe itself in a
//! short, actionable message so the front end never has to show internals.

use crate::types::SourceKind;
use thiserror::Error;

/// Errors raised while assembling the relay from configuration.
#[derive(Error, Debug)]
pub enum ImagebotError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client for a backend could not be constructed
    #[error("Failed to build {source_kind} HTTP client: {message}")]
    HttpClient {
        source_kind: SourceKind,
        message: String,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures talking to an upstream image API.
///
/// Every transport or protocol failure is folded into one of these variants
/// at the client boundary; nothing above the client sees a `reqwest::Error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No response was received (DNS, connect, TLS, timeout, body read)
    #[error("Network failure: {message}")]
    NetworkFailure { message: String },

    /// Upstream answered with a non-200, non-429 status
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamError { status: u16, body: String },

    /// Upstream kept rejecting us after the single 429 retry
    #[error("Rate limited by upstream (HTTP {status} after retry)")]
    RateLimited { status: u16 },

    /// A 200 whose body did not have the expected shape
    #[error("Invalid upstream response: {message}")]
    InvalidResponse { message: String },
}

impl FetchError {
    /// HTTP status attached to this failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamError { status, .. } | Self::RateLimited { status } => Some(*status),
            Self::NetworkFailure { .. } | Self::InvalidResponse { .. } => None,
        }
    }

    /// Message suitable for showing to the person who made the request.
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkFailure { .. } => {
                "Could not reach the image service. Check the connection and try again in a few seconds."
                    .to_string()
            }
            Self::UpstreamError { status, .. } => format!(
                "The image service returned an error (HTTP {status}). It may be temporarily unavailable; try again later."
            ),
            Self::RateLimited { .. } => {
                "The image service is rate limiting requests. Wait a few seconds and try again."
                    .to_string()
            }
            Self::InvalidResponse { .. } => {
                "The image service returned an invalid response. Try again later.".to_string()
            }
        }
    }
}

/// Failures surfaced by [`crate::RequestOrchestrator::fulfill`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// The requested tag is not visible in the current catalog
    #[error("Unknown tag: {tag}")]
    UnknownTag {
        tag: String,
        suggestions: Vec<String>,
    },

    /// The upstream fetch failed
    #[error(transparent)]
    Upstream(#[from] FetchError),

    /// Upstream answered, but with nothing usable
    #[error("No images found")]
    NoResults,
}

impl OrchestratorError {
    /// Message suitable for showing to the person who made the request.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownTag { tag, suggestions } => {
                let mut msg = format!("Unknown tag: `{tag}`");
                if !suggestions.is_empty() {
                    msg.push_str(&format!("\nDid you mean: {}", suggestions.join(", ")));
                }
                msg.push_str("\nUse `imagebot tags list` to view all available tags");
                msg
            }
            Self::Upstream(e) => e.user_message(),
            Self::NoResults => {
                "No images found for your request. Try different parameters.".to_string()
            }
        }
    }
}

/// Result of building clients and the orchestrator.
pub type Result<T> = std::result::Result<T, ImagebotError>;

/// Convenience type alias for upstream fetch results.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
