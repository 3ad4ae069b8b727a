//! Shared helpers for the HTTP-level tests.

#![allow(dead_code)]

use imagebot_core::source::{
    ClientSettings, FurryBackend, FurryClient, WaifuBackend, WaifuClient,
};
use std::time::Duration;
use wiremock::MockServer;

/// Settings with negligible pacing so tests only wait where they mean to.
pub fn fast_settings() -> ClientSettings {
    ClientSettings {
        min_interval: Duration::from_millis(1),
        request_timeout: Duration::from_secs(5),
        default_retry_after: Duration::from_millis(10),
    }
}

pub fn waifu_client(server: &MockServer) -> WaifuClient {
    let backend = WaifuBackend::new(&server.uri(), Some("test-token".to_string()), "imagebot-tests");
    WaifuClient::new(backend, fast_settings()).unwrap()
}

/// e621 and e926 backed by separate mock servers.
pub fn furry_client(nsfw: &MockServer, sfw: &MockServer) -> FurryClient {
    let backend = FurryBackend::new(&nsfw.uri(), &sfw.uri(), "imagebot-tests");
    FurryClient::new(backend, fast_settings()).unwrap()
}

/// Settings with a real minimum interval between requests.
pub fn paced_settings(min_interval: Duration) -> ClientSettings {
    ClientSettings {
        min_interval,
        ..fast_settings()
    }
}

pub fn paced_waifu_client(server: &MockServer, min_interval: Duration) -> WaifuClient {
    let backend = WaifuBackend::new(&server.uri(), Some("test-token".to_string()), "imagebot-tests");
    WaifuClient::new(backend, paced_settings(min_interval)).unwrap()
}

pub fn paced_furry_client(
    nsfw: &MockServer,
    sfw: &MockServer,
    min_interval: Duration,
) -> FurryClient {
    let backend = FurryBackend::new(&nsfw.uri(), &sfw.uri(), "imagebot-tests");
    FurryClient::new(backend, paced_settings(min_interval)).unwrap()
}
