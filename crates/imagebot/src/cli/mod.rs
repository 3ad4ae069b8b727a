//! Command implementations for the imagebot CLI.

pub mod config;
pub mod render;
pub mod search;
pub mod tags;
pub mod types;

use imagebot_core::{Config, ReloadStatus, RequestOrchestrator};

/// Build the orchestrator and, when `load_tags` is set, load the tag
/// catalog before returning.
pub(crate) async fn setup(
    config: &Config,
    load_tags: bool,
) -> imagebot_core::Result<RequestOrchestrator> {
    let orchestrator = RequestOrchestrator::from_config(config)?;
    if load_tags {
        if let ReloadStatus::Degraded { cause, .. } = orchestrator.reload_tags().await {
            render::print_warning(&format!(
                "Could not load the waifu.im tag list ({}). Using built-in tags.",
                cause.user_message()
            ));
        }
    }
    Ok(orchestrator)
}
