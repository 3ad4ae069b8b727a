//! The `imagebot waifu`, `imagebot nsfw` and `imagebot furry` commands.

use super::render;
use super::types::{OrderBy, Orientation};
use clap::Args;
use imagebot_core::{
    Config, FurryBackend, OrchestratorError, RequestOrchestrator, SearchRequest, SourceKind,
};

/// Arguments for the `waifu` command.
#[derive(Args, Debug)]
pub struct WaifuArgs {
    /// Tag to search for (see `imagebot tags list`)
    pub tag: Option<String>,

    /// Allow NSFW images
    #[arg(long)]
    pub nsfw: bool,

    /// Number of images (1-5)
    #[arg(short, long, default_value = "1")]
    pub count: u32,

    /// Tags to exclude, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Only animated images
    #[arg(long, conflicts_with = "still")]
    pub animated: bool,

    /// Only still images
    #[arg(long)]
    pub still: bool,

    /// Image orientation
    #[arg(long, value_enum)]
    pub orientation: Option<Orientation>,

    /// Result ordering
    #[arg(long, value_enum)]
    pub order_by: Option<OrderBy>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl WaifuArgs {
    fn into_request(self) -> SearchRequest {
        let animated = match (self.animated, self.still) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };
        SearchRequest::waifu(self.tag.as_deref(), self.nsfw, self.count)
            .with_excluded_tags(self.exclude)
            .with_animated(animated)
            .with_orientation(self.orientation.map(|o| o.as_param().to_string()))
            .with_order_by(self.order_by.map(|o| o.as_param().to_string()))
    }
}

/// Arguments for the `nsfw` command.
#[derive(Args, Debug)]
pub struct NsfwArgs {
    /// NSFW tag to search for
    pub tag: Option<String>,

    /// Number of images (1-5)
    #[arg(short, long, default_value = "1")]
    pub count: u32,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `furry` command.
#[derive(Args, Debug)]
pub struct FurryArgs {
    /// Tags to search for, e.g. `wolf solo`
    pub tags: Vec<String>,

    /// Query e621 instead of e926
    #[arg(long)]
    pub nsfw: bool,

    /// Number of images (1-5)
    #[arg(short, long, default_value = "1")]
    pub count: u32,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute_waifu(config: &Config, args: WaifuArgs) -> anyhow::Result<()> {
    let json = args.json;
    let request = args.into_request();
    let orchestrator = super::setup(config, true).await?;
    run(&orchestrator, request, json, "Powered by waifu.im").await
}

pub async fn execute_nsfw(config: &Config, args: NsfwArgs) -> anyhow::Result<()> {
    let request = SearchRequest::waifu(args.tag.as_deref(), true, args.count);
    let orchestrator = super::setup(config, true).await?;
    run(&orchestrator, request, args.json, "Powered by waifu.im").await
}

pub async fn execute_furry(config: &Config, args: FurryArgs) -> anyhow::Result<()> {
    let tags = args.tags.join(" ");
    let tags = Some(tags.as_str()).filter(|t| !t.trim().is_empty());
    let request = SearchRequest::furry(tags, args.nsfw, args.count);

    let footer = format!(
        "Powered by {}",
        FurryBackend::from_config(config).host_label(args.nsfw)
    );
    // e621 tags are free-form, so no catalog is needed.
    let orchestrator = super::setup(config, false).await?;
    run(&orchestrator, request, args.json, &footer).await
}

async fn run(
    orchestrator: &RequestOrchestrator,
    request: SearchRequest,
    json: bool,
    footer: &str,
) -> anyhow::Result<()> {
    let source = request.source;
    let query = (!request.tags.is_empty()).then(|| request.tags.join(match source {
        SourceKind::Waifu => ", ",
        SourceKind::Furry => " ",
    }));

    match orchestrator.fulfill(request).await {
        Ok(images) if json => render::print_json(&images),
        Ok(images) => {
            render::print_images(&images, source, query.as_deref(), footer);
            Ok(())
        }
        Err(OrchestratorError::NoResults) => {
            render::print_warning(&OrchestratorError::NoResults.user_message());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Request failed: {e}");
            anyhow::bail!("{}", e.user_message())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        waifu: WaifuArgs,
    }

    #[test]
    fn test_waifu_args_build_request() {
        let cli = TestCli::parse_from([
            "test",
            "maid",
            "--count",
            "9",
            "--exclude",
            "oppai,ass",
            "--still",
            "--orientation",
            "portrait",
            "--order-by",
            "favorites",
        ]);
        let request = cli.waifu.into_request();

        assert_eq!(request.tags, vec!["maid"]);
        assert!(!request.nsfw);
        assert_eq!(request.count, 5);
        assert_eq!(request.excluded_tags, vec!["oppai", "ass"]);
        assert_eq!(request.is_animated, Some(false));
        assert_eq!(request.orientation.as_deref(), Some("PORTRAIT"));
        assert_eq!(request.order_by.as_deref(), Some("FAVORITES"));
    }

    #[test]
    fn test_waifu_args_defaults() {
        let cli = TestCli::parse_from(["test"]);
        let request = cli.waifu.into_request();
        assert!(request.tags.is_empty());
        assert_eq!(request.count, 1);
        assert_eq!(request.is_animated, None);
        assert!(request.excluded_tags.is_empty());
    }
}
