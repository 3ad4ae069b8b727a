//! The `imagebot tags` command for the waifu.im tag catalog.

use super::render;
use clap::{Args, Subcommand};
use console::Style;
use imagebot_core::{Config, ReloadStatus, TagScope};

/// Arguments for the `tags` command.
#[derive(Args, Debug)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

/// Subcommands for the tag catalog.
#[derive(Subcommand, Debug)]
pub enum TagsCommand {
    /// List available tags
    List {
        /// List NSFW tags instead of SFW tags
        #[arg(long)]
        nsfw: bool,

        /// Only tags containing this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Complete a partial tag name
    Complete {
        /// Partial tag (empty shows popular tags)
        #[arg(default_value = "")]
        input: String,

        /// Complete against NSFW tags only
        #[arg(long, conflicts_with = "all")]
        nsfw: bool,

        /// Complete against every tag, as a request allowing NSFW would see
        #[arg(long)]
        all: bool,
    },

    /// Reload the tag catalog and show counts
    Reload,
}

/// Execute the tags command.
pub async fn execute(config: &Config, args: TagsArgs) -> anyhow::Result<()> {
    match args.command {
        TagsCommand::List { nsfw, search } => {
            let orchestrator = super::setup(config, true).await?;
            let listing = orchestrator.catalog().listing(nsfw, search.as_deref());
            let kind = if nsfw { "NSFW" } else { "SFW" };

            if listing.is_empty() {
                match search {
                    Some(search) => render::print_warning(&format!(
                        "No {kind} tags found matching '{search}'"
                    )),
                    None => render::print_warning(&format!("No {kind} tags available")),
                }
                return Ok(());
            }

            let heading = Style::new().cyan().bold();
            let title = match &search {
                Some(search) => format!("{kind} tags matching '{search}' ({})", listing.total),
                None => format!("{kind} tags ({})", listing.total),
            };
            println!("{}", heading.apply_to(title));
            for (index, page) in listing.pages.iter().enumerate() {
                if listing.pages.len() > 1 {
                    println!("{}", Style::new().dim().apply_to(format!("Page {}", index + 1)));
                }
                println!("{page}");
            }
            if listing.truncated {
                render::print_warning(&format!(
                    "Showing the first {} pages. Use --search to narrow the list.",
                    listing.pages.len()
                ));
            }
            println!();
            println!("Use `imagebot waifu <tag>` to search by tag");
        }

        TagsCommand::Complete { input, nsfw, all } => {
            let orchestrator = super::setup(config, true).await?;
            let scope = completion_scope(nsfw, all);
            for tag in orchestrator.catalog().autocomplete(&input, scope) {
                println!("{tag}");
            }
        }

        TagsCommand::Reload => {
            let orchestrator = super::setup(config, false).await?;
            let status = orchestrator.reload_tags().await;
            let counts = status.counts();
            match &status {
                ReloadStatus::Fresh { .. } => render::print_success("Tags reloaded"),
                ReloadStatus::Degraded { cause, .. } => render::print_warning(&format!(
                    "Tag reload failed, using built-in tags: {}",
                    cause.user_message()
                )),
            }
            println!("SFW tags:  {}", counts.sfw);
            println!("NSFW tags: {}", counts.nsfw);
            println!("Total:     {}", counts.total);
        }
    }

    Ok(())
}

/// Catalog slice offered by `tags complete`.
///
/// `--nsfw` mirrors the NSFW-only command; `--all` mirrors a regular search
/// with NSFW allowed.
fn completion_scope(nsfw: bool, all: bool) -> TagScope {
    if nsfw {
        TagScope::Nsfw
    } else {
        TagScope::visible(all)
    }
}
