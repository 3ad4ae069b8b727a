//! Terminal presentation of search results and messages.
//!
//! Results go to stdout; warnings and errors go to stderr.

use console::Style;
use imagebot_core::{result_title, ImageResult, SourceKind};

/// Longest tag string shown for a secondary-backend image.
const FURRY_TAGS_MAX_CHARS: usize = 100;

/// Print images as a JSON array.
pub fn print_json(images: &[ImageResult]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(images)?);
    Ok(())
}

/// Print images as labelled text blocks followed by a footer line.
pub fn print_images(images: &[ImageResult], source: SourceKind, query: Option<&str>, footer: &str) {
    let title = Style::new().cyan().bold();
    let label = Style::new().dim();

    for (index, image) in images.iter().enumerate() {
        println!("{}", title.apply_to(result_title(source, index, query)));
        println!("  {}", image.url);
        println!("  {} {}", label.apply_to("Size:"), image.size_label());

        match source {
            SourceKind::Waifu => {
                println!("  {} {}", label.apply_to("Tags:"), image.tags_label());
                let nsfw = if image.is_nsfw { "Yes" } else { "No" };
                println!("  {} {nsfw}", label.apply_to("NSFW:"));
                if let Some(artist) = &image.artist {
                    println!("  {} {}", label.apply_to("Artist:"), artist.name);
                }
            }
            SourceKind::Furry => {
                let tags = truncate_label(&image.tags_label(), FURRY_TAGS_MAX_CHARS);
                println!("  {} {tags}", label.apply_to("Tags:"));
                println!("  {} {}", label.apply_to("Rating:"), image.rating_label());
                println!("  {} {}", label.apply_to("Score:"), image.score.unwrap_or(0));
            }
        }
        println!();
    }
    println!("{}", label.apply_to(footer));
}

pub fn print_warning(message: &str) {
    eprintln!("{}", Style::new().for_stderr().yellow().apply_to(message));
}

pub fn print_success(message: &str) {
    eprintln!("{}", Style::new().for_stderr().green().apply_to(message));
}

/// Cut `text` to `max_chars` characters, marking the cut with "...".
fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars).collect();
        format!("{kept}...")
    }
}
