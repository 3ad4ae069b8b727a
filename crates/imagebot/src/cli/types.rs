//! CLI enum types for the search commands: orientation and ordering.

use clap::ValueEnum;

/// Image orientation filter (waifu.im only).
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Value sent upstream.
    pub fn as_param(&self) -> &'static str {
        match self {
            Orientation::Landscape => "LANDSCAPE",
            Orientation::Portrait => "PORTRAIT",
        }
    }
}

/// Result ordering (waifu.im only).
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OrderBy {
    /// Most favorited first
    Favorites,
    /// Most recently uploaded first
    UploadedAt,
    /// Random order (upstream default)
    Random,
}

impl OrderBy {
    /// Value sent upstream.
    pub fn as_param(&self) -> &'static str {
        match self {
            OrderBy::Favorites => "FAVORITES",
            OrderBy::UploadedAt => "UPLOADED_AT",
            OrderBy::Random => "RANDOM",
        }
    }
}
