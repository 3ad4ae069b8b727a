//! Tag lookup helpers for display: suggestions, autocomplete and paged
//! listings.

/// Longest page of comma-joined tags in a listing.
pub const LISTING_PAGE_CHARS: usize = 900;

/// Most pages returned by a listing before it is marked truncated.
pub const LISTING_MAX_PAGES: usize = 5;

/// Most autocomplete choices returned.
pub const AUTOCOMPLETE_LIMIT: usize = 25;

/// Popular SFW tags shown first when autocomplete input is empty.
pub const POPULAR_TAGS: &[&str] = &["waifu", "maid", "uniform", "selfies", "oppai", "ass"];

/// Popular NSFW tags shown first when NSFW autocomplete input is empty.
pub const POPULAR_NSFW_TAGS: &[&str] = &["hentai", "ecchi", "ero", "ass", "oppai"];

/// Candidates that contain `query` or are contained in it (case-insensitive).
pub fn suggest<'a>(candidates: &[&'a str], query: &str, limit: usize) -> Vec<&'a str> {
    let query = query.to_lowercase();
    candidates
        .iter()
        .copied()
        .filter(|candidate| {
            let candidate = candidate.to_lowercase();
            candidate.contains(&query) || query.contains(&candidate)
        })
        .take(limit)
        .collect()
}

/// Autocomplete ordering: exact, then prefix, then substring matches.
///
/// With empty input, the `popular` tags that exist come first, then the rest
/// in candidate order.
pub fn autocomplete<'a>(
    candidates: &[&'a str],
    input: &str,
    popular: &[&str],
    limit: usize,
) -> Vec<&'a str> {
    let input = input.trim().to_lowercase();

    if input.is_empty() {
        let leading = popular
            .iter()
            .filter_map(|p| candidates.iter().copied().find(|c| c == p));
        let rest = candidates
            .iter()
            .copied()
            .filter(|c| !popular.contains(c));
        return leading.chain(rest).take(limit).collect();
    }

    let lowered: Vec<(&'a str, String)> = candidates
        .iter()
        .map(|c| (*c, c.to_lowercase()))
        .collect();
    let exact = lowered.iter().filter(|(_, l)| *l == input);
    let prefix = lowered
        .iter()
        .filter(|(_, l)| *l != input && l.starts_with(&input));
    let contains = lowered
        .iter()
        .filter(|(_, l)| !l.starts_with(&input) && l.contains(&input));

    exact
        .chain(prefix)
        .chain(contains)
        .map(|(c, _)| *c)
        .take(limit)
        .collect()
}

/// A paged, comma-joined tag listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagListing {
    /// Number of tags matching the filter
    pub total: usize,
    /// Comma-joined pages, at most [`LISTING_MAX_PAGES`]
    pub pages: Vec<String>,
    /// Whether pages were dropped to respect the page cap
    pub truncated: bool,
}

impl TagListing {
    /// Filter `tags` by `search` (case-insensitive substring) and page them.
    pub fn build(tags: &[&str], search: Option<&str>) -> Self {
        let search = search.map(str::to_lowercase).filter(|s| !s.is_empty());
        let mut matching: Vec<&str> = tags
            .iter()
            .copied()
            .filter(|tag| {
                search
                    .as_deref()
                    .map_or(true, |s| tag.to_lowercase().contains(s))
            })
            .collect();
        matching.sort_unstable();
        matching.dedup();

        let mut pages = chunk_tags(&matching, LISTING_PAGE_CHARS);
        let truncated = pages.len() > LISTING_MAX_PAGES;
        pages.truncate(LISTING_MAX_PAGES);

        Self {
            total: matching.len(),
            pages,
            truncated,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Split sorted tags into comma-joined pages of at most `max_chars`.
///
/// Each tag is budgeted with its trailing `", "`. A single tag longer than
/// the budget still gets a page of its own.
pub fn chunk_tags(tags: &[&str], max_chars: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for &tag in tags {
        let cost = tag.len() + 2;
        if current_len + cost > max_chars && !current.is_empty() {
            pages.push(current.join(", "));
            current.clear();
            current_len = 0;
        }
        current.push(tag);
        current_len += cost;
    }
    if !current.is_empty() {
        pages.push(current.join(", "));
    }
    pages
}
