use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("URL scheme pattern is valid"));

/// Cleans rich-text html from the API so it can be emitted unescaped.
/// Links keep `rel="noopener noreferrer"`; scripts, styles and handlers are dropped.
pub fn sanitize_rich_html(input: &str) -> String {
    ammonia::Builder::default()
        .link_rel(Some("noopener noreferrer"))
        .clean(input)
        .to_string()
}

/// Strips all HTML tags from input (for titles and plain-text fallbacks)
pub fn strip_all_html(input: &str) -> String {
    ammonia::Builder::new()
        .tags(HashSet::new())
        .clean(input)
        .to_string()
}

/// Plain text of an html fragment, with entities decoded so it can go
/// through template escaping once.
pub fn html_to_text(input: &str) -> String {
    html_escape::decode_html_entities(&strip_all_html(input)).into_owned()
}

/// Short label for a source link: scheme removed, first 40 characters kept,
/// and an ellipsis appended when the full URL is longer than 45 characters.
pub fn display_source_url(url: &str) -> String {
    let without_scheme = URL_SCHEME.replace(url, "");
    let mut display: String = without_scheme.chars().take(40).collect();
    if url.chars().count() > 45 {
        display.push('…');
    }
    display
}
