use once_cell::sync::Lazy;
use regex::Regex;

/// A piece of message content: plain text or a clickable link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSpan {
    Text(String),
    Link(String),
}

static LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"«»]+[^\s<>"«».,;:!?)\]]"#)
        .expect("link pattern is valid")
});

/// Splits message content into text and link spans. Bare `www.` links are
/// given an `https://` scheme so they can be opened directly.
pub fn split_links(text: &str) -> Vec<ContentSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for found in LINK_REGEX.find_iter(text) {
        if found.start() > cursor {
            spans.push(ContentSpan::Text(text[cursor..found.start()].to_string()));
        }
        let link = found.as_str();
        let link = if link.to_ascii_lowercase().starts_with("www.") {
            format!("https://{}", link)
        } else {
            link.to_string()
        };
        spans.push(ContentSpan::Link(link));
        cursor = found.end();
    }

    if cursor < text.len() {
        spans.push(ContentSpan::Text(text[cursor..].to_string()));
    }

    spans
}
