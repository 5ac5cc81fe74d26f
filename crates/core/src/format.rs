//! Splits task text into plain runs and links for display.

use once_cell::sync::Lazy;
use regex::Regex;

static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?P<label>[^\]]*)\]\((?P<url>[^)\s]*)\)|(?P<bare>https?://[^\s)]+)")
        .expect("valid regex")
});

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link { text: String, url: String },
}

/// Parses `[label](url)` and bare `http(s)://` links. Text between links is kept verbatim.
pub fn parse_links(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in LINK_PATTERN.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        let (link, end) = if let Some(url) = caps.name("url") {
            let text = caps.name("label").map(|m| m.as_str()).unwrap_or_default();
            (
                Segment::Link {
                    text: text.to_string(),
                    url: url.as_str().to_string(),
                },
                whole.end(),
            )
        } else {
            let raw = whole.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            (
                Segment::Link {
                    text: raw.to_string(),
                    url: raw.to_string(),
                },
                whole.start() + raw.len(),
            )
        };

        if whole.start() > last {
            segments.push(Segment::Text(input[last..whole.start()].to_string()));
        }
        segments.push(link);
        last = end;
    }

    if last < input.len() {
        segments.push(Segment::Text(input[last..].to_string()));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> Segment {
        Segment::Text(value.to_string())
    }

    fn link(label: &str, url: &str) -> Segment {
        Segment::Link {
            text: label.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn splits_markdown_and_bare_links() {
        let segments = parse_links("See [docs](http://x.test/a) and http://x.test/b.");
        assert_eq!(
            segments,
            vec![
                text("See "),
                link("docs", "http://x.test/a"),
                text(" and "),
                link("http://x.test/b", "http://x.test/b"),
                text("."),
            ]
        );
    }

    #[test]
    fn plain_text_is_a_single_segment() {
        assert_eq!(parse_links("Buy milk"), vec![text("Buy milk")]);
        assert!(parse_links("").is_empty());
    }

    #[test]
    fn adjacent_links_keep_the_run_between_them() {
        let segments = parse_links("[a](https://a.test)[b](https://b.test)");
        assert_eq!(
            segments,
            vec![link("a", "https://a.test"), link("b", "https://b.test")]
        );
    }

    #[test]
    fn bare_url_stops_at_closing_paren() {
        let segments = parse_links("(see https://x.test/path) now");
        assert_eq!(
            segments,
            vec![
                text("(see "),
                link("https://x.test/path", "https://x.test/path"),
                text(") now"),
            ]
        );
    }

    #[test]
    fn parsing_is_repeatable() {
        let input = "ship https://x.test/a, then [log](https://x.test/b)";
        assert_eq!(parse_links(input), parse_links(input));
    }
}
