use regex::Regex;
use std::sync::LazyLock;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>)]+"#).unwrap());

/// First http(s) URL inside a description blob, if any.
///
/// Release descriptions bury the download link in prose or markup; we only
/// need the first one.
pub fn find_first_link(text: &str) -> Option<String> {
    LINK_RE.find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_link_in_prose() {
        let text = "Get it here: https://example.com/votv/pa0081_0008.zip and enjoy";
        assert_eq!(
            find_first_link(text).as_deref(),
            Some("https://example.com/votv/pa0081_0008.zip")
        );
    }

    #[test]
    fn test_find_first_link_in_markup() {
        let html = r#"<p>Changelog</p><a href="http://dl.example.com/a.7z">download</a>"#;
        assert_eq!(
            find_first_link(html).as_deref(),
            Some("http://dl.example.com/a.7z")
        );
    }

    #[test]
    fn test_find_first_link_none() {
        assert_eq!(find_first_link("no links in here"), None);
        assert_eq!(find_first_link(""), None);
    }
}
