// src/checker/html.rs
// =============================================================================
// This module extracts raw href values from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike a browser we do NOT resolve anything here. Every href comes back
// exactly as written, in document order; normalize.rs decides what it means.
//
// Rust concepts:
// - Result<T, E>: For operations that can fail
// - Iterators: filter_map over selected elements
// =============================================================================

use crate::error::ParseError;
use scraper::{Html, Selector};

// Extracts every href from every <a> tag that has one
//
// Parameters:
//   body: the raw response body (bytes, must be UTF-8)
//
// Returns: the href values in the order they appear in the document
//
// Example:
//   body = "<a href='/docs'>Docs</a><a>no href</a><a href='#top'>Top</a>"
//   result = ["/docs", "#top"]
pub fn extract_hrefs(body: &[u8]) -> Result<Vec<String>, ParseError> {
    let html = std::str::from_utf8(body)?;

    // Parse the HTML into a document
    let document = Html::parse_document(html);

    // "a[href]" means "all <a> tags that have an href attribute"
    // The selector is a constant, so parsing it can only fail on a typo here
    let selector = Selector::parse("a[href]").expect("a[href] is a valid selector");

    let hrefs = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect();

    Ok(hrefs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keeps_raw_values() {
        let html = br#"<a href="https://www.rust-lang.org">Rust</a><a href="/docs">Docs</a>"#;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec!["https://www.rust-lang.org", "/docs"]);
    }

    #[test]
    fn test_skips_anchors_without_href() {
        let html = br##"<a name="top">Top</a><a href="#top">Back</a>"##;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec!["#top"]);
    }

    #[test]
    fn test_document_order_and_duplicates() {
        let html = br##"
            <header><a href="#">Home</a></header>
            <section>
                <a href="/">Root</a>
                <a href="mysite.com">Site</a>
            </section>
            <footer><div><a href="www.me.cat">Me</a><a href="/">Root again</a></div></footer>
        "##;
        let hrefs = extract_hrefs(html).unwrap();
        assert_eq!(hrefs, vec!["#", "/", "mysite.com", "www.me.cat", "/"]);
    }

    #[test]
    fn test_keeps_empty_href() {
        let html = br#"<a href="">Self</a>"#;
        assert_eq!(extract_hrefs(html).unwrap(), vec![""]);
    }

    #[test]
    fn test_no_links() {
        let html = b"<h1>Hello, World!</h1>";
        assert!(extract_hrefs(html).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        let body = [0x3c, 0x61, 0xff, 0xfe];
        assert!(matches!(extract_hrefs(&body), Err(ParseError::NotUtf8(_))));
    }
}
