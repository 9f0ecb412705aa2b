//! Page extraction module
//!
//! Turns raw HTML into the two things the pipeline persists: the plain text
//! of the page body (with scripts and other executable content stripped) and
//! the set of image URLs referenced from the body.
//!
//! Parsing happens synchronously and only owned data leaves this module, so
//! the parsed DOM is never held across an `.await`.

mod error;
mod images;
mod sanitize;

pub use error::ExtractError;
pub use images::discover_images;
pub use sanitize::{DEFAULT_STRIP_SELECTORS, Sanitizer};

use std::collections::BTreeSet;

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Text and image references extracted from a page body
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPage {
    /// Plain text content of the sanitized body
    pub text: String,

    /// Deduplicated, absolute image URLs found under the body
    pub image_urls: BTreeSet<Url>,
}

/// Locate the `<body>` element of a parsed document
pub fn locate_body(document: &Html) -> Result<ElementRef<'_>, ExtractError> {
    let selector = Selector::parse("body")
        .map_err(|e| ExtractError::HtmlParse(format!("Failed to parse body selector: {}", e)))?;

    document
        .select(&selector)
        .next()
        .ok_or(ExtractError::MissingBody)
}

/// Parse `html` and extract the body text and image URLs
///
/// # Arguments
///
/// * `html` - Raw response bytes; invalid UTF-8 is replaced lossily
/// * `base` - URL the page was fetched from, used to resolve relative image sources
/// * `strip_selectors` - CSS selectors for elements removed before text extraction
pub fn extract_page(
    html: &[u8],
    base: &Url,
    strip_selectors: &[String],
) -> Result<ExtractedPage, ExtractError> {
    let source = String::from_utf8_lossy(html);
    if source.trim().is_empty() {
        return Err(ExtractError::HtmlParse("Document is empty".to_string()));
    }

    let document = Html::parse_document(&source);
    let body = locate_body(&document)?;

    let text = Sanitizer::new(strip_selectors).text(body);
    let image_urls = discover_images(body, base);

    Ok(ExtractedPage { text, image_urls })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_selectors() -> Vec<String> {
        DEFAULT_STRIP_SELECTORS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_page() {
        let html = br#"<html>
            <head><title>Ignored title</title><script>var x = 1;</script></head>
            <body>
                <h1 onclick="track()">Welcome</h1>
                <p>Semantive page</p>
                <img src="/logo.png">
                <script>document.write('nope')</script>
            </body>
        </html>"#;
        let base = Url::parse("https://example.com/").unwrap();

        let page = extract_page(html, &base, &default_selectors()).unwrap();

        assert!(page.text.contains("Welcome"));
        assert!(page.text.contains("Semantive page"));
        assert!(!page.text.contains("Ignored title"));
        assert!(!page.text.contains("document.write"));
        assert!(!page.text.contains("track"));
        assert_eq!(page.image_urls.len(), 1);
        assert!(
            page.image_urls
                .contains(&Url::parse("https://example.com/logo.png").unwrap())
        );
    }

    #[test]
    fn test_fragment_gets_implied_body() {
        let base = Url::parse("https://example.com/").unwrap();
        let page = extract_page(b"just text", &base, &default_selectors()).unwrap();

        assert_eq!(page.text, "just text");
        assert!(page.image_urls.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let base = Url::parse("https://example.com/").unwrap();
        let page = extract_page(b"<body>caf\xe9</body>", &base, &default_selectors()).unwrap();

        assert!(page.text.starts_with("caf"));
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let base = Url::parse("https://example.com/").unwrap();

        for html in [&b""[..], &b"   \n\t  "[..]] {
            let result = extract_page(html, &base, &default_selectors());
            assert!(matches!(result, Err(ExtractError::HtmlParse(ref m)) if m == "Document is empty"));
        }
    }

    #[test]
    fn test_frameset_has_no_body() {
        let html = br#"<html><head></head><frameset cols="50%,50%"><frame src="a.html"><frame src="b.html"></frameset></html>"#;
        let base = Url::parse("https://example.com/").unwrap();

        let result = extract_page(html, &base, &default_selectors());
        assert!(matches!(result, Err(ExtractError::MissingBody)));
    }
}
