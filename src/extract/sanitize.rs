//! Script stripping and plain-text extraction

use scraper::node::Node;
use scraper::{ElementRef, Selector};
use tracing::warn;

/// Elements dropped before text extraction
pub const DEFAULT_STRIP_SELECTORS: &[&str] =
    &["script", "noscript", "style", "object", "embed", "applet"];

/// Walks a body element and collects its text, skipping stripped subtrees.
///
/// Attributes never reach the output, so event handlers (`onclick` and
/// friends) and `javascript:` URLs are dropped along with the markup.
pub struct Sanitizer {
    strip: Vec<Selector>,
}

impl Sanitizer {
    /// Build a sanitizer from CSS selectors; invalid selectors are logged and ignored
    pub fn new(strip_selectors: &[String]) -> Self {
        let strip = strip_selectors
            .iter()
            .filter_map(|s| match Selector::parse(s) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    warn!("Failed to parse selector '{}': {}", s, e);
                    None
                }
            })
            .collect();

        Self { strip }
    }

    fn is_stripped(&self, element: &ElementRef<'_>) -> bool {
        self.strip.iter().any(|selector| selector.matches(element))
    }

    /// Plain text of `root` with every stripped element removed
    pub fn text(&self, root: ElementRef<'_>) -> String {
        let mut out = String::new();
        if !self.is_stripped(&root) {
            self.collect_text(root, &mut out);
        }
        out
    }

    fn collect_text(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        if !self.is_stripped(&child) {
                            self.collect_text(child, out);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        let selectors: Vec<String> = DEFAULT_STRIP_SELECTORS
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::new(&selectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn body_text(html: &str, sanitizer: &Sanitizer) -> String {
        let document = Html::parse_document(html);
        let selector = Selector::parse("body").unwrap();
        let body = document.select(&selector).next().unwrap();
        sanitizer.text(body)
    }

    #[test]
    fn test_strips_scripts() {
        let html = r#"<html><body><p>Before</p><script>alert('x');</script><p>After</p></body></html>"#;
        let text = body_text(html, &Sanitizer::default());

        assert_eq!(text, "BeforeAfter");
    }

    #[test]
    fn test_ignores_event_handlers_and_javascript_links() {
        let html = r#"<body><a href="javascript:steal()" onclick="steal()">Click</a> here</body>"#;
        let text = body_text(html, &Sanitizer::default());

        assert_eq!(text, "Click here");
        assert!(!text.contains("steal"));
    }

    #[test]
    fn test_strips_styles_and_embedded_objects() {
        let html = r#"<body><style>p { color: red; }</style><object data="x.swf">fallback</object><p>Text</p></body>"#;
        let text = body_text(html, &Sanitizer::default());

        assert_eq!(text, "Text");
    }

    #[test]
    fn test_skips_comments_and_keeps_nested_text() {
        let html = "<body><div>One <!-- hidden --><span>Two</span>\n<b>Three</b></div></body>";
        let text = body_text(html, &Sanitizer::default());

        assert_eq!(text, "One Two\nThree");
    }

    #[test]
    fn test_custom_selectors_and_invalid_selector() {
        let sanitizer = Sanitizer::new(&[
            "script".to_string(),
            "nav".to_string(),
            "[[invalid".to_string(),
        ]);
        let html = "<body><nav>Menu</nav><main>Content</main></body>";

        assert_eq!(body_text(html, &sanitizer), "Content");
    }
}
