//! Image discovery

use std::collections::BTreeSet;

use scraper::{ElementRef, Selector};
use tracing::debug;
use url::Url;

/// Collect the `src` of every `img` element under `root`.
///
/// Relative sources are resolved against `base`. Images without a `src`,
/// sources that fail to resolve, and non-http(s) results (`data:`,
/// `javascript:`, ...) are skipped. The result is a set, so duplicates
/// collapse.
pub fn discover_images(root: ElementRef<'_>, base: &Url) -> BTreeSet<Url> {
    let mut urls = BTreeSet::new();
    let Ok(selector) = Selector::parse("img[src]") else {
        return urls;
    };

    for img in root.select(&selector) {
        let Some(src) = img.value().attr("src").map(str::trim) else {
            continue;
        };
        if src.is_empty() {
            continue;
        }

        match base.join(src) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                urls.insert(url);
            }
            Ok(url) => debug!("Skipping image with unsupported scheme: {}", url.scheme()),
            Err(e) => debug!("Skipping unresolvable image source '{}': {}", src, e),
        }
    }

    urls
}
