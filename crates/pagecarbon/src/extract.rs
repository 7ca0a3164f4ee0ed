//! Pull stylesheet, script and image references out of raw HTML.
//!
//! Parsing sits behind [`HtmlParser`] so any lenient HTML parser can be
//! plugged in. [`ScraperParser`] is the default and uses the `scraper`
//! crate (html5ever), which tolerates unclosed tags and other malformed
//! markup.

use crate::types::{AssetKind, AssetReference};
use scraper::{Html, Selector};

const STYLESHEET_SELECTOR: &str = r#"link[rel="stylesheet"]"#;
const SCRIPT_SELECTOR: &str = "script[src]";
const IMAGE_SELECTOR: &str = "img[src]";

/// A parsed document that answers tag/attribute queries.
pub trait Document {
    /// Values of `attr` on every element matching the CSS `selector`,
    /// in document order. An invalid selector yields nothing.
    fn attribute_values(&self, selector: &str, attr: &str) -> Vec<String>;
}

/// Turns HTML text into a queryable [`Document`].
pub trait HtmlParser: Send + Sync {
    fn parse(&self, html: &str) -> Box<dyn Document>;
}

/// [`HtmlParser`] backed by `scraper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperParser;

struct ScraperDocument(Html);

impl HtmlParser for ScraperParser {
    fn parse(&self, html: &str) -> Box<dyn Document> {
        Box::new(ScraperDocument(Html::parse_document(html)))
    }
}

impl Document for ScraperDocument {
    fn attribute_values(&self, selector: &str, attr: &str) -> Vec<String> {
        let Ok(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.0
            .select(&sel)
            .filter_map(|el| el.value().attr(attr))
            .map(str::to_string)
            .collect()
    }
}

/// Extract asset references from `html`.
///
/// Order is all stylesheets, then all scripts, then images, each in
/// document order. Elements with a missing or blank attribute are skipped.
/// Only the first `max_images` non-blank `<img src>` references are kept.
pub fn extract_assets(
    parser: &dyn HtmlParser,
    html: &str,
    max_images: usize,
) -> Vec<AssetReference> {
    let document = parser.parse(html);

    let stylesheets = non_blank(document.attribute_values(STYLESHEET_SELECTOR, "href"))
        .map(|src| (AssetKind::Stylesheet, src));
    let scripts = non_blank(document.attribute_values(SCRIPT_SELECTOR, "src"))
        .map(|src| (AssetKind::Script, src));
    let images = non_blank(document.attribute_values(IMAGE_SELECTOR, "src"))
        .take(max_images)
        .map(|src| (AssetKind::Image, src));

    stylesheets
        .chain(scripts)
        .chain(images)
        .map(|(kind, raw_source)| AssetReference { kind, raw_source })
        .collect()
}

fn non_blank(values: Vec<String>) -> impl Iterator<Item = String> {
    values.into_iter().filter(|v| !v.trim().is_empty())
}
