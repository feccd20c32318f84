//! HTML parser for extracting product links
//!
//! Markup is parsed with html5ever (via `scraper`), which recovers from
//! invalid HTML the way browsers do. A document that yields no anchors is not
//! an error; it just produces an empty set.

use crate::url::PatternMatcher;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Deduplicated collection of product URL strings for one domain
pub type UrlSet = BTreeSet<String>;

/// A parsed document that can list attribute values by element name
///
/// This is the only capability the extractor needs from a markup parser.
pub trait AnchorSource {
    /// Returns the value of `attr` for every `tag` element that carries it,
    /// in document order
    fn attribute_values(&self, tag: &str, attr: &str) -> Vec<String>;
}

impl AnchorSource for Html {
    fn attribute_values(&self, tag: &str, attr: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse(&format!("{}[{}]", tag, attr)) else {
            return Vec::new();
        };

        self.select(&selector)
            .filter_map(|element| element.value().attr(attr))
            .map(str::to_string)
            .collect()
    }
}

/// Parses markup into a queryable document
pub fn parse_document(markup: &str) -> Html {
    Html::parse_document(markup)
}

/// Extracts product links from raw markup
///
/// Every `<a href>` is checked against `matcher`; accepted hrefs are kept
/// verbatim. Relative hrefs are NOT resolved against the page URL and no
/// normalization is applied, so `/p/1` and `https://shop.com/p/1` are two
/// distinct entries.
///
/// # Example
///
/// ```
/// use shelf_sweep::crawler::extract_product_links;
/// use shelf_sweep::url::PatternMatcher;
///
/// let matcher = PatternMatcher::new(&[r"/product/\d+", r"/item/\d+"]).unwrap();
/// let html = r#"<a href="/product/123">A</a><a href="/about">B</a><a href="/item/99">C</a>"#;
///
/// let links = extract_product_links(html, &matcher);
/// assert_eq!(links.len(), 2);
/// assert!(links.contains("/product/123"));
/// assert!(links.contains("/item/99"));
/// ```
pub fn extract_product_links(markup: &str, matcher: &PatternMatcher) -> UrlSet {
    let document = parse_document(markup);
    extract_from_source(&document, matcher)
}

/// Extracts product links from an already parsed document
pub fn extract_from_source(source: &dyn AnchorSource, matcher: &PatternMatcher) -> UrlSet {
    source
        .attribute_values("a", "href")
        .into_iter()
        .filter(|href| matcher.matches(href))
        .collect()
}
