//! URL discovery for crawl runs
//!
//! The docs crawl discovers URLs from a sitemap document; the glossary crawl
//! discovers term URLs from the glossary index page.

use scraper::{Html, Selector};
use url::Url;

/// Extracts `<loc>` values from a sitemap document
///
/// This is a literal tag-matching scan, not an XML parser; sitemaps are
/// machine-generated and flat enough that full XML handling buys nothing
/// here. An unclosed `<loc>` ends the scan rather than swallowing the rest
/// of the document into one value.
pub fn sitemap_locations(xml: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<loc>") {
        let after = &rest[start + "<loc>".len()..];
        match after.find("</loc>") {
            Some(end) => {
                let loc = after[..end].trim();
                if !loc.is_empty() {
                    urls.push(loc.to_string());
                }
                rest = &after[end + "</loc>".len()..];
            }
            // Malformed/unclosed tag guard
            None => break,
        }
    }

    urls
}

/// Filters sitemap URLs down to documentation pages
///
/// Keeps URLs containing `/docs/` or `/learn/`, excluding any containing
/// `/api/` (generated API reference pages carry no readable prose).
pub fn filter_docs_urls(urls: Vec<String>) -> Vec<String> {
    urls.into_iter()
        .filter(|url| {
            (url.contains("/docs/") || url.contains("/learn/")) && !url.contains("/api/")
        })
        .collect()
}

/// Collects glossary term URLs from the glossary index page
///
/// Anchors whose href starts with `/glossary/` are resolved against the base
/// URL and de-duplicated preserving document order.
pub fn glossary_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = std::collections::HashSet::new();
    let mut urls = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.starts_with("/glossary/") {
            continue;
        }
        let Ok(absolute) = base_url.join(href) else {
            continue;
        };
        let absolute = absolute.to_string();
        if seen.insert(absolute.clone()) {
            urls.push(absolute);
        }
    }

    urls
}
