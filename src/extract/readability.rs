//! Readability extraction for documentation articles
//!
//! This module isolates the main article content of a page from its
//! navigation, ads, and other boilerplate. Candidate containers are scored by
//! text density and markup signals; the highest-scoring container wins,
//! subject to a minimum readable-character threshold.

use scraper::{ElementRef, Html, Node, Selector};

/// Tags whose subtrees never contribute readable content
const DISCARD_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "button", "iframe", "svg", "link", "meta",
];

/// Class/id fragments marking boilerplate containers
const BOILERPLATE_MARKERS: &[&str] = &[
    "navbar",
    "menu",
    "sidebar",
    "footer",
    "banner",
    "breadcrumb",
    "share",
    "social",
    "promo",
    "cookie",
    "advert",
];

/// Elements considered as main-content candidates
const CANDIDATE_SELECTOR: &str = "body, article, main, section, div, td";

/// Options controlling article extraction
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Minimum readable character count for a container to be accepted
    pub char_threshold: usize,

    /// Tags retained even when a class/id rule marks them as boilerplate
    pub preserve_tags: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            char_threshold: 500,
            preserve_tags: vec![
                "code".to_string(),
                "pre".to_string(),
                "blockquote".to_string(),
            ],
        }
    }
}

impl ExtractOptions {
    /// Builds options with a custom character threshold
    pub fn with_char_threshold(char_threshold: usize) -> Self {
        Self {
            char_threshold,
            ..Self::default()
        }
    }
}

/// Checks whether a page looks like a readable article
///
/// Sums a square-root score over substantial paragraph and preformatted
/// blocks. The result is advisory: callers log a warning on `false` but
/// extraction proceeds regardless.
pub fn is_probably_readable(doc: &Html) -> bool {
    let Ok(selector) = Selector::parse("p, pre") else {
        return false;
    };

    let mut score = 0.0_f64;
    for el in doc.select(&selector) {
        let len = normalized_len(&el.text().collect::<String>());
        if len < 140 {
            continue;
        }
        score += ((len - 140) as f64).sqrt();
        if score > 20.0 {
            return true;
        }
    }
    false
}

/// Extracts the main article content of a page as an HTML fragment
///
/// Returns an empty string when nothing clears the readable-character
/// threshold; a page with no usable content is an expected outcome, not an
/// error.
pub fn extract_article(html: &str, options: &ExtractOptions) -> String {
    let doc = Html::parse_document(html);

    if !is_probably_readable(&doc) {
        tracing::warn!("Page may not be suitable for readability extraction");
    }

    let Ok(selector) = Selector::parse(CANDIDATE_SELECTOR) else {
        return String::new();
    };

    let mut best: Option<(i64, ElementRef)> = None;
    for el in doc.select(&selector) {
        let score = score_candidate(&el, options);
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, el));
        }
    }

    let Some((score, best_el)) = best else {
        return String::new();
    };

    let readable_len = normalized_len(&readable_text(&best_el, options));
    if readable_len < options.char_threshold {
        tracing::debug!(
            "Best candidate ({} readable chars, score {}) below threshold of {}",
            readable_len,
            score,
            options.char_threshold
        );
        return String::new();
    }

    tracing::debug!(
        "Selected <{}> with {} readable chars (score {})",
        best_el.value().name(),
        readable_len,
        score
    );
    best_el.html()
}

/// Returns true when an element's subtree should be excluded from content
pub(crate) fn is_discardable(el: &ElementRef, options: &ExtractOptions) -> bool {
    let tag = el.value().name();
    if options.preserve_tags.iter().any(|t| t == tag) {
        return false;
    }
    if DISCARD_TAGS.contains(&tag) {
        return true;
    }

    let mut markers = el.value().attr("class").unwrap_or("").to_lowercase();
    if let Some(id) = el.value().attr("id") {
        markers.push(' ');
        markers.push_str(&id.to_lowercase());
    }
    if markers.is_empty() {
        return false;
    }
    BOILERPLATE_MARKERS.iter().any(|m| markers.contains(m))
}

/// Collects the text of a subtree, skipping discarded containers
fn readable_text(el: &ElementRef, options: &ExtractOptions) -> String {
    let mut out = String::new();
    collect_readable_text(el, options, &mut out);
    out
}

fn collect_readable_text(el: &ElementRef, options: &ExtractOptions, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    if !is_discardable(&child_el, options) {
                        collect_readable_text(&child_el, options, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Scores a candidate container by text density and markup signals
///
/// Paragraphs and headings raise the score, link text lowers it, and a
/// container whose text is mostly links is halved.
fn score_candidate(el: &ElementRef, options: &ExtractOptions) -> i64 {
    if is_discardable(el, options) {
        return 0;
    }

    let text_len = normalized_len(&readable_text(el, options)) as i64;
    if text_len == 0 {
        return 0;
    }

    let mut p_count = 0_i64;
    let mut substantive_p_count = 0_i64;
    let mut heading_count = 0_i64;
    let mut anchor_count = 0_i64;
    let mut link_text_len = 0_i64;

    for node in el.descendants().skip(1) {
        let Some(child) = ElementRef::wrap(node) else {
            continue;
        };
        match child.value().name() {
            "p" => {
                p_count += 1;
                if normalized_len(&child.text().collect::<String>()) >= 25 {
                    substantive_p_count += 1;
                }
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => heading_count += 1,
            "a" => {
                anchor_count += 1;
                link_text_len += normalized_len(&child.text().collect::<String>()) as i64;
            }
            _ => {}
        }
    }

    let mut score = text_len;
    score = score.saturating_add(p_count.saturating_mul(200));
    score = score.saturating_add(substantive_p_count.saturating_mul(300));
    score = score.saturating_add(heading_count.saturating_mul(100));
    score = score.saturating_sub(anchor_count.saturating_mul(50));

    // Link-dominated containers are probably navigation
    if link_text_len * 2 > text_len {
        score /= 2;
    }

    score
}

/// Character count of whitespace-normalized text
fn normalized_len(text: &str) -> usize {
    let mut count = 0;
    let mut last_was_space = true;
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                count += 1;
                last_was_space = true;
            }
        } else {
            count += 1;
            last_was_space = false;
        }
    }
    if last_was_space && count > 0 {
        count -= 1;
    }
    count
}
