//! Glossary field extraction
//!
//! Heuristics for locating a term's definition and synonym list within a
//! glossary page. All functions here are pure over the [`DomNode`] interface;
//! see the module tests for synthetic-tree coverage.

use crate::extract::node::DomNode;
use regex::Regex;
use std::sync::LazyLock;

/// Matches the lead-in question heading, e.g. "What is a data warehouse?"
static WHAT_IS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)what is\s+[^?]+\?").expect("WHAT_IS regex"));

/// Matches an alias lead-in, e.g. "Also known as an EDW."
static ALSO_KNOWN_AS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)also known as\s+[^.]*").expect("ALSO_KNOWN_AS regex"));

/// Matches the start of the related-terms section
static RELATED_TERMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)related terms").expect("RELATED_TERMS regex"));

const ALSO_KNOWN_AS_LABEL: &str = "also known as";

/// Minimum text length for a sibling paragraph to count as a definition
const MIN_DEFINITION_LEN: usize = 20;

/// Derives the glossary keyword from a term URL
///
/// Takes the final path segment, splits it on dashes, capitalizes each word,
/// and rejoins with spaces: `/glossary/data-warehouse` becomes
/// `Data Warehouse`. Pure and deterministic; returns an empty string when the
/// URL has no usable final segment.
pub fn derive_keyword(url: &str) -> String {
    let last = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    last.split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Extracts the term definition from a glossary page tree
///
/// Strategy, in priority order:
/// 1. Find a heading and scan its following siblings for the first paragraph
///    with more than 20 characters of text that is not an "also known as"
///    label.
/// 2. Fall back to the text span between the end of a "what is ... ?" or
///    "also known as ..." phrase match and the start of a "related terms"
///    marker, whitespace-normalized with edge punctuation stripped.
///
/// Returns `None` when neither strategy yields text.
pub fn extract_definition<N: DomNode>(root: &N) -> Option<String> {
    if let Some(definition) = definition_after_heading(root) {
        return Some(definition);
    }
    definition_from_text_span(&root.text())
}

/// Strategy 1: first substantial paragraph following a heading
fn definition_after_heading<N: DomNode>(root: &N) -> Option<String> {
    let heading = root
        .descendants()
        .into_iter()
        .find(|n| matches!(n.tag(), "h1" | "h2" | "h3"))?;

    let mut sibling = heading.next_sibling();
    while let Some(node) = sibling {
        let text = normalize_whitespace(&node.text());
        let is_alias_label = text.to_lowercase().starts_with(ALSO_KNOWN_AS_LABEL);

        if node.tag() == "p" && !is_alias_label && text.chars().count() > MIN_DEFINITION_LEN {
            return Some(text);
        }
        sibling = node.next_sibling();
    }
    None
}

/// Strategy 2: span between a lead-in phrase and the related-terms marker
fn definition_from_text_span(raw: &str) -> Option<String> {
    let text = normalize_whitespace(raw);

    let start = if let Some(m) = WHAT_IS.find(&text) {
        m.end()
    } else if let Some(m) = ALSO_KNOWN_AS.find(&text) {
        m.end()
    } else {
        0
    };

    let mut end = text.len();
    if let Some(m) = ALSO_KNOWN_AS.find_at(&text, start) {
        if m.start() > start {
            end = end.min(m.start());
        }
    }
    if let Some(m) = RELATED_TERMS.find_at(&text, start) {
        if m.start() > start {
            end = end.min(m.start());
        }
    }

    let candidate = text
        .get(start..end)?
        .trim_matches(|c: char| c == '.' || c == ',' || c.is_whitespace());

    if candidate.is_empty() {
        None
    } else {
        Some(candidate.to_string())
    }
}

/// Extracts the synonym list from a glossary page tree
///
/// Finds the first element (document order) whose text begins with "also
/// known as", then scans that element's following siblings for one containing
/// a `<span>`; the first span's text becomes the sole synonym. Source pages
/// list exactly one alias, so the result never holds more than one entry. No
/// match anywhere yields an empty vector.
pub fn extract_synonyms<N: DomNode>(root: &N) -> Vec<String> {
    let label = root.descendants().into_iter().find(|n| {
        normalize_whitespace(&n.text())
            .to_lowercase()
            .starts_with(ALSO_KNOWN_AS_LABEL)
    });

    let Some(label) = label else {
        return Vec::new();
    };

    let mut sibling = label.next_sibling();
    while let Some(node) = sibling {
        let span = node.descendants().into_iter().find(|n| n.tag() == "span");

        if let Some(span) = span {
            let text = normalize_whitespace(&span.text());
            let cleaned = text.trim_matches(|c| c == '"' || c == '\'').trim();
            if !cleaned.is_empty() {
                return vec![cleaned.to_string()];
            }
        }
        sibling = node.next_sibling();
    }

    Vec::new()
}

/// Collapses all whitespace runs into single spaces and trims the result
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
