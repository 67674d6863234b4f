//! Content extraction module
//!
//! This module isolates the useful content of a fetched page:
//! - Readability extraction for documentation articles
//! - Definition and synonym extraction for glossary pages
//!
//! The glossary heuristics are pure functions over the [`DomNode`] tree
//! abstraction, so they can be exercised against synthetic trees without a
//! real HTML parser.

mod glossary;
mod node;
mod readability;

pub use glossary::{derive_keyword, extract_definition, extract_synonyms};
pub use node::{DomNode, HtmlNode};
pub use readability::{extract_article, is_probably_readable, ExtractOptions};
