//! Tree-node abstraction over parsed HTML
//!
//! The extraction heuristics walk the document through this interface rather
//! than through a concrete parser type. Production code wraps `scraper`
//! elements; unit tests build synthetic trees.

use scraper::{ElementRef, Html};

/// An element node in a DOM-like tree
///
/// Implementations expose only what the heuristics need: tag name, subtree
/// text, attributes, element siblings, and element children.
pub trait DomNode: Clone {
    /// Lowercase tag name of this element
    fn tag(&self) -> &str;

    /// Concatenated text content of this element's subtree
    fn text(&self) -> String;

    /// Value of the named attribute, if present
    fn attr(&self, name: &str) -> Option<String>;

    /// The next element sibling, skipping text and comment nodes
    fn next_sibling(&self) -> Option<Self>;

    /// Element children in document order
    fn children(&self) -> Vec<Self>;

    /// All element descendants in document order (depth-first, self excluded)
    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack: Vec<Self> = self.children();
        stack.reverse();
        while let Some(node) = stack.pop() {
            out.push(node.clone());
            let mut kids = node.children();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }
}

/// [`DomNode`] implementation backed by a `scraper` element
#[derive(Clone)]
pub struct HtmlNode<'a> {
    el: ElementRef<'a>,
}

impl<'a> HtmlNode<'a> {
    /// Wraps an element reference
    pub fn new(el: ElementRef<'a>) -> Self {
        Self { el }
    }

    /// Returns the root element of a parsed document
    pub fn document_root(doc: &'a Html) -> Self {
        Self {
            el: doc.root_element(),
        }
    }
}

impl<'a> DomNode for HtmlNode<'a> {
    fn tag(&self) -> &str {
        self.el.value().name()
    }

    fn text(&self) -> String {
        self.el.text().collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.el.value().attr(name).map(str::to_string)
    }

    fn next_sibling(&self) -> Option<Self> {
        let mut node = self.el.next_sibling();
        while let Some(n) = node {
            if let Some(el) = ElementRef::wrap(n) {
                return Some(Self { el });
            }
            node = n.next_sibling();
        }
        None
    }

    fn children(&self) -> Vec<Self> {
        self.el
            .children()
            .filter_map(ElementRef::wrap)
            .map(|el| Self { el })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::TestNode;
    use super::*;

    #[test]
    fn test_html_node_tag_and_text() {
        let doc = Html::parse_document("<html><body><p>Hello <b>world</b></p></body></html>");
        let root = HtmlNode::document_root(&doc);
        assert_eq!(root.tag(), "html");

        let p = root
            .descendants()
            .into_iter()
            .find(|n| n.tag() == "p")
            .unwrap();
        assert_eq!(p.text(), "Hello world");
    }

    #[test]
    fn test_html_node_next_sibling_skips_text_nodes() {
        let doc = Html::parse_document(
            "<html><body><h2>Title</h2>\n  some text\n<p>First</p><p>Second</p></body></html>",
        );
        let root = HtmlNode::document_root(&doc);
        let h2 = root
            .descendants()
            .into_iter()
            .find(|n| n.tag() == "h2")
            .unwrap();

        let sib = h2.next_sibling().unwrap();
        assert_eq!(sib.tag(), "p");
        assert_eq!(sib.text(), "First");

        let sib2 = sib.next_sibling().unwrap();
        assert_eq!(sib2.text(), "Second");
        assert!(sib2.next_sibling().is_none());
    }

    #[test]
    fn test_html_node_attr() {
        let doc = Html::parse_document(r#"<html><body><a href="/glossary/etl">ETL</a></body></html>"#);
        let root = HtmlNode::document_root(&doc);
        let a = root
            .descendants()
            .into_iter()
            .find(|n| n.tag() == "a")
            .unwrap();
        assert_eq!(a.attr("href"), Some("/glossary/etl".to_string()));
        assert_eq!(a.attr("title"), None);
    }

    #[test]
    fn test_descendants_document_order() {
        let tree = TestNode::new("div")
            .child(
                TestNode::new("section")
                    .child(TestNode::with_text("h2", "A"))
                    .child(TestNode::with_text("p", "B")),
            )
            .child(TestNode::with_text("p", "C"));

        let tags: Vec<String> = tree
            .descendants()
            .iter()
            .map(|n| format!("{}:{}", n.tag(), n.text()))
            .collect();
        assert_eq!(tags, vec!["section:AB", "h2:A", "p:B", "p:C"]);
    }

    #[test]
    fn test_test_node_siblings_and_attrs() {
        let parent = TestNode::new("div")
            .with_attr("class", "content")
            .child(TestNode::with_text("h2", "Heading"))
            .child(TestNode::with_text("p", "Body"));

        assert_eq!(parent.attr("class"), Some("content".to_string()));
        assert_eq!(parent.attr("id"), None);

        let h2 = parent.children()[0].clone();
        let sib = h2.next_sibling().unwrap();
        assert_eq!(sib.tag(), "p");
        assert!(sib.next_sibling().is_none());
    }
}
