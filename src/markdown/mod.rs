//! HTML to markdown normalization
//!
//! Converts extracted article HTML into clean, flattened markdown: ATX
//! headings, fenced code blocks, asterisk emphasis, dash bullets, `---`
//! rules, and tables emitted as their text content surrounded by blank
//! lines. A cleanup pass collapses whitespace and drops fence-edged lines
//! (see [`cleanup`]).

use scraper::{ElementRef, Html, Node};

/// Tags skipped entirely during rendering
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "button", "iframe", "svg", "link", "meta", "head", "title",
];

/// Converts an HTML fragment into normalized markdown
///
/// Returns an empty string for empty or content-free input.
pub fn to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    render_children(fragment.root_element(), &mut out, false);
    cleanup(&out)
}

/// Derived token estimate: `word_count * 2`
///
/// A placeholder heuristic, not a real tokenizer. Consumers needing exact
/// token counts must recompute downstream.
pub fn estimate_tokens(text: &str) -> u32 {
    if text.trim().is_empty() {
        return 0;
    }
    (text.split_whitespace().count() * 2) as u32
}

fn render_children(el: ElementRef, out: &mut String, in_pre: bool) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                if in_pre {
                    out.push_str(text);
                } else {
                    push_collapsed(out, text);
                }
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    render_element(el, out, in_pre);
                }
            }
            _ => {}
        }
    }
}

fn render_element(el: ElementRef, out: &mut String, in_pre: bool) {
    let tag = el.value().name();

    if SKIP_TAGS.contains(&tag) {
        return;
    }

    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse::<usize>().unwrap_or(1);
            let inline = render_inline(el);
            if !inline.is_empty() {
                out.push_str("\n\n");
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(&inline);
                out.push_str("\n\n");
            }
        }
        "p" => {
            let inline = render_inline(el);
            if !inline.is_empty() {
                out.push_str("\n\n");
                out.push_str(&inline);
                out.push_str("\n\n");
            }
        }
        "br" => out.push('\n'),
        "hr" => out.push_str("\n\n---\n\n"),
        "strong" | "b" => {
            let inline = render_inline(el);
            if !inline.is_empty() {
                out.push('*');
                out.push('*');
                out.push_str(&inline);
                out.push_str("**");
            }
        }
        "em" | "i" => {
            let inline = render_inline(el);
            if !inline.is_empty() {
                out.push('*');
                out.push_str(&inline);
                out.push('*');
            }
        }
        "code" => {
            if in_pre {
                render_children(el, out, true);
            } else {
                let text: String = el.text().collect();
                if !text.trim().is_empty() {
                    out.push('`');
                    out.push_str(text.trim());
                    out.push('`');
                }
            }
        }
        "pre" => render_code_block(el, out),
        "ul" => render_list(el, out, None),
        "ol" => render_list(el, out, Some(1)),
        "blockquote" => {
            let inner = render_inline(el);
            if !inner.is_empty() {
                out.push_str("\n\n");
                for line in inner.lines() {
                    out.push_str("> ");
                    out.push_str(line);
                    out.push('\n');
                }
                out.push('\n');
            }
        }
        "a" => {
            let inline = render_inline(el);
            match el.value().attr("href") {
                Some(href) if !inline.is_empty() => {
                    out.push('[');
                    out.push_str(&inline);
                    out.push_str("](");
                    out.push_str(href);
                    out.push(')');
                }
                _ => out.push_str(&inline),
            }
        }
        "img" => {
            if let Some(src) = el.value().attr("src") {
                let alt = el.value().attr("alt").unwrap_or("");
                out.push_str("![");
                out.push_str(alt);
                out.push_str("](");
                out.push_str(src);
                out.push(')');
            }
        }
        // Tables keep their text content, surrounded by blank lines, and are
        // not reformatted further
        "table" => {
            let collapsed = el
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            if !collapsed.is_empty() {
                out.push_str("\n\n");
                out.push_str(&collapsed);
                out.push_str("\n\n");
            }
        }
        _ => render_children(el, out, in_pre),
    }
}

/// Renders element content for inline contexts (headings, emphasis, links)
fn render_inline(el: ElementRef) -> String {
    let mut inner = String::new();
    render_children(el, &mut inner, false);
    inner.trim().to_string()
}

/// Renders a `<pre>` block as a fenced code block
///
/// The language tag is taken from a `language-*` class on the inner `<code>`
/// element when present.
fn render_code_block(el: ElementRef, out: &mut String) {
    let language = el
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "code")
        .and_then(|code| code.value().attr("class").map(str::to_string))
        .and_then(|class| {
            class
                .split_whitespace()
                .find(|c| c.starts_with("language-"))
                .map(|c| c.trim_start_matches("language-").to_string())
        })
        .unwrap_or_default();

    let body: String = el.text().collect();
    out.push_str("\n\n```");
    out.push_str(&language);
    out.push('\n');
    out.push_str(body.trim_matches('\n'));
    out.push_str("\n```\n\n");
}

fn render_list(el: ElementRef, out: &mut String, ordered_start: Option<usize>) {
    out.push_str("\n\n");
    let mut index = ordered_start.unwrap_or(0);
    for child in el.children() {
        let Some(item) = ElementRef::wrap(child) else {
            continue;
        };
        if item.value().name() != "li" {
            continue;
        }
        let inline = render_inline(item);
        match ordered_start {
            Some(_) => {
                out.push_str(&format!("{}. ", index));
                index += 1;
            }
            None => out.push_str("- "),
        }
        out.push_str(&inline);
        out.push('\n');
    }
    out.push('\n');
}

/// Appends text with whitespace runs collapsed to single spaces
fn push_collapsed(out: &mut String, text: &str) {
    let mut last_was_space = out.ends_with([' ', '\n']);
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
}

/// Cleanup pass over generated markdown
///
/// Trims per-line whitespace, removes bullet-only lines, collapses runs of
/// blank lines to a single blank line, and drops any line that itself starts
/// or ends with a ``` fence marker. The fence rule exists to sweep up
/// truncated trailing code fences; it also removes legitimate one-line code
/// that touches a fence marker (see DESIGN.md, open questions).
pub fn cleanup(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for line in markdown.lines() {
        let trimmed = line.trim();

        // Empty list items
        if trimmed == "-" || trimmed == "*" {
            continue;
        }

        // Fence-edged lines
        if trimmed.starts_with("```") || trimmed.ends_with("```") {
            continue;
        }

        if trimmed.is_empty() {
            if previous_blank {
                continue;
            }
            previous_blank = true;
            lines.push("");
        } else {
            previous_blank = false;
            lines.push(trimmed);
        }
    }

    // Strip a trailing blank line
    while lines.last() == Some(&"") {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_are_atx() {
        let md = to_markdown("<h1>Title</h1><h3>Sub</h3>");
        assert!(md.contains("# Title"));
        assert!(md.contains("### Sub"));
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let md = to_markdown("<p>First paragraph.</p><p>Second paragraph.</p>");
        assert_eq!(md, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_emphasis_uses_asterisks() {
        let md = to_markdown("<p>Use <em>filters</em> and <strong>metrics</strong>.</p>");
        assert_eq!(md, "Use *filters* and **metrics**.");
    }

    #[test]
    fn test_bullets_use_dashes() {
        let md = to_markdown("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(md, "- one\n- two");
    }

    #[test]
    fn test_ordered_list_numbering() {
        let md = to_markdown("<ol><li>first</li><li>second</li></ol>");
        assert_eq!(md, "1. first\n2. second");
    }

    #[test]
    fn test_horizontal_rule() {
        let md = to_markdown("<p>above</p><hr><p>below</p>");
        assert_eq!(md, "above\n\n---\n\nbelow");
    }

    #[test]
    fn test_links_rendered() {
        let md = to_markdown(r#"<p>See <a href="/docs/dashboards">dashboards</a>.</p>"#);
        assert_eq!(md, "See [dashboards](/docs/dashboards).");
    }

    #[test]
    fn test_inline_code() {
        let md = to_markdown("<p>Run <code>SELECT 1</code> first.</p>");
        assert_eq!(md, "Run `SELECT 1` first.");
    }

    #[test]
    fn test_table_text_kept_with_blank_lines() {
        let md = to_markdown(
            "<p>before</p><table><tr><td>a</td><td>b</td></tr></table><p>after</p>",
        );
        assert_eq!(md, "before\n\na b\n\nafter");
    }

    #[test]
    fn test_fence_lines_dropped_by_cleanup() {
        // The cleanup pass strips every line touching a fence marker, so a
        // fenced block survives only as its body lines
        let md = to_markdown(
            "<p>intro</p><pre><code class=\"language-sql\">SELECT *\nFROM orders</code></pre>",
        );
        assert_eq!(md, "intro\n\nSELECT *\nFROM orders");
    }

    #[test]
    fn test_cleanup_collapses_blank_runs() {
        assert_eq!(cleanup("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_cleanup_trims_lines_and_drops_empty_bullets() {
        assert_eq!(cleanup("  a  \n- \nb"), "a\nb");
    }

    #[test]
    fn test_cleanup_drops_fence_edged_lines() {
        assert_eq!(cleanup("```sql\nSELECT 1\n```"), "SELECT 1");
        // Legitimate short lines touching a fence marker are lost too
        assert_eq!(cleanup("fn main() {}```"), "");
    }

    #[test]
    fn test_nav_and_script_skipped() {
        let md = to_markdown(
            "<nav><a href=\"/x\">Home</a></nav><p>content</p><script>var x = 1;</script>",
        );
        assert_eq!(md, "content");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_markdown(""), "");
        assert_eq!(to_markdown("   "), "");
    }

    #[test]
    fn test_estimate_tokens_doubles_word_count() {
        assert_eq!(estimate_tokens("one two three"), 6);
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("   "), 0);
    }
}
