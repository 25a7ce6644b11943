//! Markdown to HTML rendering with site-specific event rewriting.

use pulldown_cmark::{html, CowStr, Event, Parser, Tag, TagEnd};

use crate::parser::{collect_headings, markdown_options, slugify};

/// Render a markdown body to HTML.
///
/// Three rewrites happen on the event stream before the HTML writer sees
/// it:
/// - headings are emitted with their slug as the `id` attribute, using the
///   same slugs in the same order as heading extraction, so outline links
///   resolve against the rendered body;
/// - absolute `http(s)` links open in a new tab;
/// - fenced code blocks are wrapped in a frame carrying a copy button with
///   the raw source attached for the site script to wire up.
///
/// Syntax highlighting is deliberately not done here; code blocks keep
/// their `language-*` classes and colouring stays a stylesheet concern.
pub fn render_html(content: &str) -> String {
    let events: Vec<Event> = Parser::new_ext(content, markdown_options()).collect();

    let slugs: Vec<String> = collect_headings(&events)
        .into_iter()
        .map(|(_, text)| slugify(&text))
        .collect();

    let mut output = String::new();
    html::push_html(&mut output, rewrite(events, &slugs).into_iter());
    output
}

fn rewrite<'a>(events: Vec<Event<'a>>, slugs: &[String]) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut next_heading = 0;
    let mut in_external_link = false;
    let mut code_text: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                classes,
                attrs,
                ..
            }) => {
                let id = slugs.get(next_heading).cloned().map(CowStr::from);
                next_heading += 1;
                out.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }

            Event::Start(Tag::Link {
                dest_url, title, ..
            }) if is_external(&dest_url) => {
                in_external_link = true;
                let mut anchor = String::from("<a href=\"");
                escape_attr(&dest_url, &mut anchor);
                anchor.push('"');
                if !title.is_empty() {
                    anchor.push_str(" title=\"");
                    escape_attr(&title, &mut anchor);
                    anchor.push('"');
                }
                anchor.push_str(" target=\"_blank\" rel=\"noopener noreferrer\">");
                out.push(Event::Html(anchor.into()));
            }

            Event::End(TagEnd::Link) if in_external_link => {
                in_external_link = false;
                out.push(Event::Html("</a>".into()));
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                code_text = Some(String::new());
                out.push(Event::Html("<div class=\"code-frame\">".into()));
                out.push(Event::Start(Tag::CodeBlock(kind)));
            }

            Event::End(TagEnd::CodeBlock) => {
                out.push(Event::End(TagEnd::CodeBlock));
                let raw = code_text.take().unwrap_or_default();
                let mut button = String::from("<button class=\"copy-button\" data-clipboard=\"");
                escape_attr(raw.trim_end(), &mut button);
                button.push_str("\">Copy</button></div>");
                out.push(Event::Html(button.into()));
            }

            Event::Text(text) => {
                if let Some(buffer) = code_text.as_mut() {
                    buffer.push_str(&text);
                }
                out.push(Event::Text(text));
            }

            other => out.push(other),
        }
    }

    out
}

fn is_external(dest: &str) -> bool {
    dest.starts_with("http://") || dest.starts_with("https://")
}

// Escapes for a double-quoted attribute value.
fn escape_attr(raw: &str, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_carry_their_anchor_ids() {
        let html = render_html("# Getting Started\n\n## First Steps");

        assert!(html.contains("<h1 id=\"getting-started\">Getting Started</h1>"));
        assert!(html.contains("<h2 id=\"first-steps\">First Steps</h2>"));
    }

    #[test]
    fn heading_ids_match_extraction_order() {
        let source = "## Same Name\n\n## Different";
        let html = render_html(source);

        // First heading gets the first extracted slug, second the second.
        assert!(html.contains("<h2 id=\"same-name\">"));
        assert!(html.contains("<h2 id=\"different\">"));
    }

    #[test]
    fn external_links_open_in_a_new_tab() {
        let html = render_html("See [the docs](https://example.com/guide).");

        assert!(html.contains(
            "<a href=\"https://example.com/guide\" target=\"_blank\" rel=\"noopener noreferrer\">the docs</a>"
        ));
    }

    #[test]
    fn internal_links_are_left_alone() {
        let html = render_html("Read [the about page](/about/).");

        assert!(html.contains("<a href=\"/about/\">the about page</a>"));
        assert!(!html.contains("target=\"_blank\""));
    }

    #[test]
    fn code_blocks_are_framed_with_a_copy_button() {
        let html = render_html("```rust\nfn main() {}\n```");

        assert!(html.contains("<div class=\"code-frame\">"));
        assert!(html.contains("<code class=\"language-rust\">"));
        assert!(html.contains("data-clipboard=\"fn main() {}\""));
        assert!(html.contains(">Copy</button></div>"));
    }

    #[test]
    fn copy_button_source_is_attribute_escaped() {
        let html = render_html("```html\n<b class=\"x\">\n```");

        assert!(html.contains("data-clipboard=\"&lt;b class=&quot;x&quot;&gt;\""));
    }

    #[test]
    fn ordinary_markdown_still_renders() {
        let html = render_html("Some *emphasis* and a\n\n- list item");

        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains("<li>list item</li>"));
    }
}
