//! Content document parsing.

use pergola_outline::Heading;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed content document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown body (without frontmatter)
    pub content: String,

    /// Flat heading list in document order, ready for outline construction
    pub headings: Vec<Heading>,
}

/// Errors that can occur when parsing a document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Markdown extensions enabled across the site.
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a content document.
///
/// Extracts frontmatter and walks the markdown once to collect the flat
/// heading list. Heading order is the order headings appear in the body;
/// anchor ids are derived from the heading text. Nothing is validated
/// beyond the frontmatter: duplicate anchors are an output concern, not a
/// parsing one.
pub fn parse_document(source: &str) -> Result<Document, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let events: Vec<Event> = Parser::new_ext(content, markdown_options()).collect();
    let headings = collect_headings(&events)
        .into_iter()
        .map(|(level, text)| Heading {
            id: slugify(&text),
            level,
            text,
        })
        .collect();

    Ok(Document {
        frontmatter,
        content: content.to_string(),
        headings,
    })
}

/// Collect `(level, text)` pairs for every heading in an event stream,
/// in document order. Inline markup inside a heading is flattened to its
/// text content.
pub(crate) fn collect_headings(events: &[Event]) -> Vec<(u8, String)> {
    let mut headings = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level as u8, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = current.take() {
                    headings.push(heading);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buffer)) = current.as_mut() {
                    buffer.push_str(text);
                }
            }
            _ => {}
        }
    }

    headings
}

/// Convert heading text to a URL-safe anchor slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_complete_post() {
        let source = r#"---
title: Learning to Juggle
date: 2023-07-19
author: Sam
---

# Learning to Juggle

Three balls, two hands.

## Getting Started

Start with one ball.

### The Exchange

Now add a second.

## Common Mistakes

Don't look at your hands.
"#;

        let doc = parse_document(source).unwrap();

        let fm = doc.frontmatter.unwrap();
        assert_eq!(fm.title, "Learning to Juggle");

        let flat: Vec<(&str, u8, &str)> = doc
            .headings
            .iter()
            .map(|h| (h.id.as_str(), h.level, h.text.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("learning-to-juggle", 1, "Learning to Juggle"),
                ("getting-started", 2, "Getting Started"),
                ("the-exchange", 3, "The Exchange"),
                ("common-mistakes", 2, "Common Mistakes"),
            ]
        );

        assert!(doc.content.starts_with("# Learning to Juggle"));
    }

    #[test]
    fn parses_without_frontmatter() {
        let doc = parse_document("# Just Markdown\n\nNo frontmatter.").unwrap();

        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.headings.len(), 1);
        assert_eq!(doc.headings[0].text, "Just Markdown");
    }

    #[test]
    fn body_without_headings_yields_an_empty_list() {
        let doc = parse_document("Plain paragraph, nothing else.").unwrap();

        assert!(doc.headings.is_empty());
    }

    #[test]
    fn inline_code_in_headings_is_flattened_to_text() {
        let doc = parse_document("## Using `build` well").unwrap();

        assert_eq!(doc.headings[0].text, "Using build well");
        assert_eq!(doc.headings[0].id, "using-build-well");
    }

    #[test]
    fn heading_order_is_document_order() {
        let doc = parse_document("### Deep\n\n# Shallow\n\n## Middle").unwrap();

        let levels: Vec<u8> = doc.headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![3, 1, 2]);
    }

    #[test]
    fn propagates_frontmatter_errors() {
        let result = parse_document("---\ntitle: Test\nno closing fence");

        assert!(matches!(result, Err(ParseError::Frontmatter(_))));
    }

    #[test]
    fn slugify_matches_anchor_conventions() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("Rust & WebAssembly"), "rust-webassembly");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
