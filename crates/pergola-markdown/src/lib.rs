//! Markdown content parsing for pergola.
//!
//! This crate turns a content file into everything a page render needs:
//! YAML frontmatter, the flat document-ordered heading list that feeds
//! outline construction, and the article body rendered to HTML.

pub mod frontmatter;
pub mod html;
pub mod parser;

pub use frontmatter::Frontmatter;
pub use html::render_html;
pub use parser::{parse_document, slugify, Document, ParseError};
