//! Frontmatter extraction and parsing.

use chrono::NaiveDate;
use serde::Deserialize;

/// Parsed frontmatter from a content file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Page title (required)
    pub title: String,

    /// Publication date, for posts
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Author byline
    #[serde(default)]
    pub author: Option<String>,

    /// Page description for head metadata and previews
    #[serde(default)]
    pub description: Option<String>,

    /// Order in site navigation (lower = first)
    #[serde(default)]
    pub order: Option<i32>,

    /// Whether the page appears in site navigation
    #[serde(default = "default_true")]
    pub nav: bool,

    /// Custom slug override
    #[serde(default)]
    pub slug: Option<String>,

    /// Drafts are skipped by the static build
    #[serde(default)]
    pub draft: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: String::new(),
            date: None,
            author: None,
            description: None,
            order: None,
            nav: true,
            slug: None,
            draft: false,
        }
    }
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),
}

/// Extract frontmatter from a content file.
///
/// Returns the parsed frontmatter and the body after the closing fence.
/// A file that does not open with `---` has no frontmatter and is
/// returned untouched.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml = after_open[..close_pos].trim();
    let body = &after_open[close_pos + 4..];

    let frontmatter: Frontmatter =
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    Ok((Some(frontmatter), body.trim_start()))
}
