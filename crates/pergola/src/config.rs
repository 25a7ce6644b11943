//! Site configuration (site.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pergola_static::{BuildConfig, ProjectCard};
use serde::Deserialize;

/// Configuration file structure (site.toml).
#[derive(Debug, Deserialize, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub content: ContentSection,
    #[serde(default)]
    pub build: BuildSection,
    /// Project gallery entries
    #[serde(default)]
    pub projects: Vec<ProjectCard>,
}

#[derive(Debug, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Paths to extra CSS stylesheets to include
    #[serde(default)]
    pub styles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentSection {
    #[serde(default = "default_content_dir")]
    pub dir: String,
    #[serde(default = "default_output")]
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            author: None,
            tagline: None,
            base_url: default_base_url(),
            styles: vec![],
        }
    }
}

impl Default for ContentSection {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            output: default_output(),
        }
    }
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_title() -> String {
    "Personal Site".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_content_dir() -> String {
    "content".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_minify() -> bool {
    true
}

impl SiteConfig {
    /// Turn the file configuration into a build configuration.
    pub fn into_build_config(self) -> BuildConfig {
        BuildConfig {
            content_dir: PathBuf::from(&self.content.dir),
            output_dir: PathBuf::from(&self.content.output),
            minify: self.build.minify,
            base_url: self.site.base_url,
            title: self.site.title,
            author: self.site.author,
            tagline: self.site.tagline,
            styles: self.site.styles,
            projects: self.projects,
        }
    }
}

/// Load configuration from site.toml if it exists.
///
/// Returns an error if the config file exists but is malformed; a missing
/// file yields the defaults.
pub fn load(path: &Path) -> Result<SiteConfig> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SiteConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(SiteConfig::default())
}
