//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use walkdir::WalkDir;

use pergola_markdown::{parse_document, render_html, Document};
use pergola_outline::OutlineNode;

use crate::assets::AssetPipeline;
use crate::templates::{NavItem, PageContext, PostSummary, ProjectCard, TemplateEngine};

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source content directory
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify generated CSS
    pub minify: bool,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Default author for posts without their own byline
    pub author: Option<String>,

    /// Short line shown under the author name
    pub tagline: Option<String>,

    /// Paths to extra CSS stylesheets to include
    pub styles: Vec<String>,

    /// Project gallery entries
    pub projects: Vec<ProjectCard>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/".to_string(),
            title: "Personal Site".to_string(),
            author: None,
            tagline: None,
            styles: vec![],
            projects: vec![],
        }
    }
}

/// Result of a build.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written, generated indexes included
    pub pages: usize,

    /// Number of blog posts among them
    pub posts: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read content: {0}")]
    ReadError(String),

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// What kind of page a content file produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    /// Standalone page
    Page,
    /// Dated blog post under `blog/`
    Post,
}

/// A discovered content page.
#[derive(Debug)]
struct PageInfo {
    /// Path relative to the content directory
    relative_path: PathBuf,

    /// Output path
    output_path: PathBuf,

    /// Site-relative URL
    url: String,

    /// Parsed document
    doc: Document,

    kind: PageKind,
}

/// A page after rendering, with the data the site-wide outputs need.
#[derive(Debug)]
struct BuiltPage {
    url: String,
    title: String,
    description: Option<String>,
    /// The page's outline forest, built once per page and reused for the
    /// sidebar and the search index
    outline: Vec<OutlineNode>,
    date: Option<NaiveDate>,
}

/// Static site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let pages = self.discover_pages()?;
        let nav = self.build_navigation(&pages);

        // Render content pages in parallel
        let built: Vec<BuiltPage> = pages
            .par_iter()
            .map(|page| self.build_page(page, &nav))
            .collect::<Result<_, _>>()?;

        let posts = pages.iter().filter(|p| p.kind == PageKind::Post).count();
        let mut total_pages = built.len();

        // Generated indexes, unless the author wrote their own
        let mut generated = Vec::new();
        let blog_url = self.join_url("blog");
        if posts > 0 && !built.iter().any(|p| p.url == blog_url) {
            generated.push(self.build_blog_index(&pages, &nav, &blog_url)?);
            total_pages += 1;
        }
        let projects_url = self.join_url("projects");
        if !self.config.projects.is_empty() && !built.iter().any(|p| p.url == projects_url) {
            generated.push(self.build_project_gallery(&nav, &projects_url)?);
            total_pages += 1;
        }

        self.generate_assets()?;
        self.generate_search_index(&built)?;
        self.generate_sitemap(built.iter().chain(generated.iter()))?;

        Ok(BuildResult {
            pages: total_pages,
            posts,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Discover all content pages.
    ///
    /// Files under `blog/` are posts, ordered newest first; everything
    /// else is a standalone page ordered by frontmatter `order`. Drafts
    /// are skipped.
    fn discover_pages(&self) -> Result<Vec<PageInfo>, BuildError> {
        if !self.config.content_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Content directory not found: {}",
                self.config.content_dir.display()
            )));
        }

        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.config.content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "md" && ext != "mdx" {
                continue;
            }

            let source = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let doc = parse_document(&source).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            if doc.frontmatter.as_ref().is_some_and(|f| f.draft) {
                tracing::debug!("Skipping draft {}", path.display());
                continue;
            }

            let relative_path = path
                .strip_prefix(&self.config.content_dir)
                .unwrap_or(path)
                .to_path_buf();

            // Everything under blog/ is a post, except an authored index
            // page, which replaces the generated listing.
            let stem = relative_path.file_stem().and_then(|s| s.to_str());
            let kind = if relative_path.starts_with("blog") && stem != Some("index") {
                PageKind::Post
            } else {
                PageKind::Page
            };

            let output_path = self.calculate_output_path(&relative_path, &doc);
            let url = self.path_to_url(&output_path);

            pages.push(PageInfo {
                relative_path,
                output_path,
                url,
                doc,
                kind,
            });
        }

        // Posts newest first (undated last), then standalone pages by
        // their navigation order.
        pages.sort_by(|a, b| match (a.kind, b.kind) {
            (PageKind::Post, PageKind::Post) => {
                let date_a = a.doc.frontmatter.as_ref().and_then(|f| f.date);
                let date_b = b.doc.frontmatter.as_ref().and_then(|f| f.date);
                match (date_a, date_b) {
                    (Some(da), Some(db)) => db.cmp(&da),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => a.relative_path.cmp(&b.relative_path),
                }
            }
            (PageKind::Page, PageKind::Page) => {
                let order_a = a.doc.frontmatter.as_ref().and_then(|f| f.order).unwrap_or(999);
                let order_b = b.doc.frontmatter.as_ref().and_then(|f| f.order).unwrap_or(999);
                order_a.cmp(&order_b)
            }
            (PageKind::Page, PageKind::Post) => std::cmp::Ordering::Less,
            (PageKind::Post, PageKind::Page) => std::cmp::Ordering::Greater,
        });

        Ok(pages)
    }

    /// Calculate the output path for a content file.
    fn calculate_output_path(&self, relative: &Path, doc: &Document) -> PathBuf {
        if let Some(slug) = doc.frontmatter.as_ref().and_then(|f| f.slug.as_deref()) {
            return self.config.output_dir.join(slug).join("index.html");
        }

        let stem = relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index");
        let parent = relative.parent().unwrap_or(Path::new(""));

        if stem == "index" {
            // content/index.md -> dist/index.html
            self.config.output_dir.join(parent).join("index.html")
        } else {
            // content/blog/juggling.md -> dist/blog/juggling/index.html
            self.config
                .output_dir
                .join(parent)
                .join(stem)
                .join("index.html")
        }
    }

    /// Convert an output path to a site-relative URL.
    fn path_to_url(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.config.output_dir).unwrap_or(path);

        let url = relative
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        if url.is_empty() {
            self.config.base_url.clone()
        } else {
            format!("{}{}/", self.config.base_url, url)
        }
    }

    fn join_url(&self, segment: &str) -> String {
        format!("{}{}/", self.config.base_url, segment)
    }

    /// Build the site navigation: Home, standalone pages that opted in,
    /// then the blog and project sections when they exist.
    fn build_navigation(&self, pages: &[PageInfo]) -> Vec<NavItem> {
        let mut nav = vec![NavItem {
            title: "Home".to_string(),
            path: self.config.base_url.clone(),
            active: false,
        }];

        for page in pages {
            if page.kind != PageKind::Page || page.url == self.config.base_url {
                continue;
            }
            let Some(fm) = page.doc.frontmatter.as_ref() else {
                continue;
            };
            if !fm.nav {
                continue;
            }
            nav.push(NavItem {
                title: fm.title.clone(),
                path: page.url.clone(),
                active: false,
            });
        }

        if pages.iter().any(|p| p.kind == PageKind::Post) {
            nav.push(NavItem {
                title: "Blog".to_string(),
                path: self.join_url("blog"),
                active: false,
            });
        }

        if !self.config.projects.is_empty() {
            nav.push(NavItem {
                title: "Projects".to_string(),
                path: self.join_url("projects"),
                active: false,
            });
        }

        nav
    }

    /// Mark the current page in a copy of the navigation.
    fn nav_for(&self, nav: &[NavItem], url: &str) -> Vec<NavItem> {
        nav.iter()
            .map(|item| NavItem {
                title: item.title.clone(),
                path: item.path.clone(),
                active: item.path == url,
            })
            .collect()
    }

    fn stylesheet_urls(&self) -> Vec<String> {
        self.config
            .styles
            .iter()
            .map(|s| {
                let filename = Path::new(s)
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or("style.css");
                format!("{}assets/{}", self.config.base_url, filename)
            })
            .collect()
    }

    /// Render and write a single content page.
    fn build_page(&self, page: &PageInfo, nav: &[NavItem]) -> Result<BuiltPage, BuildError> {
        let content = render_html(&page.doc.content);

        // The outline is built once per page render and reused for both
        // the sidebar markup and the search index.
        let outline = pergola_outline::build(&page.doc.headings);
        let toc = pergola_outline::render(&outline);

        let fm = page.doc.frontmatter.as_ref();
        let title = fm.map(|f| f.title.clone()).unwrap_or_else(|| {
            page.relative_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });
        let description = fm.and_then(|f| f.description.clone());
        let date = fm.and_then(|f| f.date);
        let author = fm
            .and_then(|f| f.author.clone())
            .or_else(|| self.config.author.clone());

        let context = PageContext {
            title: title.clone(),
            site_title: self.config.title.clone(),
            description: description.clone(),
            author,
            date: date.map(format_date),
            tagline: self.config.tagline.clone(),
            content,
            toc,
            nav: self.nav_for(nav, &page.url),
            base_url: self.config.base_url.clone(),
            // Page URLs are already prefixed with the base URL, so they
            // are absolute whenever the base URL is.
            canonical: page.url.clone(),
            styles: self.stylesheet_urls(),
        };

        let template = match page.kind {
            PageKind::Post => "post.html",
            PageKind::Page => "page.html",
        };
        let html = self
            .templates
            .render_page(template, &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        self.write_page(&page.output_path, &html)?;

        Ok(BuiltPage {
            url: page.url.clone(),
            title,
            description,
            outline,
            date,
        })
    }

    /// Generate the blog index listing posts newest first.
    fn build_blog_index(
        &self,
        pages: &[PageInfo],
        nav: &[NavItem],
        url: &str,
    ) -> Result<BuiltPage, BuildError> {
        let posts: Vec<PostSummary> = pages
            .iter()
            .filter(|p| p.kind == PageKind::Post)
            .map(|p| {
                let fm = p.doc.frontmatter.as_ref();
                PostSummary {
                    title: fm.map(|f| f.title.clone()).unwrap_or_else(|| "Untitled".to_string()),
                    url: p.url.clone(),
                    date: fm.and_then(|f| f.date).map(format_date),
                    description: fm.and_then(|f| f.description.clone()),
                }
            })
            .collect();

        let context = self.section_context("Blog", nav, url);
        let html = self
            .templates
            .render_blog_index(&context, &posts)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let output_path = self.config.output_dir.join("blog").join("index.html");
        self.write_page(&output_path, &html)?;

        Ok(BuiltPage {
            url: url.to_string(),
            title: "Blog".to_string(),
            description: None,
            outline: vec![],
            date: None,
        })
    }

    /// Generate the project gallery from the configured entries.
    fn build_project_gallery(&self, nav: &[NavItem], url: &str) -> Result<BuiltPage, BuildError> {
        let context = self.section_context("Projects", nav, url);
        let html = self
            .templates
            .render_projects(&context, &self.config.projects)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let output_path = self.config.output_dir.join("projects").join("index.html");
        self.write_page(&output_path, &html)?;

        Ok(BuiltPage {
            url: url.to_string(),
            title: "Projects".to_string(),
            description: None,
            outline: vec![],
            date: None,
        })
    }

    fn section_context(&self, title: &str, nav: &[NavItem], url: &str) -> PageContext {
        PageContext {
            title: title.to_string(),
            site_title: self.config.title.clone(),
            description: None,
            author: self.config.author.clone(),
            date: None,
            tagline: self.config.tagline.clone(),
            content: String::new(),
            toc: String::new(),
            nav: self.nav_for(nav, url),
            base_url: self.config.base_url.clone(),
            canonical: url.to_string(),
            styles: self.stylesheet_urls(),
        }
    }

    fn write_page(&self, output_path: &Path, html: &str) -> Result<(), BuildError> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }
        fs::write(output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate site assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::site_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        fs::write(assets_dir.join("site.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(assets_dir.join("site.js"), AssetPipeline::site_js())
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Copy extra stylesheets
        for style_path in &self.config.styles {
            let source_path = PathBuf::from(style_path);
            if source_path.exists() {
                let filename = source_path
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or("style.css");
                let content = fs::read_to_string(&source_path).map_err(|e| {
                    BuildError::ReadError(format!("Failed to read stylesheet: {}", e))
                })?;
                fs::write(assets_dir.join(filename), content)
                    .map_err(|e| BuildError::WriteError(e.to_string()))?;
                tracing::info!("Copied stylesheet from {}", style_path);
            } else {
                tracing::warn!("Stylesheet not found: {}", style_path);
            }
        }

        Ok(())
    }

    /// Generate the search index, including each page's outline forest
    /// for consumers that want the document structure.
    fn generate_search_index(&self, built: &[BuiltPage]) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = built
            .iter()
            .map(|page| {
                serde_json::json!({
                    "title": page.title,
                    "description": page.description,
                    "url": page.url,
                    "outline": page.outline,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate sitemap.xml and robots.txt.
    fn generate_sitemap<'a>(
        &self,
        pages: impl Iterator<Item = &'a BuiltPage>,
    ) -> Result<(), BuildError> {
        let urls: Vec<String> = pages
            .map(|page| {
                let lastmod = page
                    .date
                    .map(|d| format!("\n    <lastmod>{}</lastmod>", d.format("%Y-%m-%d")))
                    .unwrap_or_default();
                format!(
                    "  <url>\n    <loc>{}</loc>{}\n  </url>",
                    page.url, lastmod
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}sitemap.xml",
            self.config.base_url
        );
        fs::write(self.config.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }
}

/// Format a date the way bylines show it.
fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
