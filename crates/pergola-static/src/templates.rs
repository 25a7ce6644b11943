//! Template engine for rendering site pages.

use minijinja::{context, value::Value, Environment};

/// A navigation item.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
    /// Whether this is the current page
    pub active: bool,
}

/// A post entry on the blog index.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostSummary {
    pub title: String,
    pub url: String,
    /// Formatted publication date
    pub date: Option<String>,
    pub description: Option<String>,
}

/// A project gallery entry, configured in `site.toml`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProjectCard {
    pub title: String,
    pub url: String,
    pub description: String,
    /// Image path relative to the site root
    #[serde(default)]
    pub image: Option<String>,
}

/// Context for rendering a page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageContext {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Description for head metadata
    pub description: Option<String>,
    /// Author byline
    pub author: Option<String>,
    /// Formatted publication date, for posts
    pub date: Option<String>,
    /// Short line shown under the author name
    pub tagline: Option<String>,
    /// Rendered article HTML
    pub content: String,
    /// Rendered outline markup; empty when the page has no headings, in
    /// which case the sidebar block is suppressed entirely
    pub toc: String,
    /// Site navigation
    pub nav: Vec<NavItem>,
    /// Base URL
    pub base_url: String,
    /// Canonical URL of this page
    pub canonical: String,
    /// Extra stylesheet URLs
    pub styles: Vec<String>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the embedded site templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        for (name, source) in [
            ("base.html", BASE_TEMPLATE),
            ("nav.html", NAV_TEMPLATE),
            ("page.html", PAGE_TEMPLATE),
            ("post.html", POST_TEMPLATE),
            ("blog.html", BLOG_TEMPLATE),
            ("projects.html", PROJECTS_TEMPLATE),
        ] {
            env.add_template_owned(name.to_string(), source.to_string())
                .expect("embedded template must parse");
        }

        Self { env }
    }

    /// Render an article page or post.
    pub fn render_page(
        &self,
        template: &str,
        context: &PageContext,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;
        tmpl.render(context)
    }

    /// Render the blog index page.
    pub fn render_blog_index(
        &self,
        context: &PageContext,
        posts: &[PostSummary],
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("blog.html")?;
        tmpl.render(context! {
            posts => posts,
            ..Value::from_serialize(context)
        })
    }

    /// Render the project gallery page.
    pub fn render_projects(
        &self,
        context: &PageContext,
        projects: &[ProjectCard],
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("projects.html")?;
        tmpl.render(context! {
            projects => projects,
            ..Value::from_serialize(context)
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{{ title }} - {{ site_title }}</title>
  <link rel="canonical" href="{{ canonical }}">
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}{% if author %}<meta name="author" content="{{ author }}">
  {% endif %}<meta property="og:title" content="{{ title }}">
  {% if description %}<meta property="og:description" content="{{ description }}">
  {% endif %}{% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}<link rel="stylesheet" href="{{ base_url }}assets/site.css">
</head>
<body>
  <div class="site-container">
    <header>
      <a href="{{ base_url }}" class="site-logo">{{ site_title }}</a>
      {% include "nav.html" %}
    </header>
    <main>
      {% block content %}{% endblock %}
      <aside>
        {% block aside %}{% endblock %}
      </aside>
    </main>
  </div>
  <script src="{{ base_url }}assets/site.js"></script>
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<nav class="site-nav">
{% for item in nav %}  <a href="{{ item.path }}"{% if item.active %} class="active"{% endif %}>{{ item.title }}</a>
{% endfor %}</nav>"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article>
{{ content | safe }}
</article>
{% endblock %}

{% block aside %}
{% if toc %}
<nav class="on-this-page">
  <strong>On this page</strong>
  {{ toc | safe }}
</nav>
{% endif %}
{% endblock %}"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article>
  <div class="head">
    {% if date %}<time>{{ date }}</time>
    {% endif %}<small>By {% if author %}{{ author }}{% else %}unknown author{% endif %}</small>
  </div>
  <h1 class="title">{{ title }}</h1>
{{ content | safe }}
</article>
{% endblock %}

{% block aside %}
<div class="author-card">
  <div class="details">
    <h5>{% if author %}{{ author }}{% else %}{{ site_title }}{% endif %}</h5>
    {% if tagline %}<p>{{ tagline }}</p>{% endif %}
  </div>
</div>
{% if toc %}
<nav class="on-this-page">
  <strong>On this page</strong>
  {{ toc | safe }}
</nav>
{% endif %}
{% endblock %}"##;

const BLOG_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<h1>{{ title }}</h1>
{% for post in posts %}
<div class="blog-preview">
  <h2><a href="{{ post.url }}">{{ post.title }}</a></h2>
  {% if post.date %}<time>{{ post.date }}</time>{% endif %}
  {% if post.description %}<p>{{ post.description }}</p>{% endif %}
</div>
{% endfor %}
{% endblock %}"##;

const PROJECTS_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<h1>{{ title }}</h1>
<p>Some things I've built, mostly for fun</p>
{% for project in projects %}
<a class="project" href="{{ project.url }}" target="_blank" rel="noopener noreferrer">
  <div>
    <h2>{{ project.title }}</h2>
    <div class="project-contents">
      {% if project.image %}<div class="project-image" style="background-image: url('{{ base_url }}{{ project.image }}')"></div>
      {% endif %}<p>{{ project.description }}</p>
    </div>
  </div>
</a>
{% endfor %}
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PageContext {
        PageContext {
            title: "About".to_string(),
            site_title: "Sam's Site".to_string(),
            description: Some("A page about me".to_string()),
            author: Some("Sam".to_string()),
            date: None,
            tagline: Some("Software Engineer".to_string()),
            content: "<p>Hello there</p>".to_string(),
            toc: String::new(),
            nav: vec![
                NavItem {
                    title: "Home".to_string(),
                    path: "/".to_string(),
                    active: false,
                },
                NavItem {
                    title: "Blog".to_string(),
                    path: "/blog/".to_string(),
                    active: true,
                },
            ],
            base_url: "/".to_string(),
            canonical: "/about/".to_string(),
            styles: vec![],
        }
    }

    #[test]
    fn renders_a_basic_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_page("page.html", &context()).unwrap();

        assert!(html.contains("<title>About - Sam's Site</title>"));
        assert!(html.contains("<p>Hello there</p>"));
        assert!(html.contains("<meta name=\"description\" content=\"A page about me\">"));
        assert!(html.contains("<link rel=\"canonical\" href=\"/about/\">"));
    }

    #[test]
    fn navigation_marks_the_active_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_page("page.html", &context()).unwrap();

        assert!(html.contains("<a href=\"/blog/\" class=\"active\">Blog</a>"));
        assert!(html.contains("<a href=\"/\">Home</a>"));
    }

    #[test]
    fn empty_outline_suppresses_the_sidebar_block() {
        let engine = TemplateEngine::new();

        let html = engine.render_page("page.html", &context()).unwrap();

        assert!(!html.contains("On this page"));
    }

    #[test]
    fn outline_markup_is_emitted_unescaped() {
        let engine = TemplateEngine::new();
        let mut ctx = context();
        ctx.toc = "<ol><li><a href=\"#intro\">Intro</a></li></ol>".to_string();

        let html = engine.render_page("page.html", &ctx).unwrap();

        assert!(html.contains("On this page"));
        assert!(html.contains("<ol><li><a href=\"#intro\">Intro</a></li></ol>"));
    }

    #[test]
    fn post_byline_falls_back_when_no_author_is_known() {
        let engine = TemplateEngine::new();
        let mut ctx = context();
        ctx.author = None;
        ctx.date = Some("April 1, 2023".to_string());

        let html = engine.render_page("post.html", &ctx).unwrap();

        assert!(html.contains("<time>April 1, 2023</time>"));
        assert!(html.contains("By unknown author"));
    }

    #[test]
    fn blog_index_lists_posts_in_the_order_given() {
        let engine = TemplateEngine::new();
        let posts = vec![
            PostSummary {
                title: "Newest".to_string(),
                url: "/blog/newest/".to_string(),
                date: Some("July 19, 2023".to_string()),
                description: Some("Fresh".to_string()),
            },
            PostSummary {
                title: "Oldest".to_string(),
                url: "/blog/oldest/".to_string(),
                date: None,
                description: None,
            },
        ];

        let html = engine.render_blog_index(&context(), &posts).unwrap();

        let newest = html.find("Newest").unwrap();
        let oldest = html.find("Oldest").unwrap();
        assert!(newest < oldest);
        assert!(html.contains("<a href=\"/blog/newest/\">Newest</a>"));
    }

    #[test]
    fn project_gallery_renders_cards() {
        let engine = TemplateEngine::new();
        let projects = vec![ProjectCard {
            title: "So Fly".to_string(),
            url: "https://example.com/so-fly/".to_string(),
            description: "Help the frog catch its dinner.".to_string(),
            image: Some("so-fly.png".to_string()),
        }];

        let html = engine.render_projects(&context(), &projects).unwrap();

        assert!(html.contains("<h2>So Fly</h2>"));
        assert!(html.contains("href=\"https://example.com/so-fly/\""));
        assert!(html.contains("background-image: url('/so-fly.png')"));
    }
}
