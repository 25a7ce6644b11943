//! Site asset generation.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the site stylesheet.
    pub fn site_css() -> String {
        SITE_CSS.to_string()
    }

    /// Generate the site script.
    pub fn site_js() -> String {
        SITE_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const SITE_CSS: &str = r#"/* Pergola default theme */

:root {
  --content-max-width: 46rem;
  --aside-width: 16rem;
  --accent: #6c5ce7;
  --text: #2d3436;
  --muted: #636e72;
  --surface: #f5f3ef;
  --border: #dcd6cc;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  color: var(--text);
  background: var(--surface);
  line-height: 1.65;
}

.site-container {
  max-width: calc(var(--content-max-width) + var(--aside-width) + 4rem);
  margin: 0 auto;
  padding: 1.5rem;
}

header {
  display: flex;
  align-items: baseline;
  justify-content: space-between;
  gap: 1.5rem;
  margin-bottom: 2.5rem;
}

.site-logo {
  font-size: 1.3rem;
  font-weight: 700;
  color: var(--text);
  text-decoration: none;
}

.site-nav {
  display: flex;
  gap: 1.25rem;
}

.site-nav a {
  color: var(--muted);
  text-decoration: none;
  font-weight: 600;
}

.site-nav a:hover,
.site-nav a.active {
  color: var(--accent);
}

main {
  display: grid;
  grid-template-columns: minmax(0, var(--content-max-width)) var(--aside-width);
  gap: 2.5rem;
}

@media (max-width: 56rem) {
  main {
    grid-template-columns: 1fr;
  }
}

article h1,
article h2,
article h3 {
  margin: 1.75rem 0 0.75rem;
  line-height: 1.25;
}

article p,
article ul,
article ol {
  margin-bottom: 1rem;
}

article a {
  color: var(--accent);
}

article .head {
  display: flex;
  gap: 0.75rem;
  align-items: baseline;
  color: var(--muted);
  font-size: 0.9rem;
}

article h1.title {
  margin-top: 0.5rem;
}

/* Sidebar */
aside {
  font-size: 0.9rem;
}

.author-card {
  background: #fff;
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  padding: 1rem;
  margin-bottom: 1.5rem;
}

.author-card p {
  color: var(--muted);
}

.on-this-page strong {
  display: block;
  margin-bottom: 0.5rem;
}

.on-this-page ol {
  list-style: none;
  padding-left: 0;
}

.on-this-page ol ol {
  padding-left: 1rem;
}

.on-this-page a {
  display: block;
  padding: 0.15rem 0;
  color: var(--muted);
  text-decoration: none;
}

.on-this-page a:hover {
  color: var(--accent);
}

/* Blog index */
.blog-preview {
  border-bottom: 1px solid var(--border);
  padding: 1.25rem 0;
}

.blog-preview h2 {
  margin-bottom: 0.25rem;
}

.blog-preview h2 a {
  color: var(--text);
  text-decoration: none;
}

.blog-preview h2 a:hover {
  color: var(--accent);
}

.blog-preview time {
  color: var(--muted);
  font-size: 0.85rem;
}

/* Project gallery */
.project {
  display: block;
  color: inherit;
  text-decoration: none;
  background: #fff;
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  padding: 1.25rem;
  margin: 1rem 0;
}

.project:hover {
  border-color: var(--accent);
}

.project-contents {
  display: flex;
  gap: 1rem;
  align-items: flex-start;
}

.project-image {
  flex: 0 0 8rem;
  height: 5rem;
  border-radius: 0.25rem;
  background-size: cover;
  background-position: center;
}

/* Code frames */
.code-frame {
  position: relative;
  margin-bottom: 1rem;
}

.code-frame pre {
  background: #1e1e2e;
  color: #e4e4ef;
  padding: 1rem;
  border-radius: 0.5rem;
  overflow-x: auto;
}

.copy-button {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  border: none;
  border-radius: 0.25rem;
  background: rgba(255, 255, 255, 0.15);
  color: #e4e4ef;
  font-size: 0.75rem;
  padding: 0.25rem 0.5rem;
  cursor: pointer;
}

.copy-button:hover {
  background: rgba(255, 255, 255, 0.3);
}
"#;

const SITE_JS: &str = r#"// Copy buttons on code frames.
document.addEventListener('click', function (event) {
  const button = event.target.closest('.copy-button');
  if (!button || !navigator.clipboard) {
    return;
  }

  navigator.clipboard.writeText(button.dataset.clipboard || '').then(function () {
    const label = button.textContent;
    button.textContent = 'Copied!';
    setTimeout(function () {
      button.textContent = label;
    }, 1500);
  });
});
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_stylesheet_and_script() {
        assert!(AssetPipeline::site_css().contains(".on-this-page"));
        assert!(AssetPipeline::site_js().contains("copy-button"));
    }

    #[test]
    fn minifies_css() {
        let css = ".a {\n  color: red;\n}\n";

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(minified.len() < css.len());
        assert!(minified.contains(".a"));
    }
}
