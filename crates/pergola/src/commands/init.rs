//! Initialize a new site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing pergola site...");

    let content_dir = Path::new("content");

    if content_dir.exists() {
        if !yes {
            tracing::warn!("content/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(content_dir).context("Failed to create content directory")?;
    }

    let config_path = Path::new("site.toml");
    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG).context("Failed to write site.toml")?;
        tracing::info!("Created site.toml");
    }

    let index_path = content_dir.join("index.md");
    if !index_path.exists() || yes {
        fs::write(&index_path, DEFAULT_INDEX).context("Failed to write index.md")?;
        tracing::info!("Created content/index.md");
    }

    let about_path = content_dir.join("about.md");
    if !about_path.exists() || yes {
        fs::write(&about_path, DEFAULT_ABOUT).context("Failed to write about.md")?;
        tracing::info!("Created content/about.md");
    }

    let blog_dir = content_dir.join("blog");
    if !blog_dir.exists() {
        fs::create_dir_all(&blog_dir).context("Failed to create blog directory")?;
    }

    let post_path = blog_dir.join("hello-world.md");
    if !post_path.exists() || yes {
        fs::write(&post_path, DEFAULT_POST).context("Failed to write hello-world.md")?;
        tracing::info!("Created content/blog/hello-world.md");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'pergola dev' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Pergola Configuration

[site]
# Site title, shown in the header and page titles
title = "My Site"

# Default author for posts
author = "Your Name"

# Short line shown under the author name
tagline = "Software Engineer"

# Base URL (for deployment)
base_url = "/"

[content]
# Source directory for content
dir = "content"

# Output directory for the built site
output = "dist"

[build]
# Enable minification
minify = true

# Project gallery entries; the Projects page appears when at least one exists
# [[projects]]
# title = "My Project"
# url = "https://example.com/"
# description = "Something I built."
# image = "my-project.png"
"#;

const DEFAULT_INDEX: &str = r#"---
title: Home
order: 1
---

# Welcome

This is your personal site, powered by **pergola**.

## Writing

Posts live in `content/blog/`. Each post is a markdown file with
frontmatter for the title and date.

## Customizing

Edit `site.toml` to change the site title, author, and projects.
"#;

const DEFAULT_ABOUT: &str = r#"---
title: About
order: 2
---

# About

A few words about yourself.

## Background

Where you come from and what you work on.

## Contact

How to reach you.
"#;

const DEFAULT_POST: &str = r#"---
title: Hello, World
date: 2024-01-01
description: The obligatory first post.
---

# Hello, World

Every site needs a first post.

## What to expect

Writing about what I'm building and learning.

## Colophon

This site is generated by pergola. Headings in each article become the
"On this page" outline in the sidebar automatically.
"#;
