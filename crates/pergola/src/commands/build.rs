//! Static site build command.

use std::path::PathBuf;

use anyhow::Result;
use pergola_static::SiteBuilder;

use crate::config::SiteConfig;

/// Run the build command.
pub async fn run(config: SiteConfig, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building site...");

    let mut build_config = config.into_build_config();
    if let Some(output) = output {
        build_config.output_dir = output;
    }
    if let Some(minify) = minify {
        build_config.minify = minify;
    }

    let result = SiteBuilder::new(build_config).build()?;

    tracing::info!(
        "Built {} pages ({} posts) in {}ms",
        result.pages,
        result.posts,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
