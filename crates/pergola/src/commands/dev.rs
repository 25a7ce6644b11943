//! Development server command.

use std::path::PathBuf;

use anyhow::Result;
use pergola_server::{DevServer, DevServerConfig};

use crate::config::SiteConfig;

/// Run the dev server.
pub async fn run(config: &SiteConfig, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let dev_config = DevServerConfig {
        content_dir: PathBuf::from(&config.content.dir),
        port,
        open,
        ..Default::default()
    };

    DevServer::new(dev_config).start().await?;

    Ok(())
}
