//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use pergola_markdown::{parse_document, render_html};

use crate::livereload::{reload_client_script, ReloadHub, ReloadMessage};
use crate::watcher::{FileWatcher, WatchEvent};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory containing site content
    pub content_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            port: 7878,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    reload: ReloadHub,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let address = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = address
            .parse()
            .map_err(|_| ServerError::InvalidAddress(address))?;

        let state = Arc::new(ServerState {
            config: self.config.clone(),
            reload: ReloadHub::new(),
        });

        let (watcher, mut rx) = FileWatcher::new(&[self.config.content_dir.clone()])
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        // Forward watch events to connected clients
        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event);
            }
            // Keep watcher alive for the lifetime of the task
            drop(watcher);
        });

        let app = Router::new()
            .route("/__reload", get(ws_handler))
            .route("/__reload.js", get(reload_script_handler))
            .fallback(page_handler)
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ))
            .with_state(state);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Map a watch event to a reload message.
fn handle_watch_event(state: &Arc<ServerState>, event: WatchEvent) {
    match event {
        WatchEvent::ContentModified(path) => {
            tracing::info!("Content modified: {}", path.display());

            // Re-render the changed page and swap it in place; anything
            // that fails falls back to a full reload.
            match std::fs::read_to_string(&path) {
                Ok(source) => match render_main(&source) {
                    Ok((_, html)) => {
                        let url = url_for(&state.config.content_dir, &path);
                        state.reload.send(ReloadMessage::UpdateContent { path: url, html });
                    }
                    Err(e) => {
                        tracing::warn!("Failed to render {}: {}", path.display(), e);
                        state.reload.send(ReloadMessage::Reload);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path.display(), e);
                    state.reload.send(ReloadMessage::Reload);
                }
            }
        }

        WatchEvent::StyleModified(path) => {
            tracing::info!("Stylesheet modified: {}", path.display());
            state.reload.send(ReloadMessage::Reload);
        }

        WatchEvent::Created(_) | WatchEvent::Deleted(_) | WatchEvent::Modified(_) => {
            state.reload.send(ReloadMessage::Reload);
        }
    }
}

/// Handler for content pages, rendered on the fly.
async fn page_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> impl IntoResponse {
    let Some(file) = resolve_content(&state.config.content_dir, uri.path()) else {
        let body = dev_shell(
            "Not Found",
            "<article><h1>Not Found</h1><p>No content file matches this path.</p></article>",
        );
        return (StatusCode::NOT_FOUND, Html(body));
    };

    let page = std::fs::read_to_string(&file)
        .map_err(|e| e.to_string())
        .and_then(|source| render_main(&source));

    match page {
        Ok((title, main)) => (StatusCode::OK, Html(dev_shell(&title, &main))),
        Err(e) => {
            let body = dev_shell(
                "Render Error",
                &format!("<article><h1>Render error</h1><pre>{}</pre></article>", e),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Html(body))
        }
    }
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.reload.subscribe();

    let Ok(msg) = serde_json::to_string(&ReloadMessage::Connected) else {
        return;
    };
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    while let Ok(reload_msg) = rx.recv().await {
        let Ok(json) = serde_json::to_string(&reload_msg) else {
            continue;
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the live reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    let script = reload_client_script("/__reload");
    ([("content-type", "application/javascript")], script)
}

/// Find the content file a URL path refers to.
fn resolve_content(content_dir: &Path, url_path: &str) -> Option<PathBuf> {
    let trimmed = url_path.trim_matches('/');
    if trimmed.split('/').any(|segment| segment == "..") {
        return None;
    }

    let candidates = if trimmed.is_empty() {
        vec!["index.md".to_string(), "index.mdx".to_string()]
    } else {
        vec![
            format!("{trimmed}.md"),
            format!("{trimmed}.mdx"),
            format!("{trimmed}/index.md"),
            format!("{trimmed}/index.mdx"),
        ]
    };

    candidates
        .into_iter()
        .map(|candidate| content_dir.join(candidate))
        .find(|path| path.is_file())
}

/// URL path a content file is served under.
fn url_for(content_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(content_dir).unwrap_or(path);
    let stemmed = relative.with_extension("");

    let mut segments: Vec<String> = stemmed
        .iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect();
    if segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Render a content file's main-element HTML: the article plus the
/// outline sidebar, built from the page's headings.
fn render_main(source: &str) -> Result<(String, String), String> {
    let doc = parse_document(source).map_err(|e| e.to_string())?;

    let title = doc
        .frontmatter
        .as_ref()
        .map(|f| f.title.clone())
        .unwrap_or_else(|| "Untitled".to_string());

    let article = render_html(&doc.content);
    let outline = pergola_outline::build(&doc.headings);
    let toc = pergola_outline::render(&outline);

    let aside = if toc.is_empty() {
        String::new()
    } else {
        format!(
            "<aside><nav class=\"on-this-page\"><strong>On this page</strong>{}</nav></aside>",
            toc
        )
    };

    Ok((title, format!("<article>{}</article>{}", article, aside)))
}

/// Minimal HTML shell for dev pages.
fn dev_shell(title: &str, main: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{} - pergola dev</title>
  <style>
    body {{ font-family: system-ui, sans-serif; max-width: 60rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.6; }}
    main {{ display: flex; gap: 2rem; }}
    article {{ flex: 1; min-width: 0; }}
    aside {{ flex: 0 0 14rem; font-size: 0.9rem; }}
    .on-this-page ol {{ list-style: none; padding-left: 0; }}
    .on-this-page ol ol {{ padding-left: 1rem; }}
    pre {{ background: #f5f5f5; padding: 1rem; border-radius: 0.5rem; overflow-x: auto; }}
  </style>
</head>
<body>
  <main>{}</main>
  <script src="/__reload.js"></script>
</body>
</html>"#,
        title, main
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 7878);
    }

    #[test]
    fn resolves_urls_to_content_files() {
        let temp = tempdir().unwrap();
        let content = temp.path();
        fs::write(content.join("index.md"), "# Home").unwrap();
        fs::create_dir_all(content.join("blog")).unwrap();
        fs::write(content.join("blog/juggling.md"), "# Juggling").unwrap();
        fs::write(content.join("blog/index.md"), "# Blog").unwrap();

        assert_eq!(
            resolve_content(content, "/"),
            Some(content.join("index.md"))
        );
        assert_eq!(
            resolve_content(content, "/blog/juggling/"),
            Some(content.join("blog/juggling.md"))
        );
        assert_eq!(
            resolve_content(content, "/blog/"),
            Some(content.join("blog/index.md"))
        );
        assert_eq!(resolve_content(content, "/missing/"), None);
        assert_eq!(resolve_content(content, "/../etc/passwd"), None);
    }

    #[test]
    fn maps_content_files_to_urls() {
        let content = Path::new("content");

        assert_eq!(url_for(content, Path::new("content/index.md")), "/");
        assert_eq!(
            url_for(content, Path::new("content/about.md")),
            "/about/"
        );
        assert_eq!(
            url_for(content, Path::new("content/blog/juggling.md")),
            "/blog/juggling/"
        );
        assert_eq!(url_for(content, Path::new("content/blog/index.md")), "/blog/");
    }

    #[test]
    fn renders_main_with_outline_sidebar() {
        let (title, main) =
            render_main("---\ntitle: Guide\n---\n# Guide\n\n## Setup\n\nwords\n").unwrap();

        assert_eq!(title, "Guide");
        assert!(main.contains("<h1 id=\"guide\">Guide</h1>"));
        assert!(main.contains("On this page"));
        assert!(main.contains("<a href=\"#setup\">Setup</a>"));
    }

    #[test]
    fn pages_without_headings_get_no_sidebar() {
        let (_, main) = render_main("Just a paragraph.").unwrap();

        assert!(!main.contains("<aside>"));
    }
}
