//! Development server with live reload for pergola sites.
//!
//! Renders content pages on the fly and pushes reload events to the
//! browser over a WebSocket when content changes on disk.

pub mod livereload;
pub mod server;
pub mod watcher;

pub use livereload::{ReloadHub, ReloadMessage};
pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
