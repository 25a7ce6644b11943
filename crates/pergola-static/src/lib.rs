//! Static site builder for pergola.
//!
//! Turns a directory of markdown content into a personal website: article
//! pages with outline sidebars, a blog index, a project gallery, site
//! navigation, and the supporting assets.

pub mod assets;
pub mod builder;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use templates::ProjectCard;
