//! Document outline structuring for pergola pages.
//!
//! Turns the flat heading list extracted from a page into a tree of
//! outline nodes, and renders that tree as the nested "On this page"
//! navigation. Both halves are pure functions over request-scoped values:
//! a page builds its outline once, keeps it for the lifetime of the
//! render, and projects it into markup wherever the sidebar appears.

pub mod builder;
pub mod render;

pub use builder::{build, Heading, OutlineNode};
pub use render::render;
