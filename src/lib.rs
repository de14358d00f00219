//! Strata - compile a directory tree of markdown areas into a site.
//!
//! A source tree is parsed into nested [`Area`]s (one per directory) holding
//! [`Page`]s and opaque image assets. The tree is then compiled for one
//! [`Purpose`]:
//!
//! | Purpose        | Link shape        | Result                                   |
//! |----------------|-------------------|------------------------------------------|
//! | `StaticServe`  | `/post.html`      | files written under a target directory   |
//! | `DynamicServe` | `/post`           | a [`SiteHandler`] backed by a temp dir   |
//! | `Bind`         | `/post`           | a map of link path to [`Resource`]       |
//!
//! ```text
//! source/ ──parse──▶ Site { Area tree, hash } ──inject──▶ (custom pages)
//!                          │
//!                          ├── generate(target, theme, purpose)
//!                          ├── handler(theme)  ─▶ SiteHandler { serve, destroy }
//!                          └── bindings(target, theme, head, foot)
//! ```

pub mod logger;

pub mod area;
pub mod cli;
pub mod config;
pub mod page;
pub mod render;
pub mod serve;
pub mod site;
pub mod theme;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use area::{
    Area, GenContext, InjectError, LinkShape, Outline, OutputSet, PostResource, Purpose, Resource,
};
pub use page::{
    CustomPage, Page, ParsedPage,
    authoring::{Author, Authoring, resolve_authors},
    metadata::{MetadataError, Timing},
    post::Post,
};
pub use render::{MarkdownRenderer, Rendered, Renderer};
pub use serve::{LiveHandler, SiteHandler};
pub use site::Site;
pub use theme::{Theme, ThemeError};

/// Returns true when `err` (or anything it wraps) is a missing custom page
/// template, which callers usually map to "feature not offered by this theme".
pub fn is_missing_custom_template(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<ThemeError>(),
            Some(ThemeError::MissingCustomTemplate(_))
        )
    })
}
