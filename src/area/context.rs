//! Generation context threaded down the area tree.
//!
//! The [`Purpose`] of a compilation is reduced to two independent values
//! carried on the context:
//!
//! | Purpose        | `LinkShape`  | `OutputSet.email` |
//! |----------------|--------------|-------------------|
//! | `StaticServe`  | `Extension`  | no                |
//! | `DynamicServe` | `Clean`      | no                |
//! | `Bind`         | `Clean`      | yes               |
//!
//! A context is an immutable `Copy` value. Each area derives its children's
//! context through `with_*` transitions; nothing is mutated in place.

use crate::{page::ParsedPage, render::Renderer, theme::Theme};
use std::path::{Component, Path};

/// What a compilation is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Files on disk, addressed with `.html` links.
    StaticServe,
    /// Files served over HTTP under clean links.
    DynamicServe,
    /// Files plus email artifacts, described by a binding map.
    Bind,
}

impl Purpose {
    pub const fn link_shape(self) -> LinkShape {
        match self {
            Self::StaticServe => LinkShape::Extension,
            Self::DynamicServe | Self::Bind => LinkShape::Clean,
        }
    }

    pub const fn outputs(self) -> OutputSet {
        OutputSet {
            email: matches!(self, Self::Bind),
        }
    }
}

/// How page links are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkShape {
    /// `/sub/page.html`; custom urls are not honored.
    Extension,
    /// `/sub/page`; custom urls replace the path-derived link.
    Clean,
}

impl LinkShape {
    /// Path-derived link of a page whose source is `rel` (relative to the root).
    pub fn page_link(self, rel: &Path) -> String {
        let stem = rel.with_extension("");
        let link = url_path(&stem);
        match self {
            Self::Extension => format!("{link}.html"),
            Self::Clean => link,
        }
    }

    /// Link of an area directory (`/` for the root).
    pub fn dir_link(self, rel: &Path) -> String {
        url_path(rel)
    }
}

/// Absolute url path of a relative filesystem path.
pub fn url_path(rel: &Path) -> String {
    let segments: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("/{}", segments.join("/"))
}

/// Canonical route key of `link`: no trailing slash, `/` for the root.
pub fn route_key(link: &str) -> &str {
    match link.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Extra artifacts a compilation emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputSet {
    /// `<stem>_email.html` and `<stem>_email.txt` next to each post.
    pub email: bool,
}

/// Immutable context for one level of the traversal.
#[derive(Clone, Copy)]
pub struct GenContext<'a> {
    pub theme: &'a Theme,
    pub renderer: &'a dyn Renderer,
    /// Output root.
    pub root: &'a Path,
    /// Nearest `index.md` at or above the current area.
    pub index: Option<&'a ParsedPage>,
    pub head: &'a str,
    pub foot: &'a str,
    pub links: LinkShape,
    pub outputs: OutputSet,
}

impl<'a> GenContext<'a> {
    pub fn new(
        theme: &'a Theme,
        renderer: &'a dyn Renderer,
        root: &'a Path,
        purpose: Purpose,
    ) -> Self {
        Self {
            theme,
            renderer,
            root,
            index: None,
            head: "",
            foot: "",
            links: purpose.link_shape(),
            outputs: purpose.outputs(),
        }
    }

    pub fn with_index(self, index: &'a ParsedPage) -> Self {
        Self {
            index: Some(index),
            ..self
        }
    }

    pub fn with_head_foot(self, head: &'a str, foot: &'a str) -> Self {
        Self { head, foot, ..self }
    }

    pub fn without_head_foot(self) -> Self {
        self.with_head_foot("", "")
    }
}
