//! Whole-site entry points: parse once, compile for any purpose.
//!
//! ```text
//! Site::parse(source, style)
//!   ├── GitRepo::discover      history fallback + hash
//!   ├── digest_dir             hash outside version control
//!   └── Area::parse            the tree
//!
//! site.generate(target, theme, purpose)     Writer
//! site.handler(theme)                       Writer + RouteTable   (temp dir)
//! site.bindings(target, theme, head, foot)  Writer + Bindings
//! ```

use crate::{
    area::{
        Area, Bindings, GenContext, InjectError, LinkShape, Outline, ParseState, Purpose, Resource,
        RouteTable, Writer,
    },
    log,
    page::CustomPage,
    render::{MarkdownRenderer, Renderer},
    serve::SiteHandler,
    theme::Theme,
    utils::{git::GitRepo, hash::digest_dir},
};
use anyhow::{Context, Result};
use std::{collections::BTreeMap, fs, path::Path, rc::Rc};
use tempfile::TempDir;

/// A parsed source tree with its content hash.
pub struct Site {
    root: Area,
    hash: String,
    renderer: Box<dyn Renderer>,
}

impl Site {
    /// Parse `source` with the default markdown renderer.
    ///
    /// `style` is the site-wide highlighting style.
    pub fn parse(source: &Path, style: &str) -> Result<Self> {
        Self::parse_with(source, style, Box::new(MarkdownRenderer::new()))
    }

    /// Parse `source` with a caller-supplied renderer.
    pub fn parse_with(source: &Path, style: &str, renderer: Box<dyn Renderer>) -> Result<Self> {
        let source = source
            .canonicalize()
            .with_context(|| format!("cannot resolve `{}`", source.display()))?;

        let repo = GitRepo::discover(&source)?;
        let hash = match repo.as_ref().and_then(GitRepo::head_hash) {
            Some(hash) => hash,
            None => digest_dir(&source)?,
        };

        let root = {
            let state = ParseState::new(repo.map(Rc::new), style, renderer.as_ref());
            Area::parse(&source, &source, &state)?
        };
        log!("parse"; "{} pages in `{}`", root.page_count(), source.display());

        Ok(Self {
            root,
            hash,
            renderer,
        })
    }

    /// Title of the root index, empty without one.
    pub fn title(&self) -> &str {
        self.root.title()
    }

    /// Content hash computed at parse time.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn root(&self) -> &Area {
        &self.root
    }

    /// Navigation view of the whole tree under clean links.
    pub fn outline(&self) -> Outline {
        self.root.outline(LinkShape::Clean)
    }

    /// Inject a custom page into the root area.
    pub fn inject(&mut self, url: &str, page: CustomPage) -> Result<(), InjectError> {
        self.root.inject(url, page)?;
        log!("inject"; "{url}");
        Ok(())
    }

    /// Write the compiled site under `target`.
    pub fn generate(&self, target: &Path, theme_dir: &Path, purpose: Purpose) -> Result<()> {
        let theme = load_theme(theme_dir)?;
        create_target(target)?;

        let ctx = GenContext::new(&theme, self.renderer.as_ref(), target, purpose);
        self.root.walk(Path::new(""), ctx, &mut Writer)?;
        log!("gen"; "{} pages into `{}`", self.root.page_count(), target.display());
        Ok(())
    }

    /// Compile into a private temporary directory and return a handler
    /// serving it under clean links.
    pub fn handler(&self, theme_dir: &Path) -> Result<SiteHandler> {
        let theme = load_theme(theme_dir)?;
        let dir = TempDir::new().context("cannot create temporary directory")?;

        let ctx = GenContext::new(&theme, self.renderer.as_ref(), dir.path(), Purpose::DynamicServe);
        let mut visitor = (Writer, RouteTable::default());
        self.root.walk(Path::new(""), ctx, &mut visitor)?;

        Ok(SiteHandler::new(visitor.1.into_routes(), dir))
    }

    /// Compile for publishing under `target` and describe every link.
    ///
    /// `head` and `foot` are injected into every web page, never into email
    /// bodies.
    pub fn bindings(
        &self,
        target: &Path,
        theme_dir: &Path,
        head: &str,
        foot: &str,
    ) -> Result<BTreeMap<String, Resource>> {
        let theme = load_theme(theme_dir)?;
        create_target(target)?;

        let ctx = GenContext::new(&theme, self.renderer.as_ref(), target, Purpose::Bind)
            .with_head_foot(head, foot);
        let mut visitor = (Writer, Bindings::default());
        self.root.walk(Path::new(""), ctx, &mut visitor)?;

        let map = visitor.1.into_map();
        log!("bind"; "{} links into `{}`", map.len(), target.display());
        Ok(map)
    }
}

fn load_theme(dir: &Path) -> Result<Theme> {
    Theme::load(dir).with_context(|| format!("cannot load theme `{}`", dir.display()))
}

fn create_target(target: &Path) -> Result<()> {
    fs::create_dir_all(target).with_context(|| format!("cannot create `{}`", target.display()))
}
