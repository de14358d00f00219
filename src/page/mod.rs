//! Compiled pages and their render modes.
//!
//! | Mode                       | Template        | Extra data                        |
//! |----------------------------|-----------------|-----------------------------------|
//! | `generate`                 | `_default.html` | index title, index author table   |
//! | `generate_without_index`   | `_default.html` | none                              |
//! | `generate_index`           | `index.html`    | sorted post list of the subtree   |
//! | `generate_email_html/text` | `_default.html` | none; no head/foot; plain text    |

pub mod authoring;
mod custom;
pub mod metadata;
pub mod post;

pub use custom::{CustomPage, MESSAGE_TEMPLATE, SUBSCRIBE_TEMPLATE};

use crate::{
    area::{GenContext, LinkShape},
    log,
    render::Renderer,
    utils::{date::format_date, git::GitRepo},
};
use anyhow::{Context, Result};
use authoring::{Author, Authoring};
use metadata::{Timing, parse_block, separate};
use post::Post;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Markdown source extension.
pub const MARKDOWN_EXT: &str = "md";
/// Reserved name of an area's index document.
pub const INDEX_PAGE: &str = "index.md";

/// A page of an area: parsed from markdown or injected.
#[derive(Debug, Clone)]
pub enum Page {
    Parsed(ParsedPage),
    Custom(CustomPage),
}

impl Page {
    /// Whether the page came from a real source file. Fixed at creation.
    pub fn is_post(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    pub fn as_parsed(&self) -> Option<&ParsedPage> {
        match self {
            Self::Parsed(page) => Some(page),
            Self::Custom(_) => None,
        }
    }

    /// Link of the page whose source path (relative to the root) is `rel`.
    pub fn link(&self, rel: &Path, links: LinkShape) -> String {
        match self {
            Self::Parsed(page) => page.link(rel, links),
            Self::Custom(_) => links.page_link(rel),
        }
    }

    /// Render a non-index page for the active context.
    pub fn render(&self, ctx: &GenContext) -> Result<String> {
        match (self, ctx.index) {
            (Self::Parsed(page), Some(index)) => page.generate(ctx, index),
            (Self::Parsed(page), None) => page.generate_without_index(ctx),
            (Self::Custom(page), _) => page.generate(ctx),
        }
    }
}

/// A page compiled from a markdown file.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Source file.
    pub source: PathBuf,
    pub title: String,
    /// Rendered HTML body.
    pub html: String,
    /// Markdown body without the metadata block.
    pub raw: String,
    /// Custom link from front matter.
    pub url: Option<String>,
    pub timing: Option<Timing>,
    pub authoring: Authoring,
}

#[derive(Serialize)]
struct PageData<'a> {
    title: &'a str,
    content: &'a str,
    site_title: &'a str,
    date: String,
    updated: String,
    authors: Vec<Author>,
    head: &'a str,
    foot: &'a str,
}

#[derive(Serialize)]
struct IndexData<'a> {
    title: &'a str,
    content: &'a str,
    posts: &'a [Post],
    head: &'a str,
    foot: &'a str,
}

impl ParsedPage {
    /// Read and compile `path`.
    ///
    /// `style` is the site-wide highlighting style, overridden by the page's
    /// own `style:`. With a repository, history fills timing and authorship
    /// left unset by front matter.
    pub fn parse(
        path: &Path,
        style: &str,
        renderer: &dyn Renderer,
        repo: Option<&GitRepo>,
    ) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("cannot read `{}`", path.display()))?;
        Self::from_source(path, &content, style, renderer, repo)
    }

    /// Compile already loaded `content` of `path`.
    pub fn from_source(
        path: &Path,
        content: &str,
        style: &str,
        renderer: &dyn Renderer,
        repo: Option<&GitRepo>,
    ) -> Result<Self> {
        let (block, body) = separate(content)
            .with_context(|| format!("cannot parse metadata of `{}`", path.display()))?;
        let meta = parse_block(block)
            .with_context(|| format!("cannot parse metadata of `{}`", path.display()))?;

        let style = meta.style.as_deref().unwrap_or(style);
        let rendered = renderer
            .render(body, style)
            .with_context(|| format!("cannot render `{}`", path.display()))?;

        let mut page = Self {
            source: path.to_path_buf(),
            title: rendered.title,
            html: rendered.html,
            raw: body.to_owned(),
            url: meta.url,
            timing: meta.timing,
            authoring: Authoring {
                declared: meta.authors,
                definitions: meta.definitions,
                vcs_author: None,
            },
        };

        if let Some(repo) = repo
            && (page.timing.is_none() || page.authoring.declared.is_empty())
        {
            page.apply_history(repo)?;
        }
        Ok(page)
    }

    /// Fill unset timing and authorship from version control.
    fn apply_history(&mut self, repo: &GitRepo) -> Result<()> {
        let history = repo
            .history(&self.source)
            .with_context(|| format!("cannot read history of `{}`", self.source.display()))?;
        let (Some(first), Some(last)) = (history.first(), history.last()) else {
            return Ok(());
        };

        if self.timing.is_none() {
            self.timing = Some(Timing {
                published: first.time,
                updated: last.time,
            });
        }
        self.authoring.vcs_author = Some(first.author.clone());
        Ok(())
    }

    /// Link for the page at `rel` (relative to the root).
    ///
    /// A custom url is only honored by clean links; static output keeps the
    /// path-derived link and warns.
    pub fn link(&self, rel: &Path, links: LinkShape) -> String {
        if let Some(url) = &self.url {
            match links {
                LinkShape::Clean => return url.clone(),
                LinkShape::Extension => {
                    log!("warn"; "custom url `{url}` of `{}` is not used for static output", rel.display());
                }
            }
        }
        links.page_link(rel)
    }

    fn dates(&self) -> (String, String) {
        match &self.timing {
            Some(timing) => (format_date(&timing.published), format_date(&timing.updated)),
            None => (String::new(), String::new()),
        }
    }

    fn page_data<'a>(
        &'a self,
        ctx: &GenContext<'a>,
        site_title: &'a str,
        authors: Vec<Author>,
    ) -> PageData<'a> {
        let (date, updated) = self.dates();
        PageData {
            title: &self.title,
            content: &self.html,
            site_title,
            date,
            updated,
            authors,
            head: ctx.head,
            foot: ctx.foot,
        }
    }

    /// Standalone page under `index`.
    pub fn generate(&self, ctx: &GenContext, index: &ParsedPage) -> Result<String> {
        let authors = self.authoring.byline_within(&index.authoring);
        ctx.theme
            .render_default(&self.page_data(ctx, &index.title, authors))
    }

    /// Standalone page with no index anywhere above it.
    pub fn generate_without_index(&self, ctx: &GenContext) -> Result<String> {
        ctx.theme
            .render_default(&self.page_data(ctx, "", self.authoring.byline()))
    }

    /// Index page listing `posts`, which the caller collected from the subtree.
    pub fn generate_index(&self, ctx: &GenContext, posts: &[Post]) -> Result<String> {
        ctx.theme.render_index(&IndexData {
            title: &self.title,
            content: &self.html,
            posts,
            head: ctx.head,
            foot: ctx.foot,
        })
    }

    /// HTML body for email: the default layout without head, foot, site
    /// title or index author fallback.
    pub fn generate_email_html(&self, ctx: &GenContext) -> Result<String> {
        self.generate_without_index(&ctx.without_head_foot())
    }

    /// Plain text body for email.
    pub fn generate_email_text(&self, ctx: &GenContext) -> Result<String> {
        ctx.renderer.to_plaintext(&self.raw)
    }

    /// Post view of this page for an index listing owned by `index`.
    pub fn to_post(&self, category: &str, link: String, index: &ParsedPage) -> Post {
        Post::new(
            &self.title,
            category,
            link,
            self.timing,
            self.authoring.byline_within(&index.authoring),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        area::Purpose,
        render::MarkdownRenderer,
        test_support::write_theme,
        theme::Theme,
    };
    use tempfile::TempDir;

    fn parse(content: &str) -> ParsedPage {
        let renderer = MarkdownRenderer::new();
        ParsedPage::from_source(Path::new("post.md"), content, "base16-ocean.dark", &renderer, None)
            .unwrap()
    }

    #[test]
    fn test_parse_title_and_timing() {
        let page = parse("---\npublished: 2024-01-01\n---\n# Hello\n\nbody\n");
        assert_eq!(page.title, "Hello");
        assert_eq!(page.raw, "# Hello\n\nbody\n");
        let timing = page.timing.unwrap();
        assert_eq!(timing.published, timing.updated);
    }

    #[test]
    fn test_parse_error_names_file() {
        let renderer = MarkdownRenderer::new();
        let err = ParsedPage::from_source(
            Path::new("drafts/broken.md"),
            "---\nauthor: ada\n# never closed",
            "base16-ocean.dark",
            &renderer,
            None,
        )
        .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("drafts/broken.md"));
        assert!(message.contains("unclosed metadata section"));
    }

    #[test]
    fn test_link_custom_url_by_shape() {
        let page = parse("---\nurl: /foo\n---\n# Foo\n");
        let rel = Path::new("sub/foo-page.md");

        assert_eq!(page.link(rel, LinkShape::Clean), "/foo");
        assert_eq!(page.link(rel, LinkShape::Extension), "/sub/foo-page.html");
    }

    #[test]
    fn test_link_without_custom_url() {
        let page = parse("# Plain\n");
        let rel = Path::new("sub/page.md");

        assert_eq!(page.link(rel, LinkShape::Clean), "/sub/page");
        assert_eq!(page.link(rel, LinkShape::Extension), "/sub/page.html");
    }

    #[test]
    fn test_generate_with_and_without_index() {
        let dir = TempDir::new().unwrap();
        write_theme(dir.path());
        let theme = Theme::load(dir.path()).unwrap();
        let renderer = MarkdownRenderer::new();
        let root = dir.path();

        let index = parse("---\nauthors:\n  ada: {name: Ada Lovelace}\n---\n# Home\n");
        let page = parse("---\nauthor: ada\npublished: 2024-01-01\n---\n# Post\n");

        let ctx = GenContext::new(&theme, &renderer, root, Purpose::StaticServe);
        let alone = page.generate_without_index(&ctx).unwrap();
        assert!(alone.contains("<span class=\"author\">ada</span>"));
        assert!(alone.contains("<time>Jan 01, 2024</time>"));

        let ctx = ctx.with_index(&index);
        let within = page.generate(&ctx, &index).unwrap();
        assert!(within.contains("<p class=\"site\">Home</p>"));
        assert!(within.contains("<span class=\"author\">Ada Lovelace</span>"));
    }

    #[test]
    fn test_email_html_has_no_head_or_foot() {
        let dir = TempDir::new().unwrap();
        write_theme(dir.path());
        let theme = Theme::load(dir.path()).unwrap();
        let renderer = MarkdownRenderer::new();

        let page = parse("# Post\n\nSome text.\n");
        let ctx = GenContext::new(&theme, &renderer, dir.path(), Purpose::Bind)
            .with_head_foot("<meta name=\"head\">", "<footer>foot</footer>");

        assert!(page.generate_without_index(&ctx).unwrap().contains("<footer>foot</footer>"));
        let email = page.generate_email_html(&ctx).unwrap();
        assert!(!email.contains("<footer>"));
        assert!(!email.contains("name=\"head\""));

        let text = page.generate_email_text(&ctx).unwrap();
        assert_eq!(text, "Post\n\nSome text.\n");
    }

    #[test]
    fn test_email_html_ignores_index() {
        let dir = TempDir::new().unwrap();
        write_theme(dir.path());
        let theme = Theme::load(dir.path()).unwrap();
        let renderer = MarkdownRenderer::new();

        let index = parse("---\nauthor: grace\n---\n# Home\n");
        let page = parse("# Post\n");
        let ctx = GenContext::new(&theme, &renderer, dir.path(), Purpose::Bind).with_index(&index);

        let web = page.generate(&ctx, &index).unwrap();
        assert!(web.contains("<p class=\"site\">Home</p>"));
        assert!(web.contains("<span class=\"author\">grace</span>"));

        let email = page.generate_email_html(&ctx).unwrap();
        assert!(email.contains("<p class=\"site\"></p>"));
        assert!(!email.contains("grace"));
    }

    #[test]
    fn test_custom_page_is_not_post() {
        let page = Page::Custom(CustomPage::subscriber("/go"));
        assert!(!page.is_post());
        assert!(page.as_parsed().is_none());
        assert_eq!(page.link(Path::new("subscribe.md"), LinkShape::Clean), "/subscribe");
    }
}
