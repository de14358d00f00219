//! The area tree: one [`Area`] per source directory.
//!
//! ```text
//! content/                 Area { prefix: "" }
//! ├── .strataignore        rules for content/ and below
//! ├── index.md             pages["index.md"]   (active index for the subtree)
//! ├── post.md              pages["post.md"]
//! ├── cover.png            assets["cover.png"]
//! ├── notes.txt            dropped
//! └── sub/                 Area { prefix: "sub" }
//!     └── page.md          pages["page.md"]
//! ```
//!
//! The tree is built top-down so ignore rules and repository discovery flow
//! from parents to children. After parsing it is only read, except for
//! custom page injection before compilation. Symlinked directories are
//! skipped.

mod bindings;
mod context;
mod generate;
mod inject;
mod outline;
mod routes;
mod walk;

pub use bindings::{PostResource, Resource};
pub use context::{GenContext, LinkShape, OutputSet, Purpose, route_key, url_path};
pub use inject::InjectError;
pub use outline::Outline;
pub(crate) use bindings::Bindings;
pub(crate) use generate::Writer;
pub(crate) use routes::RouteTable;
pub(crate) use walk::Visitor;

use crate::{
    log,
    page::{INDEX_PAGE, MARKDOWN_EXT, Page, ParsedPage, post::{Post, sort_posts}},
    render::Renderer,
    utils::{
        git::{GIT_DIR, GitRepo},
        ignore::{IGNORE_FILE, IgnoreState},
    },
};
use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

/// Image extensions kept as opaque assets.
pub const ASSET_EXTS: &[&str] = &["png", "jpg", "jpeg", "svg", "gif"];

/// A compiled directory.
#[derive(Debug, Clone, Default)]
pub struct Area {
    /// Directory name relative to the parent, empty for the root.
    prefix: String,
    /// Pages by file name (`post.md`).
    pages: BTreeMap<String, Page>,
    /// Assets by file name, pointing at their source.
    assets: BTreeMap<String, PathBuf>,
    subareas: Vec<Area>,
}

/// State carried down the directory walk.
pub(crate) struct ParseState<'a> {
    ignore: IgnoreState,
    repo: Option<Rc<GitRepo>>,
    style: &'a str,
    renderer: &'a dyn Renderer,
}

impl<'a> ParseState<'a> {
    pub(crate) fn new(repo: Option<Rc<GitRepo>>, style: &'a str, renderer: &'a dyn Renderer) -> Self {
        Self {
            ignore: IgnoreState::new(),
            repo,
            style,
            renderer,
        }
    }

    /// State for the contents of `dir`.
    fn descend(&self, dir: &Path) -> Result<Self> {
        let ignore = self.ignore.descend(dir, IGNORE_FILE)?;
        let repo = match &self.repo {
            Some(repo) => Some(Rc::clone(repo)),
            None if dir.join(GIT_DIR).exists() => Some(Rc::new(GitRepo::open(dir)?)),
            None => None,
        };
        Ok(Self {
            ignore,
            repo,
            style: self.style,
            renderer: self.renderer,
        })
    }
}

impl Area {
    /// Build the area for `dir`; `parent` is the parent directory, or `dir`
    /// itself for the root.
    pub(crate) fn parse(dir: &Path, parent: &Path, state: &ParseState) -> Result<Self> {
        let state = state.descend(dir)?;
        let prefix = if dir == parent {
            String::new()
        } else {
            dir.strip_prefix(parent)
                .unwrap_or(dir)
                .to_string_lossy()
                .into_owned()
        };

        let mut entries = fs::read_dir(dir)
            .with_context(|| format!("cannot read directory `{}`", dir.display()))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("cannot read directory `{}`", dir.display()))?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut area = Self {
            prefix,
            ..Self::default()
        };

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if state.ignore.should_ignore(&name) {
                continue;
            }

            if path.is_dir() {
                if name == GIT_DIR {
                    continue;
                }
                let file_type = entry
                    .file_type()
                    .with_context(|| format!("cannot stat `{}`", path.display()))?;
                if file_type.is_symlink() {
                    log!("warn"; "skipping symlinked directory `{}`", path.display());
                    continue;
                }
                let sub = Self::parse(&path, dir, &state)
                    .with_context(|| format!("in area `{}`", path.display()))?;
                area.subareas.push(sub);
                continue;
            }

            match path.extension().and_then(|e| e.to_str()) {
                Some(MARKDOWN_EXT) => {
                    let page = ParsedPage::parse(
                        &path,
                        state.style,
                        state.renderer,
                        state.repo.as_deref(),
                    )?;
                    area.pages.insert(name, Page::Parsed(page));
                }
                Some(ext) if ASSET_EXTS.contains(&ext) => {
                    area.assets.insert(name, path);
                }
                _ => {}
            }
        }

        Ok(area)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn pages(&self) -> &BTreeMap<String, Page> {
        &self.pages
    }

    pub fn assets(&self) -> &BTreeMap<String, PathBuf> {
        &self.assets
    }

    pub fn subareas(&self) -> &[Area] {
        &self.subareas
    }

    /// This area's own `index.md`, if any.
    pub fn index(&self) -> Option<&ParsedPage> {
        self.pages.get(INDEX_PAGE).and_then(Page::as_parsed)
    }

    /// Title of this area's index, empty without one.
    pub fn title(&self) -> &str {
        self.index().map_or("", |index| index.title.as_str())
    }

    /// Number of pages in the subtree.
    pub fn page_count(&self) -> usize {
        self.pages.len() + self.subareas.iter().map(Area::page_count).sum::<usize>()
    }

    /// Sorted posts of the subtree rooted here, as listed by `index`.
    ///
    /// `rel` is this area's path relative to the root. Index documents and
    /// custom pages are never posts.
    pub fn posts(&self, rel: &Path, links: LinkShape, index: &ParsedPage) -> Vec<Post> {
        let mut posts = Vec::new();
        self.collect_posts(rel, links, index, &mut posts);
        sort_posts(&mut posts);
        posts
    }

    fn collect_posts(&self, rel: &Path, links: LinkShape, index: &ParsedPage, out: &mut Vec<Post>) {
        for (name, page) in &self.pages {
            if name == INDEX_PAGE {
                continue;
            }
            if let Page::Parsed(page) = page {
                let link = page.link(&rel.join(name), links);
                out.push(page.to_post(&self.prefix, link, index));
            }
        }
        for sub in &self.subareas {
            sub.collect_posts(&rel.join(&sub.prefix), links, index, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render::MarkdownRenderer, test_support::write};
    use tempfile::TempDir;

    fn parse_tree(root: &Path) -> Result<Area> {
        let renderer = MarkdownRenderer::new();
        let state = ParseState::new(None, "base16-ocean.dark", &renderer);
        Area::parse(root, root, &state)
    }

    #[test]
    fn test_parse_partitions_entries() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "index.md", "# Home\n");
        write(root, "post.md", "# Post\n");
        write(root, "cover.png", "png");
        write(root, "notes.txt", "dropped");
        write(root, "sub/page.md", "# Sub\n");
        write(root, "sub/diagram.svg", "<svg/>");

        let area = parse_tree(root).unwrap();

        assert_eq!(area.prefix(), "");
        assert_eq!(area.pages().keys().collect::<Vec<_>>(), ["index.md", "post.md"]);
        assert_eq!(area.assets().keys().collect::<Vec<_>>(), ["cover.png"]);
        assert_eq!(area.subareas().len(), 1);

        let sub = &area.subareas()[0];
        assert_eq!(sub.prefix(), "sub");
        assert!(sub.pages().contains_key("page.md"));
        assert!(sub.assets().contains_key("diagram.svg"));
        assert_eq!(area.title(), "Home");
        assert_eq!(area.page_count(), 3);
    }

    #[test]
    fn test_parse_skips_git_and_ignored() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, ".strataignore", "drafts\nsecret.md\n");
        write(root, "secret.md", "# no\n");
        write(root, "drafts/wip.md", "# no\n");
        write(root, "sub/.strataignore", "!secret.md\n");
        write(root, "sub/secret.md", "# yes\n");
        write(root, "sub/drafts/ok.md", "# inherited ignore\n");

        let area = parse_tree(root).unwrap();

        assert!(area.pages().is_empty());
        assert_eq!(area.subareas().len(), 1);
        let sub = &area.subareas()[0];
        assert!(sub.pages().contains_key("secret.md"));
        // `drafts` is still ignored below sub/
        assert!(sub.subareas().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_skips_symlinked_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "sub/page.md", "# Sub\n");
        std::os::unix::fs::symlink(root, root.join("sub/loop")).unwrap();
        std::os::unix::fs::symlink(root.join("sub/page.md"), root.join("linked.md")).unwrap();

        let area = parse_tree(root).unwrap();

        assert!(area.pages().contains_key("linked.md"));
        assert_eq!(area.subareas().len(), 1);
        assert!(area.subareas()[0].subareas().is_empty());
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sub/bad.md", "---\npublished: 2024-01-01\n");

        let err = parse_tree(dir.path()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("bad.md"));
        assert!(message.contains("unclosed metadata section"));
    }

    #[test]
    fn test_posts_exclude_index_and_tag_category() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "index.md", "# Home\n");
        write(root, "a.md", "---\npublished: 2024-01-01\n---\n# A\n");
        write(root, "sub/index.md", "# Sub index\n");
        write(root, "sub/b.md", "---\npublished: 2024-02-01\n---\n# B\n");
        write(root, "sub/deep/c.md", "# C\n");

        let area = parse_tree(root).unwrap();
        let index = area.index().unwrap();
        let posts = area.posts(Path::new(""), LinkShape::Clean, index);

        let summary: Vec<_> = posts
            .iter()
            .map(|p| (p.title.as_str(), p.category.as_str(), p.link.as_str()))
            .collect();
        assert_eq!(
            summary,
            [("B", "sub", "/sub/b"), ("A", "", "/a"), ("C", "deep", "/sub/deep/c")]
        );
    }
}
