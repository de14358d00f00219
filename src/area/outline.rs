//! Navigation view of the tree: area prefixes, nested areas and page links.

use super::{Area, LinkShape};
use crate::page::INDEX_PAGE;
use serde::Serialize;
use std::path::Path;

/// One area as seen by navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub prefix: String,
    pub subareas: Vec<Outline>,
    /// Resolved page links in file name order. An index is listed under its
    /// area's link.
    pub pages: Vec<String>,
}

impl Area {
    /// Navigation view of the subtree under `links`.
    pub fn outline(&self, links: LinkShape) -> Outline {
        self.outline_at(Path::new(""), links)
    }

    fn outline_at(&self, parent_rel: &Path, links: LinkShape) -> Outline {
        let rel = parent_rel.join(&self.prefix);
        let pages = self
            .pages
            .iter()
            .map(|(name, page)| {
                if name == INDEX_PAGE {
                    links.dir_link(&rel)
                } else {
                    page.link(&rel.join(name), links)
                }
            })
            .collect();

        Outline {
            prefix: self.prefix.clone(),
            subareas: self
                .subareas
                .iter()
                .map(|sub| sub.outline_at(&rel, links))
                .collect(),
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        area::ParseState, page::CustomPage, render::MarkdownRenderer, test_support::write,
    };
    use tempfile::TempDir;

    #[test]
    fn test_outline() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "index.md", "# Home\n");
        write(root, "post.md", "---\nurl: /hello\n---\n# Hello\n");
        write(root, "sub/index.md", "# Sub\n");
        write(root, "sub/deep/page.md", "# Page\n");

        let renderer = MarkdownRenderer::new();
        let state = ParseState::new(None, "base16-ocean.dark", &renderer);
        let mut area = Area::parse(root, root, &state).unwrap();
        area.inject("/subscribe", CustomPage::subscriber("/go")).unwrap();

        let outline = area.outline(LinkShape::Clean);
        assert_eq!(outline.prefix, "");
        assert_eq!(outline.pages, ["/", "/hello", "/subscribe"]);

        let sub = &outline.subareas[0];
        assert_eq!(sub.prefix, "sub");
        assert_eq!(sub.pages, ["/sub"]);
        assert_eq!(sub.subareas[0].pages, ["/sub/deep/page"]);

        let static_links = area.outline(LinkShape::Extension);
        assert_eq!(static_links.pages, ["/", "/post.html", "/subscribe.html"]);
    }
}
