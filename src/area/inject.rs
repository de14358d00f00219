//! Custom page injection.

use super::Area;
use crate::page::{CustomPage, INDEX_PAGE, MARKDOWN_EXT, Page};
use thiserror::Error;

/// Why a custom page could not be injected. The tree is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InjectError {
    #[error("custom page url `{0}` must start with `/`")]
    NotAbsolute(String),

    #[error("custom page url `{0}` must be a single path segment")]
    MultiSegment(String),

    #[error("custom page url `{0}` has no name")]
    Empty(String),

    #[error("custom page url `{0}` collides with `{1}`")]
    Collision(String, String),
}

impl Area {
    /// Insert `page` so that it is served under `url` (`/name`).
    ///
    /// The page is stored as `name.md` and generated as `name.html`.
    pub fn inject(&mut self, url: &str, page: CustomPage) -> Result<(), InjectError> {
        let name = url
            .strip_prefix('/')
            .ok_or_else(|| InjectError::NotAbsolute(url.to_owned()))?;
        if name.contains('/') {
            return Err(InjectError::MultiSegment(url.to_owned()));
        }
        if name.is_empty() {
            return Err(InjectError::Empty(url.to_owned()));
        }

        let key = format!("{name}.{MARKDOWN_EXT}");
        if key == INDEX_PAGE || self.pages.contains_key(&key) {
            return Err(InjectError::Collision(url.to_owned(), key));
        }
        let file = format!("{name}.html");
        if let Some(asset) = [name, file.as_str()]
            .into_iter()
            .find(|asset| self.assets.contains_key(*asset))
        {
            return Err(InjectError::Collision(url.to_owned(), asset.to_owned()));
        }

        self.pages.insert(key, Page::Custom(page));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ParsedPage, post::Post};
    use std::path::{Path, PathBuf};

    fn area() -> Area {
        let mut area = Area::default();
        let page = ParsedPage {
            source: PathBuf::from("post.md"),
            title: "Post".into(),
            html: String::new(),
            raw: String::new(),
            url: None,
            timing: None,
            authoring: Default::default(),
        };
        area.pages.insert("post.md".into(), Page::Parsed(page));
        area.assets.insert("logo.png".into(), PathBuf::from("logo.png"));
        area.assets.insert("about.html".into(), PathBuf::from("about.html"));
        area
    }

    #[test]
    fn test_inject_ok() {
        let mut area = area();
        area.inject("/subscribe", CustomPage::subscriber("/go")).unwrap();

        let page = &area.pages()["subscribe.md"];
        assert!(!page.is_post());
    }

    #[test]
    fn test_inject_rejects_malformed_urls() {
        let mut area = area();
        let page = || CustomPage::subscriber("/go");

        assert_eq!(
            area.inject("subscribe", page()),
            Err(InjectError::NotAbsolute("subscribe".into()))
        );
        assert_eq!(
            area.inject("/a/b", page()),
            Err(InjectError::MultiSegment("/a/b".into()))
        );
        assert_eq!(area.inject("/", page()), Err(InjectError::Empty("/".into())));
    }

    #[test]
    fn test_inject_collision_leaves_tree_untouched() {
        let mut area = area();
        let before: Vec<_> = area.pages().keys().cloned().collect();

        assert!(matches!(
            area.inject("/post", CustomPage::subscriber("/go")),
            Err(InjectError::Collision(..))
        ));
        assert!(matches!(
            area.inject("/about", CustomPage::subscriber("/go")),
            Err(InjectError::Collision(..))
        ));
        assert!(matches!(
            area.inject("/logo.png", CustomPage::subscriber("/go")),
            Err(InjectError::Collision(..))
        ));
        assert!(matches!(
            area.inject("/index", CustomPage::subscriber("/go")),
            Err(InjectError::Collision(..))
        ));

        let after: Vec<_> = area.pages().keys().cloned().collect();
        assert_eq!(before, after);
        assert!(area.pages()["post.md"].is_post());
    }

    #[test]
    fn test_injected_page_is_not_listed() {
        let mut area = area();
        area.inject("/subscribe", CustomPage::subscriber("/go")).unwrap();

        let index = area.pages()["post.md"].as_parsed().unwrap().clone();
        let posts: Vec<Post> = area.posts(Path::new(""), crate::LinkShape::Clean, &index);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Post");
    }
}
