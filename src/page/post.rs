//! Post view of a page for index listings.

use super::{authoring::Author, metadata::Timing};
use crate::utils::date::format_date;
use serde::Serialize;
use std::cmp::Ordering;

/// A page as listed on an index. Derived on every index render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub title: String,
    /// Prefix of the area owning the page (`""` for the root).
    pub category: String,
    pub link: String,
    /// Formatted publish date, empty when unknown.
    pub date: String,
    pub authors: Vec<Author>,
    #[serde(skip)]
    pub timing: Option<Timing>,
}

impl Post {
    pub fn new(
        title: &str,
        category: &str,
        link: String,
        timing: Option<Timing>,
        authors: Vec<Author>,
    ) -> Self {
        Self {
            title: title.to_owned(),
            category: category.to_owned(),
            link,
            date: timing.map(|t| format_date(&t.published)).unwrap_or_default(),
            authors,
            timing,
        }
    }
}

/// Newest first. Posts without timing follow every timed post and keep
/// their collection order among themselves.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (&a.timing, &b.timing) {
        (Some(a), Some(b)) => b.published.cmp(&a.published),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::parse_date;

    fn post(title: &str, published: Option<&str>) -> Post {
        let timing = published.map(|p| {
            let at = parse_date(p).unwrap();
            Timing {
                published: at,
                updated: at,
            }
        });
        Post::new(title, "", format!("/{title}"), timing, Vec::new())
    }

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_sort_newest_first() {
        let mut posts = vec![
            post("old", Some("2023-01-01")),
            post("new", Some("2024-06-01")),
            post("mid", Some("2023-12-31")),
        ];
        sort_posts(&mut posts);
        assert_eq!(titles(&posts), ["new", "mid", "old"]);
    }

    #[test]
    fn test_sort_untimed_last_in_stable_order() {
        let mut posts = vec![
            post("a", None),
            post("dated", Some("2020-01-01")),
            post("b", None),
            post("newer", Some("2021-01-01")),
        ];
        sort_posts(&mut posts);
        assert_eq!(titles(&posts), ["newer", "dated", "a", "b"]);
    }

    #[test]
    fn test_date_formatting() {
        assert_eq!(post("p", Some("2024-01-01")).date, "Jan 01, 2024");
        assert_eq!(post("p", None).date, "");
    }
}
