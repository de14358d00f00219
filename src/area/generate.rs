//! File generation visitor.
//!
//! ```text
//! source                     target
//! index.md          ──▶      index.html          (index template + posts)
//! post.md           ──▶      post.html
//!                            post_email.html     (Bind only)
//!                            post_email.txt      (Bind only)
//! cover.png         ──▶      cover.png           (copied verbatim)
//! ```

use super::{Area, GenContext, Visitor};
use crate::page::{INDEX_PAGE, Page};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Output file of page `name` in area `rel`, relative to the target root.
pub(crate) fn page_file(rel: &Path, name: &str) -> PathBuf {
    rel.join(format!("{}.html", stem(name)))
}

/// Email artifacts (html, text) of page `name` in area `rel`.
pub(crate) fn email_files(rel: &Path, name: &str) -> (PathBuf, PathBuf) {
    let stem = stem(name);
    (
        rel.join(format!("{stem}_email.html")),
        rel.join(format!("{stem}_email.txt")),
    )
}

fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Whether page `name` gets email artifacts in this context.
pub(crate) fn wants_email(ctx: &GenContext, name: &str, page: &Page) -> bool {
    ctx.outputs.email && name != INDEX_PAGE && page.is_post()
}

/// Writes every page, email artifact and asset under `ctx.root`.
pub(crate) struct Writer;

impl<'a> Visitor<'a> for Writer {
    fn area(&mut self, _area: &'a Area, rel: &Path, ctx: &GenContext<'a>) -> Result<()> {
        let dir = ctx.root.join(rel);
        fs::create_dir_all(&dir).with_context(|| format!("cannot create `{}`", dir.display()))
    }

    fn page(
        &mut self,
        area: &'a Area,
        rel: &Path,
        name: &str,
        page: &'a Page,
        ctx: &GenContext<'a>,
    ) -> Result<()> {
        let html = match page.as_parsed() {
            Some(index) if name == INDEX_PAGE => {
                let posts = area.posts(rel, ctx.links, index);
                index.generate_index(ctx, &posts)?
            }
            _ => page.render(ctx)?,
        };
        write(&ctx.root.join(page_file(rel, name)), &html)?;

        if wants_email(ctx, name, page)
            && let Page::Parsed(post) = page
        {
            let (html_file, text_file) = email_files(rel, name);
            write(&ctx.root.join(html_file), &post.generate_email_html(ctx)?)?;
            write(&ctx.root.join(text_file), &post.generate_email_text(ctx)?)?;
        }
        Ok(())
    }

    fn asset(&mut self, rel: &Path, name: &str, source: &Path, ctx: &GenContext<'a>) -> Result<()> {
        let target = ctx.root.join(rel).join(name);
        fs::copy(source, &target)
            .with_context(|| format!("cannot copy to `{}`", target.display()))?;
        Ok(())
    }
}

fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("cannot write `{}`", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_file() {
        assert_eq!(page_file(Path::new(""), "post.md"), PathBuf::from("post.html"));
        assert_eq!(page_file(Path::new("sub"), "index.md"), PathBuf::from("sub/index.html"));
    }

    #[test]
    fn test_email_files() {
        let (html, text) = email_files(Path::new("sub"), "post.md");
        assert_eq!(html, PathBuf::from("sub/post_email.html"));
        assert_eq!(text, PathBuf::from("sub/post_email.txt"));
    }

    #[test]
    fn test_stem_of_dotted_name() {
        assert_eq!(stem("v1.2.md"), "v1.2");
        assert_eq!(stem("plain"), "plain");
    }
}
