//! Binding map visitor for external publishing pipelines.
//!
//! Every link path maps to a [`Resource`]: the generated page file and, for
//! posts, the metadata and email artifacts a sender needs.

use super::{
    Area, GenContext, Visitor,
    generate::{email_files, page_file, wants_email},
    routes::claim,
    url_path,
};
use crate::{
    page::{INDEX_PAGE, Page, authoring::Author},
    utils::date::Timestamp,
};
use anyhow::Result;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// A generated file reachable under one link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Generated file on disk.
    pub path: PathBuf,
    /// Present for posts only.
    pub post: Option<PostResource>,
}

/// Post metadata and email artifacts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostResource {
    pub title: String,
    pub published: Option<Timestamp>,
    pub updated: Option<Timestamp>,
    pub authors: Vec<Author>,
    /// `<stem>_email.html`
    pub html: PathBuf,
    /// `<stem>_email.txt`
    pub plaintext: PathBuf,
}

impl Resource {
    fn file(path: PathBuf) -> Self {
        Self { path, post: None }
    }

    pub fn is_post(&self) -> bool {
        self.post.is_some()
    }
}

/// Collects link path -> resource.
#[derive(Debug, Default)]
pub(crate) struct Bindings {
    map: BTreeMap<String, Resource>,
}

impl Bindings {
    pub(crate) fn into_map(self) -> BTreeMap<String, Resource> {
        self.map
    }
}

impl<'a> Visitor<'a> for Bindings {
    fn page(
        &mut self,
        _area: &'a Area,
        rel: &Path,
        name: &str,
        page: &'a Page,
        ctx: &GenContext<'a>,
    ) -> Result<()> {
        let path = ctx.root.join(page_file(rel, name));
        if name == INDEX_PAGE {
            claim(&mut self.map, &ctx.links.dir_link(rel), &rel.join(name), Resource::file(path));
            return Ok(());
        }

        let link = page.link(&rel.join(name), ctx.links);
        let post = match page {
            Page::Parsed(post) if wants_email(ctx, name, page) => {
                let (html, plaintext) = email_files(rel, name);
                let authors = match ctx.index {
                    Some(index) => post.authoring.byline_within(&index.authoring),
                    None => post.authoring.byline(),
                };
                Some(PostResource {
                    title: post.title.clone(),
                    published: post.timing.map(|t| t.published),
                    updated: post.timing.map(|t| t.updated),
                    authors,
                    html: ctx.root.join(html),
                    plaintext: ctx.root.join(plaintext),
                })
            }
            _ => None,
        };

        claim(&mut self.map, &link, &rel.join(name), Resource { path, post });
        Ok(())
    }

    fn asset(&mut self, rel: &Path, name: &str, _source: &Path, ctx: &GenContext<'a>) -> Result<()> {
        let file = rel.join(name);
        let resource = Resource::file(ctx.root.join(&file));
        claim(&mut self.map, &url_path(&file), &file, resource);
        Ok(())
    }
}
