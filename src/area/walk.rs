//! Shared traversal skeleton for every compilation purpose.
//!
//! ```text
//! walk(area, rel, ctx)
//!   ctx' = ctx.with_index(area's index.md)   if present
//!   visitor.area(rel)                        e.g. create the output directory
//!   for sub in subareas:  walk(sub, rel/sub.prefix, ctx')
//!   for page in pages:    visitor.page(...)
//!   for asset in assets:  visitor.asset(...)
//! ```
//!
//! File generation, route registration and binding collection are visitors.
//! A pair of visitors runs both in a single pass.

use super::{Area, GenContext};
use crate::page::Page;
use anyhow::{Context, Result};
use std::path::Path;

/// Per-area callbacks of a traversal.
pub(crate) trait Visitor<'a> {
    fn area(&mut self, _area: &'a Area, _rel: &Path, _ctx: &GenContext<'a>) -> Result<()> {
        Ok(())
    }

    fn page(
        &mut self,
        area: &'a Area,
        rel: &Path,
        name: &str,
        page: &'a Page,
        ctx: &GenContext<'a>,
    ) -> Result<()>;

    fn asset(&mut self, rel: &Path, name: &str, source: &Path, ctx: &GenContext<'a>) -> Result<()>;
}

impl<'a, A: Visitor<'a>, B: Visitor<'a>> Visitor<'a> for (A, B) {
    fn area(&mut self, area: &'a Area, rel: &Path, ctx: &GenContext<'a>) -> Result<()> {
        self.0.area(area, rel, ctx)?;
        self.1.area(area, rel, ctx)
    }

    fn page(
        &mut self,
        area: &'a Area,
        rel: &Path,
        name: &str,
        page: &'a Page,
        ctx: &GenContext<'a>,
    ) -> Result<()> {
        self.0.page(area, rel, name, page, ctx)?;
        self.1.page(area, rel, name, page, ctx)
    }

    fn asset(&mut self, rel: &Path, name: &str, source: &Path, ctx: &GenContext<'a>) -> Result<()> {
        self.0.asset(rel, name, source, ctx)?;
        self.1.asset(rel, name, source, ctx)
    }
}

impl Area {
    /// Walk this area; `parent_rel` is the parent's path relative to the root.
    pub(crate) fn walk<'a, V: Visitor<'a>>(
        &'a self,
        parent_rel: &Path,
        ctx: GenContext<'a>,
        visitor: &mut V,
    ) -> Result<()> {
        let rel = if self.prefix.is_empty() {
            parent_rel.to_path_buf()
        } else {
            parent_rel.join(&self.prefix)
        };
        let ctx = match self.index() {
            Some(index) => ctx.with_index(index),
            None => ctx,
        };

        visitor.area(self, &rel, &ctx)?;

        for sub in &self.subareas {
            sub.walk(&rel, ctx, visitor)
                .with_context(|| format!("in area `{}`", rel.join(&sub.prefix).display()))?;
        }

        for (name, page) in &self.pages {
            visitor
                .page(self, &rel, name, page, &ctx)
                .with_context(|| format!("cannot compile `{}`", rel.join(name).display()))?;
        }

        for (name, source) in &self.assets {
            visitor
                .asset(&rel, name, source, &ctx)
                .with_context(|| format!("cannot copy `{}`", source.display()))?;
        }

        Ok(())
    }
}
