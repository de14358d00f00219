//! Route table visitor for dynamic serving.
//!
//! | Entry            | Route              | File                     |
//! |------------------|--------------------|--------------------------|
//! | `sub/index.md`   | `/sub`             | `sub/index.html`         |
//! | `sub/page.md`    | `/sub/page`        | `sub/page.html`          |
//! | custom url       | `/custom`          | `sub/page.html`          |
//! | `sub/cover.png`  | `/sub/cover.png`   | `sub/cover.png`          |
//!
//! Routes are keyed without a trailing slash, the way requests are resolved.
//! The first page to claim a link keeps it.

use super::{Area, GenContext, Visitor, generate::page_file, route_key, url_path};
use crate::{
    log,
    page::{INDEX_PAGE, Page},
};
use anyhow::Result;
use std::{
    collections::{BTreeMap, btree_map::Entry},
    path::{Path, PathBuf},
};

/// Register `value` under the route key of `link`.
///
/// The first entry keeps a contested link; later ones are dropped with a
/// warning naming `source`. Returns whether `value` was registered.
pub(crate) fn claim<V>(map: &mut BTreeMap<String, V>, link: &str, source: &Path, value: V) -> bool {
    match map.entry(route_key(link).to_owned()) {
        Entry::Vacant(entry) => {
            entry.insert(value);
            true
        }
        Entry::Occupied(entry) => {
            log!("warn"; "`{}` also resolves to `{}`, skipped", source.display(), entry.key());
            false
        }
    }
}

/// Collects link path -> generated file.
#[derive(Debug, Default)]
pub(crate) struct RouteTable {
    routes: BTreeMap<String, PathBuf>,
}

impl RouteTable {
    pub(crate) fn into_routes(self) -> BTreeMap<String, PathBuf> {
        self.routes
    }
}

impl<'a> Visitor<'a> for RouteTable {
    fn page(
        &mut self,
        _area: &'a Area,
        rel: &Path,
        name: &str,
        page: &'a Page,
        ctx: &GenContext<'a>,
    ) -> Result<()> {
        let route = if name == INDEX_PAGE {
            ctx.links.dir_link(rel)
        } else {
            page.link(&rel.join(name), ctx.links)
        };
        claim(&mut self.routes, &route, &rel.join(name), ctx.root.join(page_file(rel, name)));
        Ok(())
    }

    fn asset(&mut self, rel: &Path, name: &str, _source: &Path, ctx: &GenContext<'a>) -> Result<()> {
        let file = rel.join(name);
        claim(&mut self.routes, &url_path(&file), &file, ctx.root.join(&file));
        Ok(())
    }
}
