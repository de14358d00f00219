//! Author resolution for page bylines.
//!
//! A page's byline comes from up to three sources, highest priority first:
//!
//! 1. names declared in its own front matter, resolved against its own
//!    definition table and then (inside an index context) the index's table
//! 2. the index page's byline, when the page declares nobody and the index does
//! 3. the author of the earliest commit touching the file
//!
//! Name lookup is always local table first, fallback table second. The
//! fallback never shadows a local definition.

use serde::Serialize;
use std::collections::BTreeMap;

/// A resolved author as handed to templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    pub page: Option<String>,
}

impl Author {
    /// Author known only by name.
    pub fn bare(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            page: None,
        }
    }
}

/// Author definitions keyed by the name used in `author:`.
pub type Definitions = BTreeMap<String, Author>;

/// Resolve `names` against `local`, then `fallback`, else a bare name.
pub fn resolve_authors(
    names: &[String],
    local: &Definitions,
    fallback: Option<&Definitions>,
) -> Vec<Author> {
    names
        .iter()
        .map(|name| {
            local
                .get(name)
                .or_else(|| fallback.and_then(|defs| defs.get(name)))
                .cloned()
                .unwrap_or_else(|| Author::bare(name))
        })
        .collect()
}

/// Authorship inputs of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authoring {
    /// Names from front matter, in order.
    pub declared: Vec<String>,
    /// Local definition table.
    pub definitions: Definitions,
    /// Author of the first commit touching the file, if known.
    pub vcs_author: Option<String>,
}

impl Authoring {
    /// Byline of the page on its own.
    pub fn byline(&self) -> Vec<Author> {
        if self.declared.is_empty() {
            return self.vcs_author.iter().map(|name| Author::bare(name)).collect();
        }
        resolve_authors(&self.declared, &self.definitions, None)
    }

    /// Byline of the page rendered under `index`.
    pub fn byline_within(&self, index: &Authoring) -> Vec<Author> {
        if self.declared.is_empty() && !index.declared.is_empty() {
            return index.byline();
        }
        if self.declared.is_empty() {
            return self.byline();
        }
        resolve_authors(&self.declared, &self.definitions, Some(&index.definitions))
    }
}
