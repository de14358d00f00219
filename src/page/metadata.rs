//! Front matter: splitting and parsing the metadata block of a page.
//!
//! ```text
//! ---                        <- opening delimiter, must be the first line
//! url: /about                <- custom link (clean-link purposes only)
//! published: 2024-01-01
//! updated: Jan 05, 2024
//! author: [ada, grace]       <- a single name is accepted too
//! authors:
//!   ada: { name: Ada Lovelace, page: /people/ada }
//! style: InspiredGitHub      <- highlighting style for this page
//! ---                        <- closing delimiter
//! # Title
//! body...
//! ```

use super::authoring::{Author, Definitions};
use crate::utils::date::{Timestamp, parse_date};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

/// Delimiter line around the metadata block.
const DELIMITER: &str = "---";

/// Errors raised while reading a page's metadata block.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("unclosed metadata section")]
    Unclosed,

    #[error("invalid url `{0}`: {1}")]
    InvalidUrl(String, String),

    #[error("unrecognized date `{0}`")]
    InvalidDate(String),

    #[error("malformed metadata section")]
    Yaml(#[from] serde_yaml::Error),
}

/// Publication timing of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub published: Timestamp,
    pub updated: Timestamp,
}

/// Parsed metadata block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub url: Option<String>,
    pub timing: Option<Timing>,
    /// Declared author names, in order.
    pub authors: Vec<String>,
    /// Local author definition table.
    pub definitions: Definitions,
    pub style: Option<String>,
}

/// Split a document into `(metadata, body)`.
///
/// A document that does not start with a `---` line has no metadata.
pub fn separate(raw: &str) -> Result<(&str, &str), MetadataError> {
    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(("", raw));
    };
    if first.trim_end() != DELIMITER {
        return Ok(("", raw));
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Ok((&raw[start..offset], &raw[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(MetadataError::Unclosed)
}

// ============================================================================
// Block parsing
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMetadata {
    url: Option<String>,
    published: Option<String>,
    updated: Option<String>,
    author: Names,
    authors: BTreeMap<String, RawAuthor>,
    style: Option<String>,
}

/// `author:` accepts a single name or a list.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum Names {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAuthor {
    name: Option<String>,
    page: Option<String>,
}

/// Parse the metadata block produced by [`separate`].
pub fn parse_block(block: &str) -> Result<Metadata, MetadataError> {
    if block.trim().is_empty() {
        return Ok(Metadata::default());
    }
    let raw: Option<RawMetadata> = serde_yaml::from_str(block)?;
    let raw = raw.unwrap_or_default();

    let url = match raw.url.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(url) => Some(validate_url(url)?),
    };

    let timing = match raw.published {
        None => None,
        Some(published) => {
            let published = date(&published)?;
            let updated = match raw.updated {
                Some(updated) => date(&updated)?,
                None => published,
            };
            Some(Timing { published, updated })
        }
    };

    let authors = match raw.author {
        Names::None => Vec::new(),
        Names::One(name) => vec![name],
        Names::Many(names) => names,
    };

    let definitions = raw
        .authors
        .into_iter()
        .map(|(key, def)| {
            let author = Author {
                name: def.name.unwrap_or_else(|| key.clone()),
                page: def.page.filter(|page| !page.is_empty()),
            };
            (key, author)
        })
        .collect();

    Ok(Metadata {
        url,
        timing,
        authors,
        definitions,
        style: raw.style.filter(|style| !style.is_empty()),
    })
}

fn date(s: &str) -> Result<Timestamp, MetadataError> {
    parse_date(s).ok_or_else(|| MetadataError::InvalidDate(s.to_owned()))
}

/// A custom url must be an absolute, single-slashed path that parses as a URL.
fn validate_url(url: &str) -> Result<String, MetadataError> {
    let invalid = |reason: &str| MetadataError::InvalidUrl(url.to_owned(), reason.to_owned());

    if !url.starts_with('/') {
        return Err(invalid("must start with `/`"));
    }
    if url.starts_with("//") {
        return Err(invalid("must be a path, not a host"));
    }
    let base = Url::parse("http://localhost/").map_err(|e| invalid(&e.to_string()))?;
    base.join(url).map_err(|e| invalid(&e.to_string()))?;
    Ok(url.to_owned())
}
