//! Liquid theme loading and template execution.
//!
//! A theme is a directory of Liquid templates:
//!
//! | Template          | Required | Used for                               |
//! |-------------------|----------|----------------------------------------|
//! | `index.html`      | yes      | `index.md` pages with their post list  |
//! | `_default.html`   | yes      | every other page and email HTML        |
//! | anything else     | no       | custom pages, parsed on first use      |
//!
//! A missing custom template is reported as
//! [`ThemeError::MissingCustomTemplate`] so callers can treat the feature as
//! unavailable for this theme instead of failing the whole run.

use anyhow::{Context, Result};
use liquid::{Object, Parser, ParserBuilder, Template};
use serde::Serialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Template for index pages.
pub const INDEX_TEMPLATE: &str = "index.html";
/// Template for regular pages.
pub const DEFAULT_TEMPLATE: &str = "_default.html";

/// Theme failures.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("theme `{0}` has no `{1}` template")]
    MissingTemplate(PathBuf, &'static str),

    #[error("theme has no custom page template `{0}`")]
    MissingCustomTemplate(String),

    #[error("template `{0}` failed: {1}")]
    Template(String, String),
}

/// A loaded theme with its required templates parsed.
pub struct Theme {
    dir: PathBuf,
    parser: Parser,
    index: Template,
    default: Template,
}

impl Theme {
    /// Load the theme in `dir`, parsing the required templates.
    pub fn load(dir: &Path) -> Result<Self> {
        let parser = ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| ThemeError::Template("<parser>".into(), e.to_string()))?;

        let index = Self::parse_required(&parser, dir, INDEX_TEMPLATE)?;
        let default = Self::parse_required(&parser, dir, DEFAULT_TEMPLATE)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            parser,
            index,
            default,
        })
    }

    fn parse_required(parser: &Parser, dir: &Path, name: &'static str) -> Result<Template> {
        let path = dir.join(name);
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ThemeError::MissingTemplate(dir.to_path_buf(), name).into());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("cannot read `{}`", path.display()));
            }
        };
        parse(parser, name, &source)
    }

    /// Render the index template.
    pub fn render_index<T: Serialize>(&self, data: &T) -> Result<String> {
        execute(&self.index, INDEX_TEMPLATE, &to_object(INDEX_TEMPLATE, data)?)
    }

    /// Render the default page template.
    pub fn render_default<T: Serialize>(&self, data: &T) -> Result<String> {
        execute(&self.default, DEFAULT_TEMPLATE, &to_object(DEFAULT_TEMPLATE, data)?)
    }

    /// Render the custom template `name`, parsing it on demand.
    pub fn render_custom(&self, name: &str, data: &Object) -> Result<String> {
        let path = self.dir.join(name);
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ThemeError::MissingCustomTemplate(name.to_owned()).into());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("cannot read `{}`", path.display()));
            }
        };
        let template = parse(&self.parser, name, &source)?;
        execute(&template, name, data)
    }
}

fn parse(parser: &Parser, name: &str, source: &str) -> Result<Template> {
    parser
        .parse(source)
        .map_err(|e| ThemeError::Template(name.to_owned(), e.to_string()).into())
}

fn execute(template: &Template, name: &str, data: &Object) -> Result<String> {
    template
        .render(data)
        .map_err(|e| ThemeError::Template(name.to_owned(), e.to_string()).into())
}

/// Convert serializable template data into a liquid object.
pub fn to_object<T: Serialize>(name: &str, data: &T) -> Result<Object> {
    liquid::to_object(data).map_err(|e| ThemeError::Template(name.to_owned(), e.to_string()).into())
}
