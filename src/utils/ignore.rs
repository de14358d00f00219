//! Cascading per-directory ignore rules.
//!
//! Every directory may carry a `.strataignore` file with one entry name per
//! line. A bare name hides that entry, `!name` brings back an entry hidden by
//! an ancestor. Rules are exact names, not globs.
//!
//! ```text
//! content/.strataignore       drafts
//! content/sub/.strataignore   !drafts
//!
//! content/drafts      -> ignored
//! content/sub/drafts  -> kept
//! ```
//!
//! A child state is derived from its parent on every descent, so sibling
//! subtrees never see each other's rules.

use anyhow::{Context, Result};
use std::{collections::HashMap, fs, io, path::Path};

/// Name of the per-directory ignore file.
pub const IGNORE_FILE: &str = ".strataignore";

/// Accumulated ignore rules for one directory level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreState {
    /// name -> should ignore
    rules: HashMap<String, bool>,
}

impl IgnoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the state for `dir` from this (parent) state.
    ///
    /// A missing ignore file leaves the inherited rules untouched.
    pub fn descend(&self, dir: &Path, file_name: &str) -> Result<Self> {
        let path = dir.join(file_name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(self.clone()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("cannot read ignore file `{}`", path.display()));
            }
        };

        let mut child = self.clone();
        child.apply(&content);
        Ok(child)
    }

    /// Apply the rules of one ignore file on top of the current ones.
    pub fn apply(&mut self, content: &str) {
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match line.strip_prefix('!') {
                Some(name) => {
                    let name = name.trim();
                    if !name.is_empty() {
                        self.rules.insert(name.to_owned(), false);
                    }
                }
                None => {
                    self.rules.insert(line.to_owned(), true);
                }
            }
        }
    }

    /// Whether the most specific rule for `name` hides it. Unknown names are kept.
    pub fn should_ignore(&self, name: &str) -> bool {
        self.rules.get(name).copied().unwrap_or(false)
    }
}
