//! Version-control history for timing and authorship fallback.
//!
//! When the source tree lives in a git repository, pages without front matter
//! dates or authors take them from the commits touching their file:
//!
//! | Field       | Source                                 |
//! |-------------|----------------------------------------|
//! | `published` | earliest commit touching the file      |
//! | `updated`   | latest commit touching the file        |
//! | author      | author of the earliest commit          |
//!
//! Times are author times, so rebased or cherry-picked commits keep the
//! date they were written.
//!
//! The commit graph is walked once when the repository is opened; per-file
//! queries then compare tree entries against the parents.

use crate::{
    log,
    utils::date::{Timestamp, from_unix},
};
use anyhow::{Context, Result, anyhow};
use gix::{ObjectId, Repository};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Name of the version-control directory, never compiled into the tree.
pub const GIT_DIR: &str = ".git";

/// One commit touching a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub author: String,
    pub time: Timestamp,
}

/// Commit data kept after the initial walk.
struct CommitNode {
    tree: ObjectId,
    parents: Vec<ObjectId>,
    author: String,
    time: Timestamp,
}

/// An opened repository with its commit graph reachable from HEAD.
pub struct GitRepo {
    repo: Repository,
    workdir: PathBuf,
    head: Option<ObjectId>,
    commits: Vec<CommitNode>,
    trees: HashMap<ObjectId, ObjectId>,
}

impl GitRepo {
    /// Find the repository containing `dir` (at or above it).
    ///
    /// Returns `Ok(None)` when there is none; failing to read a repository
    /// that does exist is an error.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        match dir.ancestors().find(|d| d.join(GIT_DIR).exists()) {
            Some(workdir) => Self::open(workdir).map(Some),
            None => Ok(None),
        }
    }

    /// Open the repository whose work tree is `workdir`.
    pub fn open(workdir: &Path) -> Result<Self> {
        let workdir = workdir
            .canonicalize()
            .with_context(|| format!("cannot resolve `{}`", workdir.display()))?;
        let repo = gix::open(&workdir)
            .with_context(|| format!("cannot open repository `{}`", workdir.display()))?;

        let head = repo
            .head()
            .context("cannot read HEAD")?
            .id()
            .map(|id| id.detach());

        let mut git = Self {
            repo,
            workdir,
            head,
            commits: Vec::new(),
            trees: HashMap::new(),
        };
        git.load_commits()?;

        log!("git"; "{} commits in `{}`", git.commits.len(), git.workdir.display());
        Ok(git)
    }

    fn load_commits(&mut self) -> Result<()> {
        let Some(head) = self.head else {
            return Ok(());
        };

        let walk = self
            .repo
            .rev_walk([head])
            .all()
            .context("cannot walk commit history")?;

        for info in walk {
            let info = info.context("cannot walk commit history")?;
            let commit = info.object().context("cannot load commit")?;
            let tree = commit.tree_id().context("cannot read commit tree")?.detach();
            let signature = commit.author().context("cannot read commit author")?;
            let author = signature.name.to_string();
            let time = signature.time().context("cannot read author time")?;
            let time = from_unix(time.seconds, time.offset)
                .ok_or_else(|| anyhow!("commit {} has an invalid timestamp", info.id))?;

            self.trees.insert(info.id, tree);
            self.commits.push(CommitNode {
                tree,
                parents: commit.parent_ids().map(|id| id.detach()).collect(),
                author,
                time,
            });
        }
        Ok(())
    }

    /// Id of the commit HEAD points at, if there is one.
    pub fn head_hash(&self) -> Option<String> {
        self.head.map(|id| id.to_string())
    }

    /// Commits touching `file`, oldest first.
    ///
    /// Files outside the work tree or never committed have an empty history.
    pub fn history(&self, file: &Path) -> Result<Vec<Commit>> {
        let file = file
            .canonicalize()
            .with_context(|| format!("cannot resolve `{}`", file.display()))?;
        let Ok(rel) = file.strip_prefix(&self.workdir) else {
            return Ok(Vec::new());
        };

        let mut touched = Vec::new();
        for node in &self.commits {
            let own = self.entry(node.tree, rel)?;
            let changed = if node.parents.is_empty() {
                own.is_some()
            } else {
                let mut differs = true;
                for parent in &node.parents {
                    let parent_tree = self.trees.get(parent).copied();
                    let theirs = match parent_tree {
                        Some(tree) => self.entry(tree, rel)?,
                        None => None,
                    };
                    if theirs == own {
                        differs = false;
                        break;
                    }
                }
                differs
            };

            if changed {
                touched.push(Commit {
                    author: node.author.clone(),
                    time: node.time,
                });
            }
        }

        touched.sort_by_key(|commit| commit.time);
        Ok(touched)
    }

    /// Object id of `rel` inside `tree`.
    fn entry(&self, tree: ObjectId, rel: &Path) -> Result<Option<ObjectId>> {
        let tree = self
            .repo
            .find_tree(tree)
            .with_context(|| format!("cannot load tree {tree}"))?;
        let entry = tree
            .lookup_entry_by_path(rel)
            .with_context(|| format!("cannot look up `{}`", rel.display()))?;
        Ok(entry.map(|entry| entry.object_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, process::Command};
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn git(dir: &Path, args: &[&str], date: &str) {
        git_dated(dir, args, date, date);
    }

    fn git_dated(dir: &Path, args: &[&str], authored: &str, committed: &str) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "Ada")
            .env("GIT_AUTHOR_EMAIL", "ada@example.com")
            .env("GIT_COMMITTER_NAME", "Ada")
            .env("GIT_COMMITTER_EMAIL", "ada@example.com")
            .env("GIT_AUTHOR_DATE", authored)
            .env("GIT_COMMITTER_DATE", committed)
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_discover_without_repository() {
        let dir = TempDir::new().unwrap();
        if dir.path().ancestors().any(|d| d.join(GIT_DIR).exists()) {
            return;
        }
        assert!(GitRepo::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_history_first_and_last_commit() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        git(root, &["init", "-q"], "2024-01-01T00:00:00Z");

        fs::write(root.join("post.md"), "one").unwrap();
        fs::write(root.join("other.md"), "x").unwrap();
        git(root, &["add", "."], "2024-01-01T00:00:00Z");
        git(root, &["commit", "-q", "-m", "first"], "2024-01-01T10:00:00Z");

        fs::write(root.join("other.md"), "y").unwrap();
        git(root, &["commit", "-q", "-am", "second"], "2024-02-01T10:00:00Z");

        fs::write(root.join("post.md"), "two").unwrap();
        git(root, &["commit", "-q", "-am", "third"], "2024-03-01T10:00:00Z");

        let repo = GitRepo::discover(root).unwrap().unwrap();
        let history = repo.history(&root.join("post.md")).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].author, "Ada");
        assert_eq!(history[0].time.to_rfc3339(), "2024-01-01T10:00:00+00:00");
        assert_eq!(history[1].time.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert_eq!(repo.head_hash().map(|h| h.len()), Some(40));
    }

    #[test]
    fn test_history_uses_author_time() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        git(root, &["init", "-q"], "2024-06-01T00:00:00Z");

        fs::write(root.join("post.md"), "one").unwrap();
        git(root, &["add", "."], "2024-06-01T00:00:00Z");
        git_dated(
            root,
            &["commit", "-q", "-m", "rebased"],
            "2020-06-01T00:00:00Z",
            "2024-06-01T00:00:00Z",
        );

        let repo = GitRepo::discover(root).unwrap().unwrap();
        let history = repo.history(&root.join("post.md")).unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].time.to_rfc3339(), "2020-06-01T00:00:00+00:00");
    }

    #[test]
    fn test_history_of_untracked_file_is_empty() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        git(root, &["init", "-q"], "2024-01-01T00:00:00Z");
        fs::write(root.join("tracked.md"), "a").unwrap();
        git(root, &["add", "."], "2024-01-01T00:00:00Z");
        git(root, &["commit", "-q", "-m", "init"], "2024-01-01T00:00:00Z");
        fs::write(root.join("new.md"), "b").unwrap();

        let repo = GitRepo::discover(root).unwrap().unwrap();
        assert!(repo.history(&root.join("new.md")).unwrap().is_empty());
    }

    #[test]
    fn test_empty_repository_has_no_head() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "-q"], "2024-01-01T00:00:00Z");

        let repo = GitRepo::discover(dir.path()).unwrap().unwrap();
        assert!(repo.head_hash().is_none());
    }
}
