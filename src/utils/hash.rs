//! Content digest of a source tree outside version control.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Deterministic blake3 digest over every file below `root`.
///
/// Files are visited in name order; each contributes its relative path and
/// its bytes, so renames and edits both change the digest.
pub fn digest_dir(root: &Path) -> Result<String> {
    let mut hasher = blake3::Hasher::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("cannot walk `{}`", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(path);
        let content = fs::read(path).with_context(|| format!("cannot read `{}`", path.display()))?;

        hasher.update(rel.to_string_lossy().as_bytes());
        hasher.update(&[0]);
        hasher.update(&(content.len() as u64).to_le_bytes());
        hasher.update(&content);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_digest_is_stable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "hello").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.md"), "world").unwrap();

        let first = digest_dir(dir.path()).unwrap();
        let second = digest_dir(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_digest_changes_on_edit_and_rename() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "hello").unwrap();
        let original = digest_dir(dir.path()).unwrap();

        fs::write(dir.path().join("a.md"), "hello!").unwrap();
        let edited = digest_dir(dir.path()).unwrap();
        assert_ne!(original, edited);

        fs::rename(dir.path().join("a.md"), dir.path().join("b.md")).unwrap();
        let renamed = digest_dir(dir.path()).unwrap();
        assert_ne!(edited, renamed);
    }
}
