//! Turning user-supplied dates, categories and paths into vault locations.

use std::path::{Component, Path, PathBuf};

use crate::category::Category;
use crate::date::{DatePath, is_plain_segment};
use crate::error::{ArchiveError, Result};
use crate::vault::Vault;

/// Parse a `YYYY-MM-DD` string.
pub fn resolve_date(input: &str) -> Result<DatePath> {
    DatePath::parse(input)
}

impl Vault {
    /// Existing directory for `date`.
    pub fn resolve_date_dir(&self, date: &DatePath) -> Result<PathBuf> {
        let dir = self.ensure_root()?.join(date.relative_path());
        if !self.fs().is_dir(&dir) {
            return Err(ArchiveError::DatePathNotFound {
                date: date.to_string(),
            });
        }
        Ok(dir)
    }

    /// Existing directory for an allow-listed `category` on `date`.
    pub fn resolve_date_category_path(&self, date: &DatePath, category: &str) -> Result<PathBuf> {
        let category: Category = category.parse()?;
        let dir = self.resolve_date_dir(date)?.join(category.slug());
        if !self.fs().is_dir(&dir) {
            return Err(ArchiveError::CategoryNotFound {
                category: category.to_string(),
                date: date.to_string(),
            });
        }
        Ok(dir)
    }

    /// Existing directory for any folder name on `date`, allow-listed or
    /// not. Used where the category was picked from what is on disk.
    pub(crate) fn resolve_present_category(&self, date_dir: &Path, date: &DatePath, name: &str) -> Result<PathBuf> {
        let not_found = || ArchiveError::CategoryNotFound {
            category: name.to_string(),
            date: date.to_string(),
        };
        if !is_plain_segment(name) {
            return Err(not_found());
        }
        let dir = date_dir.join(name);
        if !self.fs().is_dir(&dir) {
            return Err(not_found());
        }
        Ok(dir)
    }

    /// Resolve a caller-supplied article path. Relative paths are taken from
    /// the vault root; either way the result must stay inside the vault.
    ///
    /// When the target exists its symlinks are resolved too, so a link
    /// inside the vault cannot point a read outside it.
    pub fn resolve_article_path(&self, raw: &str) -> Result<PathBuf> {
        let outside = || ArchiveError::PathOutsideVault {
            path: raw.to_string(),
        };
        let root = normalize_path(self.ensure_root()?);
        let full = normalize_path(&root.join(raw.trim()));
        if full == root || !full.starts_with(&root) {
            return Err(outside());
        }
        if let (Ok(real_root), Ok(real)) = (self.fs().canonicalize(&root), self.fs().canonicalize(&full)) {
            if real == real_root || !real.starts_with(&real_root) {
                return Err(outside());
            }
        }
        Ok(full)
    }
}

/// Lexically resolve `.` and `..` without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}
