use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{ArchiveError, Result};
use crate::fs::{DirEntry, DiskFs, VaultFs};

/// Read-only handle on a news vault laid out as
/// `root/YYYY/MM/DD/<category>/<title>.md`.
///
/// The root is fixed at construction but its existence is re-checked on
/// every query, so a vault mounted after startup is picked up and one that
/// disappears degrades to [`ArchiveError::VaultNotFound`].
#[derive(Clone)]
pub struct Vault {
    root: PathBuf,
    fs: Arc<dyn VaultFs>,
}

impl Vault {
    /// Open a vault on the local disk.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(root, DiskFs)
    }

    pub fn with_fs(root: impl Into<PathBuf>, fs: impl VaultFs + 'static) -> Self {
        Self {
            root: root.into(),
            fs: Arc::new(fs),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn fs(&self) -> &dyn VaultFs {
        self.fs.as_ref()
    }

    /// The root, if it is configured and currently a directory.
    pub fn ensure_root(&self) -> Result<&Path> {
        if self.root.as_os_str().is_empty() {
            return Err(ArchiveError::VaultNotFound {
                root: "(unset)".to_string(),
            });
        }
        if !self.fs.is_dir(&self.root) {
            return Err(ArchiveError::VaultNotFound {
                root: self.root.display().to_string(),
            });
        }
        Ok(&self.root)
    }

    /// Non-hidden subdirectories of `dir`. A missing or unreadable directory
    /// yields an empty list.
    pub(crate) fn child_dirs(&self, dir: &Path) -> Vec<DirEntry> {
        match self.fs.list_children(dir) {
            Ok(children) => children
                .into_iter()
                .filter(|c| c.is_dir() && !c.is_hidden())
                .collect(),
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "cannot list directory");
                Vec::new()
            }
        }
    }

    /// Files (not directories) directly inside `dir`.
    pub(crate) fn child_files(&self, dir: &Path) -> Vec<DirEntry> {
        match self.fs.list_children(dir) {
            Ok(children) => children.into_iter().filter(DirEntry::is_file).collect(),
            Err(err) => {
                debug!(dir = %dir.display(), error = %err, "cannot list directory");
                Vec::new()
            }
        }
    }
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault").field("root", &self.root).finish_non_exhaustive()
    }
}

/// `.md` in any letter case.
pub(crate) fn has_markdown_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;

    #[test]
    fn unset_root_is_vault_not_found() {
        let vault = Vault::with_fs("", MemoryFs::new());
        assert_eq!(
            vault.ensure_root().unwrap_err(),
            ArchiveError::VaultNotFound {
                root: "(unset)".to_string()
            }
        );
    }

    #[test]
    fn missing_root_names_the_path() {
        let vault = Vault::with_fs("/srv/news", MemoryFs::new());
        let err = vault.ensure_root().unwrap_err();
        assert_eq!(err.to_string(), "Vault not found: /srv/news");
    }

    #[test]
    fn existing_root_is_returned() {
        let vault = Vault::with_fs("/srv/news", MemoryFs::new().with_dir("/srv/news"));
        assert_eq!(vault.ensure_root().unwrap(), Path::new("/srv/news"));
    }

    #[test]
    fn markdown_extension_is_case_insensitive() {
        assert!(has_markdown_ext(Path::new("a/b.md")));
        assert!(has_markdown_ext(Path::new("a/b.MD")));
        assert!(!has_markdown_ext(Path::new("a/b.txt")));
        assert!(!has_markdown_ext(Path::new("a/md")));
    }
}
