use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ArchiveError, Result};
use crate::vault::Vault;

/// Phrase that marks an article whose body was never fetched.
pub const TOMBSTONE_SENTINEL: &str = "content not available";

/// True when `content` contains the sentinel in any letter case.
pub fn is_tombstone(content: &str) -> bool {
    content.to_lowercase().contains(TOMBSTONE_SENTINEL)
}

/// Full text of one article file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleContent {
    pub path: PathBuf,
    pub text: String,
}

impl ArticleContent {
    pub fn is_available(&self) -> bool {
        !is_tombstone(&self.text)
    }
}

impl Vault {
    /// Load an article as-is. Tombstones are returned like any other text;
    /// filtering them is up to the caller.
    pub fn read_article(&self, location: &Path) -> Result<ArticleContent> {
        match self.fs().read_to_string(location) {
            Ok(text) => Ok(ArticleContent {
                path: location.to_path_buf(),
                text,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ArchiveError::ArticleNotFound {
                path: location.display().to_string(),
            }),
            Err(err) => Err(ArchiveError::ArticleReadFailed {
                path: location.display().to_string(),
                detail: err.to_string(),
            }),
        }
    }

    /// Read an article by a path relative to (or inside) the vault root.
    pub fn read_article_at(&self, raw: &str) -> Result<ArticleContent> {
        let location = self.resolve_article_path(raw)?;
        self.read_article(&location)
    }
}
