use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use crate::category::Category;
use crate::date::DatePath;
use crate::error::{ArchiveError, Result};
use crate::reader::is_tombstone;
use crate::vault::{Vault, has_markdown_ext};

/// Lightweight pointer to one article; built from a directory scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRef {
    pub title: String,
    pub date: DatePath,
    pub category: Category,
    pub path: PathBuf,
}

impl Vault {
    /// Allow-listed categories present on `date`, sorted. Empty when the
    /// date folder does not exist.
    pub fn list_categories(&self, date: &DatePath) -> Result<Vec<Category>> {
        let date_dir = self.ensure_root()?.join(date.relative_path());
        let mut categories: Vec<Category> = self
            .child_dirs(&date_dir)
            .iter()
            .filter_map(|entry| Category::from_slug(&entry.name))
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    /// Available `.md` articles filed under `category` on `date`, by title.
    ///
    /// Each file is read once to drop tombstones; files that cannot be read
    /// are skipped. A valid category with no folder on that date lists as
    /// empty.
    pub fn list_articles(&self, date: &DatePath, category: &str) -> Result<Vec<ArticleRef>> {
        let category: Category = category.parse()?;
        let dir = self.resolve_date_dir(date)?.join(category.slug());
        if !self.fs().is_dir(&dir) {
            return Ok(Vec::new());
        }

        let mut articles = Vec::new();
        for file in self.child_files(&dir) {
            if !has_markdown_ext(&file.path) {
                continue;
            }
            let content = match self.fs().read_to_string(&file.path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err, "skipping unreadable article");
                    continue;
                }
            };
            if is_tombstone(&content) {
                debug!(path = %file.path.display(), "skipping unavailable article");
                continue;
            }
            let Some(title) = file.path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            articles.push(ArticleRef {
                title: title.to_string(),
                date: date.clone(),
                category,
                path: file.path.clone(),
            });
        }
        articles.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(articles)
    }

    /// Articles for the newest date in the vault, grouped by category.
    ///
    /// `only` narrows the categories; an empty slice means all of them.
    pub fn news_update(
        &self,
        only: &[Category],
    ) -> Result<(DatePath, BTreeMap<Category, Vec<ArticleRef>>)> {
        let date = self.latest_date()?.ok_or(ArchiveError::NoDatesFound)?;
        let mut update = BTreeMap::new();
        for category in self.list_categories(&date)? {
            if !only.is_empty() && !only.contains(&category) {
                continue;
            }
            update.insert(category, self.list_articles(&date, category.slug())?);
        }
        Ok((date, update))
    }
}
