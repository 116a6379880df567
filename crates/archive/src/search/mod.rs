//! Fuzzy search over article file paths.
//!
//! The index is the list of `.md` paths under the vault (or under one date
//! subtree). Whole path strings are scored, so folder names such as the
//! category and the date take part in the match.

pub mod score;

use std::path::PathBuf;

use tracing::debug;

use crate::date::DateScope;
use crate::error::Result;
use crate::vault::{Vault, has_markdown_ext};

pub use score::{partial_ratio, partial_ratio_cutoff, ratio};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_SEARCH_CUTOFF: f64 = 75.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Free text; may be empty.
    pub query: Option<String>,
    /// `YYYY`, `YYYY/MM` or `YYYY/MM/DD`. Anything else searches the whole vault.
    pub date: Option<String>,
    /// Prepended to the query text, which favours paths in that folder.
    pub category: Option<String>,
    pub limit: usize,
    /// Minimum score (0–100) a path needs to be returned.
    pub cutoff: f64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: None,
            date: None,
            category: None,
            limit: DEFAULT_SEARCH_LIMIT,
            cutoff: DEFAULT_SEARCH_CUTOFF,
        }
    }
}

impl SearchQuery {
    /// `"{category} {query}"`, trimmed and lowercased.
    fn scoring_text(&self) -> String {
        [self.category.as_deref(), self.query.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl Vault {
    /// Markdown paths under the vault, or under the date subtree named by
    /// `date`, in walk order.
    pub fn build_search_index(&self, date: Option<&str>) -> Result<Vec<PathBuf>> {
        let root = self.ensure_root()?;
        let base = match date.and_then(DateScope::parse) {
            Some(scope) => root.join(scope.relative_path()),
            None => root.to_path_buf(),
        };
        let index: Vec<PathBuf> = self
            .fs()
            .walk_files(&base)
            .into_iter()
            .filter(|p| has_markdown_ext(p))
            .collect();
        debug!(base = %base.display(), size = index.len(), "built search index");
        Ok(index)
    }

    /// Best-matching article paths, highest score first.
    ///
    /// With no query text and no category this returns the first `limit`
    /// index entries unscored. Equal scores keep walk order. Fails only when
    /// the vault root is missing.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<PathBuf>> {
        let index = self.build_search_index(query.date.as_deref())?;
        let text = query.scoring_text();
        if text.is_empty() {
            return Ok(index.into_iter().take(query.limit).collect());
        }

        let mut scored: Vec<(f64, PathBuf)> = index
            .into_iter()
            .filter_map(|path| {
                partial_ratio_cutoff(&text, &path.to_string_lossy(), query.cutoff)
                    .map(|score| (score, path))
            })
            .collect();
        // Stable sort: ties stay in walk order.
        scored.sort_by(|(left, _), (right, _)| right.total_cmp(left));
        debug!(query = %text, matches = scored.len(), "scored search index");
        Ok(scored
            .into_iter()
            .take(query.limit)
            .map(|(_, path)| path)
            .collect())
    }
}
