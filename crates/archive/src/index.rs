//! Date index: which days exist in the vault and what was filed on them.
//!
//! Rebuilt from a directory scan on every call; there is no cache.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::debug;

use crate::category::Category;
use crate::date::DatePath;
use crate::error::Result;
use crate::vault::Vault;

/// One date and the allow-listed categories present on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateIndexEntry {
    pub date: DatePath,
    pub categories: Vec<Category>,
}

impl Vault {
    /// Every `YYYY/MM/DD` folder with valid widths and month/day bounds,
    /// newest first.
    pub fn list_dates(&self) -> Result<Vec<DatePath>> {
        let root = self.ensure_root()?;
        let mut dates = BTreeSet::new();
        for year in self.child_dirs(root) {
            for month in self.child_dirs(&year.path) {
                for day in self.child_dirs(&month.path) {
                    if let Some(date) = DatePath::from_segments(&year.name, &month.name, &day.name) {
                        dates.insert(date);
                    }
                }
            }
        }
        debug!(count = dates.len(), "scanned date index");
        Ok(dates.into_iter().rev().collect())
    }

    /// Up to `limit` dates, newest first, each with its sorted allow-listed
    /// categories.
    ///
    /// `after` is an exclusive cursor: only dates strictly older than it are
    /// returned. Dates with no allow-listed category are skipped before the
    /// limit is applied.
    pub fn list_dates_and_categories(
        &self,
        limit: usize,
        after: Option<&str>,
    ) -> Result<Vec<DateIndexEntry>> {
        let after = after.map(DatePath::parse).transpose()?;
        let mut entries = Vec::new();
        for date in self.list_dates()? {
            if entries.len() >= limit {
                break;
            }
            if after.as_ref().is_some_and(|cursor| date >= *cursor) {
                continue;
            }
            let categories = self.list_categories(&date)?;
            if categories.is_empty() {
                continue;
            }
            entries.push(DateIndexEntry { date, categories });
        }
        Ok(entries)
    }

    /// Newest date in the index.
    pub fn latest_date(&self) -> Result<Option<DatePath>> {
        Ok(self.list_dates()?.into_iter().next())
    }

    /// A date drawn uniformly from the flattened index.
    ///
    /// Unlike [`Vault::random_date_walk`], every indexed date is equally
    /// likely regardless of how the years and months are populated.
    pub fn random_date<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<DatePath>> {
        Ok(self.list_dates()?.choose(rng).cloned())
    }
}
