//! Random article sampling with bounded retries.
//!
//! Candidates are drawn one at a time and only the drawn file is read, so a
//! large category costs one read per attempt instead of a full scan. The
//! price is that a category dominated by tombstones can exhaust the retries
//! even though a valid article exists.

use std::path::{Path, PathBuf};

use newsvault_config::DateSelection;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::date::DatePath;
use crate::error::{ArchiveError, Result};
use crate::reader::ArticleContent;
use crate::vault::{Vault, has_markdown_ext};

pub const DEFAULT_MAX_RETRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    pub max_retries: usize,
    pub date_selection: DateSelection,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            date_selection: DateSelection::Walk,
        }
    }
}

impl Vault {
    /// Pick a date by choosing a random non-hidden folder at the year, month
    /// and day levels in turn.
    ///
    /// Each level is uniform over its own folders, so a day in a sparse month
    /// is likelier than one in a busy month. Folder names are not checked
    /// against the date shape here; they are parsed as `YYYY-MM-DD` at the
    /// end and may fail with [`ArchiveError::InvalidDateFormat`]. Returns
    /// `None` when some level has no folders.
    pub fn random_date_walk<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<DatePath>> {
        let root = self.ensure_root()?;
        let years = self.child_dirs(root);
        let Some(year) = years.choose(rng) else {
            return Ok(None);
        };
        let months = self.child_dirs(&year.path);
        let Some(month) = months.choose(rng) else {
            return Ok(None);
        };
        let days = self.child_dirs(&month.path);
        let Some(day) = days.choose(rng) else {
            return Ok(None);
        };
        DatePath::parse(&format!("{}-{}-{}", year.name, month.name, day.name)).map(Some)
    }

    /// Return one available article.
    ///
    /// A missing `date` is chosen with `options.date_selection`; a missing
    /// `category` is any folder present on that date, allow-listed or not.
    /// Up to `options.max_retries` files are drawn (with replacement) until
    /// one reads successfully and is not a tombstone.
    pub fn sample_article<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        date: Option<&str>,
        category: Option<&str>,
        options: SampleOptions,
    ) -> Result<ArticleContent> {
        self.ensure_root()?;

        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => DatePath::parse(raw)?,
            None => {
                let picked = match options.date_selection {
                    DateSelection::Walk => self.random_date_walk(rng)?,
                    DateSelection::Uniform => self.random_date(rng)?,
                };
                picked.ok_or(ArchiveError::NoDatesFound)?
            }
        };
        let date_dir = self.resolve_date_dir(&date)?;

        let category_dir = match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(name) => self.resolve_present_category(&date_dir, &date, name)?,
            None => {
                let present = self.child_dirs(&date_dir);
                let picked = present.choose(rng).ok_or_else(|| ArchiveError::NoCategoriesFound {
                    date: date.to_string(),
                })?;
                picked.path.clone()
            }
        };
        let dir_label = category_dir.display().to_string();

        let mut files = self.candidate_files(&category_dir);
        if files.is_empty() {
            return Err(ArchiveError::NoFilesFound { dir: dir_label });
        }

        for attempt in 1..=options.max_retries {
            let Some(pick) = files.choose(rng).cloned() else {
                break;
            };
            let article = match self.read_article(&pick) {
                Ok(article) => article,
                Err(err) => {
                    warn!(attempt, error = %err, "sampled article unreadable, redrawing");
                    files = self.candidate_files(&category_dir);
                    let Some(redraw) = files.choose(rng).cloned() else {
                        return Err(ArchiveError::NoReadableFilesFound { dir: dir_label });
                    };
                    match self.read_article(&redraw) {
                        Ok(article) => article,
                        Err(err) => {
                            debug!(attempt, error = %err, "redrawn article unreadable");
                            continue;
                        }
                    }
                }
            };
            if article.is_available() {
                debug!(attempt, path = %article.path.display(), "sampled article");
                return Ok(article);
            }
            debug!(attempt, path = %article.path.display(), "sampled tombstone");
        }

        Err(ArchiveError::NoValidArticleFound {
            attempts: options.max_retries,
            dir: dir_label,
        })
    }

    /// Markdown files in `dir`, or every file when there are none.
    fn candidate_files(&self, dir: &Path) -> Vec<PathBuf> {
        let all: Vec<PathBuf> = self.child_files(dir).into_iter().map(|f| f.path).collect();
        let markdown: Vec<PathBuf> = all.iter().filter(|p| has_markdown_ext(p)).cloned().collect();
        if markdown.is_empty() { all } else { markdown }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const BUDGET: &str = "Pemerintah memangkas anggaran.";

    fn scenario() -> Vault {
        let fs = MemoryFs::new()
            .with_file("/v/2025/03/23/politik/budget-cut.md", BUDGET)
            .with_file("/v/2025/03/23/politik/rumor.md", "Content Not Available");
        Vault::with_fs("/v", fs)
    }

    fn opts(max_retries: usize) -> SampleOptions {
        SampleOptions {
            max_retries,
            ..SampleOptions::default()
        }
    }

    #[test]
    fn never_returns_a_tombstone() {
        let v = scenario();
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            match v.sample_article(&mut rng, Some("2025-03-23"), Some("politik"), opts(10)) {
                Ok(article) => assert_eq!(article.text, BUDGET),
                Err(err) => assert!(
                    matches!(err, ArchiveError::NoValidArticleFound { attempts: 10, .. }),
                    "{err}"
                ),
            }
        }
    }

    #[test]
    fn enough_retries_always_find_the_valid_article() {
        let v = scenario();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let article = v
                .sample_article(&mut rng, Some("2025-03-23"), Some("politik"), opts(200))
                .unwrap();
            assert_eq!(article.text, BUDGET);
            assert_eq!(
                article.path,
                PathBuf::from("/v/2025/03/23/politik/budget-cut.md")
            );
        }
    }

    #[test]
    fn only_tombstones_exhaust_retries() {
        let fs = MemoryFs::new()
            .with_file("/v/2025/03/23/politik/a.md", "content not available")
            .with_file("/v/2025/03/23/politik/b.md", "CONTENT NOT AVAILABLE");
        let v = Vault::with_fs("/v", fs);
        let mut rng = StdRng::seed_from_u64(1);
        let err = v
            .sample_article(&mut rng, Some("2025-03-23"), Some("politik"), opts(5))
            .unwrap_err();
        assert_eq!(
            err,
            ArchiveError::NoValidArticleFound {
                attempts: 5,
                dir: "/v/2025/03/23/politik".to_string()
            }
        );
    }

    #[test]
    fn unreadable_files_are_skipped() {
        let fs = MemoryFs::new()
            .with_unreadable_file("/v/2025/03/23/politik/locked.md")
            .with_file("/v/2025/03/23/politik/open.md", "terbuka");
        let v = Vault::with_fs("/v", fs);
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let article = v
                .sample_article(&mut rng, Some("2025-03-23"), Some("politik"), opts(100))
                .unwrap();
            assert_eq!(article.text, "terbuka");
        }

        let all_locked = Vault::with_fs(
            "/v",
            MemoryFs::new().with_unreadable_file("/v/2025/03/23/politik/locked.md"),
        );
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            all_locked.sample_article(&mut rng, Some("2025-03-23"), Some("politik"), opts(4)),
            Err(ArchiveError::NoValidArticleFound { .. })
        ));
    }

    #[test]
    fn falls_back_to_non_markdown_files() {
        let fs = MemoryFs::new().with_file("/v/2025/03/23/hukum/putusan.txt", "Putusan MK.");
        let v = Vault::with_fs("/v", fs);
        let mut rng = StdRng::seed_from_u64(0);
        let article = v
            .sample_article(&mut rng, Some("2025-03-23"), Some("hukum"), opts(3))
            .unwrap();
        assert_eq!(article.text, "Putusan MK.");
    }

    #[test]
    fn prefers_markdown_when_present() {
        let fs = MemoryFs::new()
            .with_file("/v/2025/03/23/hukum/putusan.md", "markdown")
            .with_file("/v/2025/03/23/hukum/catatan.txt", "text");
        let v = Vault::with_fs("/v", fs);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let article = v
                .sample_article(&mut rng, Some("2025-03-23"), Some("hukum"), opts(3))
                .unwrap();
            assert_eq!(article.text, "markdown");
        }
    }

    #[test]
    fn structural_misses_are_typed() {
        let fs = MemoryFs::new()
            .with_file("/v/2025/03/23/politik/a.md", "a")
            .with_dir("/v/2025/03/23/hukum")
            .with_dir("/v/2025/03/23/sains/lampiran")
            .with_dir("/v/2025/03/22");
        let v = Vault::with_fs("/v", fs);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            v.sample_article(&mut rng, Some("2025-03"), None, opts(3)),
            Err(ArchiveError::InvalidDateFormat { .. })
        ));
        assert!(matches!(
            v.sample_article(&mut rng, Some("2025/03/23"), None, opts(3)),
            Err(ArchiveError::InvalidDateFormat { .. })
        ));
        assert!(matches!(
            v.sample_article(&mut rng, Some("2025-03-24"), None, opts(3)),
            Err(ArchiveError::DatePathNotFound { .. })
        ));
        assert!(matches!(
            v.sample_article(&mut rng, Some("2025-03-23"), Some("ekonomi"), opts(3)),
            Err(ArchiveError::CategoryNotFound { .. })
        ));
        assert!(matches!(
            v.sample_article(&mut rng, Some("2025-03-23"), Some("hukum"), opts(3)),
            Err(ArchiveError::NoFilesFound { .. })
        ));
        assert!(matches!(
            v.sample_article(&mut rng, Some("2025-03-23"), Some("sains"), opts(3)),
            Err(ArchiveError::NoFilesFound { .. })
        ));
        assert!(matches!(
            v.sample_article(&mut rng, Some("2025-03-22"), None, opts(3)),
            Err(ArchiveError::NoCategoriesFound { .. })
        ));

        let missing = Vault::with_fs("/nowhere", MemoryFs::new());
        assert!(matches!(
            missing.sample_article(&mut rng, None, None, opts(3)),
            Err(ArchiveError::VaultNotFound { .. })
        ));
    }

    #[test]
    fn random_category_is_not_allow_listed() {
        let fs = MemoryFs::new().with_file("/v/2025/03/23/rubrik-lain/x.md", "lain");
        let v = Vault::with_fs("/v", fs);
        let mut rng = StdRng::seed_from_u64(9);
        let article = v
            .sample_article(&mut rng, Some("2025-03-23"), None, opts(3))
            .unwrap();
        assert_eq!(article.text, "lain");
    }

    #[test]
    fn random_date_and_category_when_omitted() {
        let v = scenario();
        let mut rng = StdRng::seed_from_u64(42);
        let article = v.sample_article(&mut rng, None, Some(""), opts(200)).unwrap();
        assert_eq!(article.text, BUDGET);

        let uniform = SampleOptions {
            max_retries: 200,
            date_selection: DateSelection::Uniform,
        };
        let article = v.sample_article(&mut rng, Some("  "), None, uniform).unwrap();
        assert_eq!(article.text, BUDGET);
    }

    #[test]
    fn walk_with_missing_level_finds_no_dates() {
        let v = Vault::with_fs("/v", MemoryFs::new().with_dir("/v/2025/03"));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(v.random_date_walk(&mut rng).unwrap(), None);
        assert_eq!(
            v.sample_article(&mut rng, None, None, opts(3)).unwrap_err(),
            ArchiveError::NoDatesFound
        );
    }

    #[test]
    fn walk_into_non_date_folders_is_invalid_format() {
        let v = Vault::with_fs(
            "/v",
            MemoryFs::new().with_file("/v/my-notes/drafts/old/politik/a.md", "x"),
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            v.sample_article(&mut rng, None, None, opts(3)).unwrap_err(),
            ArchiveError::InvalidDateFormat {
                input: "my-notes-drafts-old".to_string()
            }
        );

        // The flat index never sees those folders.
        let uniform = SampleOptions {
            max_retries: 3,
            date_selection: DateSelection::Uniform,
        };
        assert_eq!(
            v.sample_article(&mut rng, None, None, uniform).unwrap_err(),
            ArchiveError::NoDatesFound
        );
    }

    #[test]
    fn walk_and_uniform_selection_have_different_distributions() {
        // One lonely date in 2024, nine dates in 2025.
        let mut fs = MemoryFs::new().with_dir("/v/2024/01/01/politik");
        for day in 1..=9 {
            fs = fs.with_dir(format!("/v/2025/01/{day:02}/politik"));
        }
        let v = Vault::with_fs("/v", fs);
        let lonely = DatePath::parse("2024-01-01").unwrap();

        let mut rng = StdRng::seed_from_u64(2024);
        let draws = 2000;
        let walk_hits = (0..draws)
            .filter(|_| v.random_date_walk(&mut rng).unwrap().as_ref() == Some(&lonely))
            .count();
        let uniform_hits = (0..draws)
            .filter(|_| v.random_date(&mut rng).unwrap().as_ref() == Some(&lonely))
            .count();

        // Expected about 1000 for the walk and about 200 for the flat pick.
        assert!(walk_hits > 800, "walk hits: {walk_hits}");
        assert!(uniform_hits < 350, "uniform hits: {uniform_hits}");
    }
}
