use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{ArchiveError, Result};

/// A `(year, month, day)` triple naming one date folder in the vault.
///
/// Components are kept as the strings found on disk. The derived `Ord`
/// compares them as a string triple, which is what pagination relies on;
/// for zero-padded folders it is also chronological.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatePath {
    year: String,
    month: String,
    day: String,
}

impl DatePath {
    /// Parse the hyphenated `YYYY-MM-DD` form used at the API boundary.
    ///
    /// Only the shape is checked: exactly three parts, each usable as a
    /// single path segment. Numeric bounds are left to the date index.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || ArchiveError::InvalidDateFormat {
            input: input.to_string(),
        };
        let parts: Vec<&str> = input.split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(invalid());
        };
        if ![year, month, day].iter().all(|part| is_plain_segment(part)) {
            return Err(invalid());
        }
        Ok(Self {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
        })
    }

    /// Build a date from three folder names, accepting only the strict
    /// `YYYY/MM/DD` digit widths with `1..=12` months and `1..=31` days.
    /// Day counts per month (and leap years) are not checked.
    pub fn from_segments(year: &str, month: &str, day: &str) -> Option<Self> {
        if !is_digits(year, 4) || !is_digits(month, 2) || !is_digits(day, 2) {
            return None;
        }
        let m: u32 = month.parse().ok()?;
        let d: u32 = day.parse().ok()?;
        if !(1..=12).contains(&m) || !(1..=31).contains(&d) {
            return None;
        }
        Some(Self {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
        })
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    /// `YYYY/MM/DD` relative to the vault root.
    pub fn relative_path(&self) -> PathBuf {
        [&self.year, &self.month, &self.day].iter().collect()
    }
}

impl fmt::Display for DatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

impl Serialize for DatePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Subtree filter for fuzzy search: `YYYY`, `YYYY/MM` or `YYYY/MM/DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateScope {
    segments: Vec<String>,
}

impl DateScope {
    /// Returns `None` for anything that is not a coarse-or-fine date;
    /// callers then search the whole vault. Hyphens are accepted in place
    /// of slashes.
    pub fn parse(input: &str) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"^(\d{4})(?:[/-](\d{2})(?:[/-](\d{2}))?)?$").expect("valid date scope regex")
        });
        let caps = re.captures(input.trim())?;
        let segments = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str().to_string())
            .collect();
        Some(Self { segments })
    }

    pub fn relative_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

fn is_digits(s: &str, width: usize) -> bool {
    s.len() == width && s.bytes().all(|b| b.is_ascii_digit())
}

/// A name that stays a single path component once joined onto a directory.
pub(crate) fn is_plain_segment(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_well_formed_dates() {
        for raw in ["2025-03-23", "1999-12-31", "2024-02-30", "2025-01-01"] {
            let date = DatePath::parse(raw).unwrap();
            assert_eq!(date.to_string(), raw);
            let again = DatePath::parse(&date.to_string()).unwrap();
            assert_eq!(again, date);
        }
    }

    #[test]
    fn parse_splits_components() {
        let date = DatePath::parse("2025-03-23").unwrap();
        assert_eq!(
            (date.year(), date.month(), date.day()),
            ("2025", "03", "23")
        );
        assert_eq!(date.relative_path(), PathBuf::from("2025/03/23"));
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        for raw in [
            "2025/03/23",
            "2025-03",
            "2025-03-23-01",
            "20250323",
            "",
            "2025--23",
            "..-03-23",
            "2025-0/3-23",
            "2025-03-..",
        ] {
            assert_eq!(
                DatePath::parse(raw),
                Err(ArchiveError::InvalidDateFormat {
                    input: raw.to_string()
                }),
                "{raw}"
            );
        }
    }

    #[test]
    fn parse_leaves_range_checks_to_the_index() {
        // Shape is fine, numbers are not; resolving still succeeds.
        assert!(DatePath::parse("2025-13-40").is_ok());
        assert!(DatePath::parse("abcd-ef-gh").is_ok());
    }

    #[test]
    fn from_segments_enforces_widths_and_bounds() {
        assert!(DatePath::from_segments("2025", "03", "23").is_some());
        assert!(DatePath::from_segments("2025", "02", "31").is_some());
        assert!(DatePath::from_segments("2025", "3", "23").is_none());
        assert!(DatePath::from_segments("25", "03", "23").is_none());
        assert!(DatePath::from_segments("2025", "00", "10").is_none());
        assert!(DatePath::from_segments("2025", "13", "10").is_none());
        assert!(DatePath::from_segments("2025", "12", "00").is_none());
        assert!(DatePath::from_segments("2025", "12", "32").is_none());
        assert!(DatePath::from_segments("2025", "1a", "10").is_none());
    }

    #[test]
    fn ordering_is_by_string_triple() {
        let mut dates = vec![
            DatePath::parse("2025-01-02").unwrap(),
            DatePath::parse("2024-12-31").unwrap(),
            DatePath::parse("2025-01-03").unwrap(),
        ];
        dates.sort();
        let rendered: Vec<String> = dates.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["2024-12-31", "2025-01-02", "2025-01-03"]);
    }

    #[test]
    fn serializes_hyphenated() {
        let date = DatePath::parse("2025-03-23").unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2025-03-23\"");
    }

    #[test]
    fn scope_accepts_coarse_and_fine_dates() {
        let cases = [
            ("2025", "2025"),
            ("2025/03", "2025/03"),
            ("2025/03/23", "2025/03/23"),
            ("2025-03-23", "2025/03/23"),
        ];
        for (raw, expected) in cases {
            let scope = DateScope::parse(raw).unwrap();
            assert_eq!(scope.relative_path(), PathBuf::from(expected), "{raw}");
        }
    }

    #[test]
    fn scope_rejects_other_text() {
        for raw in ["", "yesterday", "2025/3", "2025/03/23/politik", "../2025"] {
            assert!(DateScope::parse(raw).is_none(), "{raw}");
        }
    }
}
