use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArchiveError;

/// News desks an article can be filed under.
///
/// Variants are declared in slug order, so the derived `Ord` sorts the same
/// way a lexicographic sort of the directory names would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Arsip,
    Digital,
    Ekonomi,
    GayaHidup,
    Hiburan,
    Hukum,
    InfoTempo,
    Internasional,
    Lingkungan,
    Olahraga,
    Politik,
    Sains,
    Sepakbola,
    Teroka,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Self::Arsip,
        Self::Digital,
        Self::Ekonomi,
        Self::GayaHidup,
        Self::Hiburan,
        Self::Hukum,
        Self::InfoTempo,
        Self::Internasional,
        Self::Lingkungan,
        Self::Olahraga,
        Self::Politik,
        Self::Sains,
        Self::Sepakbola,
        Self::Teroka,
    ];

    /// Directory name of the category inside a date folder.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Arsip => "arsip",
            Self::Digital => "digital",
            Self::Ekonomi => "ekonomi",
            Self::GayaHidup => "gaya-hidup",
            Self::Hiburan => "hiburan",
            Self::Hukum => "hukum",
            Self::InfoTempo => "info-tempo",
            Self::Internasional => "internasional",
            Self::Lingkungan => "lingkungan",
            Self::Olahraga => "olahraga",
            Self::Politik => "politik",
            Self::Sains => "sains",
            Self::Sepakbola => "sepakbola",
            Self::Teroka => "teroka",
        }
    }

    /// Exact, case-sensitive lookup by slug.
    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| ArchiveError::CategoryNotAllowed {
            category: s.to_string(),
        })
    }
}

/// Comma-separated slugs, used in error messages.
pub(crate) fn allowed_list() -> String {
    Category::ALL
        .iter()
        .map(|c| c.slug())
        .collect::<Vec<_>>()
        .join(", ")
}
