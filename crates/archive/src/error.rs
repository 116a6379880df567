use thiserror::Error;

use crate::category::allowed_list;

/// Every outcome a vault query can fail with.
///
/// The `Display` text is what the agent layer shows to the model, so each
/// message names the offending date, category or path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("Vault not found: {root}")]
    VaultNotFound { root: String },
    #[error("Invalid date format. Expected YYYY-MM-DD, got: {input}")]
    InvalidDateFormat { input: String },
    #[error("Date path does not exist: {date}")]
    DatePathNotFound { date: String },
    #[error("Category '{category}' not found for date {date}")]
    CategoryNotFound { category: String, date: String },
    #[error("Category '{category}' is not allowed. Expected one of: {}", allowed_list())]
    CategoryNotAllowed { category: String },
    #[error("No dates found in the vault.")]
    NoDatesFound,
    #[error("No categories found for date {date}")]
    NoCategoriesFound { date: String },
    #[error("No files found in category: {dir}")]
    NoFilesFound { dir: String },
    #[error("No readable files found in category: {dir}")]
    NoReadableFilesFound { dir: String },
    #[error("No valid article found after {attempts} attempts in category: {dir}")]
    NoValidArticleFound { attempts: usize, dir: String },
    #[error("Path is outside the vault: {path}")]
    PathOutsideVault { path: String },
    #[error("File not found: {path}")]
    ArticleNotFound { path: String },
    #[error("Error reading file {path}: {detail}")]
    ArticleReadFailed { path: String, detail: String },
}

pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;
