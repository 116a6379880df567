use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `vault.root`.
pub const VAULT_ENV: &str = "OBSIDIAN_VAULT";

// ── Vault ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Absolute path of the vault root (`root/YYYY/MM/DD/<category>/*.md`).
    /// Empty means unset; every query then reports the vault as not found.
    pub root: String,
}

// ── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results returned by `fuzzy_search_articles` when the caller gives no limit.
    pub limit: usize,
    /// Minimum similarity score (0–100) when the caller gives no cutoff.
    pub cutoff: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            cutoff: 75.0,
        }
    }
}

// ── Sampler ──────────────────────────────────────────────────────────────────

/// How a random date is chosen when `read_article` is called without one.
///
/// | Mode      | Behaviour                                                     |
/// |-----------|---------------------------------------------------------------|
/// | `walk`    | Random year folder, then random month, then random day.       |
/// | `uniform` | Uniform pick from every valid date in the index.              |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateSelection {
    #[default]
    Walk,
    Uniform,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Draws attempted before giving up on finding an available article.
    pub max_retries: usize,
    pub date_selection: DateSelection,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_retries: 50,
            date_selection: DateSelection::Walk,
        }
    }
}

// ── Date index ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Page size for `get_dates_and_categories` when the caller gives none.
    pub default_limit: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

// ── News update ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// Category slugs included in `get_news_update`. Empty means every
    /// category present on the latest date.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub vault: VaultConfig,
    pub search: SearchConfig,
    pub sampler: SamplerConfig,
    pub index: IndexConfig,
    pub news: NewsConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load from a TOML file, falling back to defaults when it is missing,
    /// then apply environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = fs::read_to_string(path) {
            config = toml::from_str(&raw)?;
        }

        if let Ok(root) = env::var(VAULT_ENV) {
            if !root.is_empty() {
                config.vault.root = root;
            }
        }

        Ok(config)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// The configured vault root, or an empty path when unset.
    pub fn vault_root(&self) -> PathBuf {
        PathBuf::from(self.vault.root.trim())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
