//! Article tools: the vault queries exposed to an LLM runtime.
//!
//! Query failures (bad date, unknown category, empty folder) come back as a
//! `ToolOutput` with `success: false` and a readable message. Missing or
//! malformed parameters are `Err`, as is a missing vault during fuzzy search.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use newsvault_archive::{ArchiveError, Category, SampleOptions, SearchQuery, Vault, resolve_date};

use crate::{ParamType, Tool, ToolMetadata, ToolOutput, ToolParam, ToolSpec};

fn arg<'a>(args: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    args.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn require<'a>(args: &'a HashMap<String, String>, name: &str) -> Result<&'a str> {
    arg(args, name).ok_or_else(|| anyhow!("missing required param: {name}"))
}

fn parse_arg<T>(args: &HashMap<String, String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    arg(args, name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|err| anyhow!("invalid value for {name}: '{raw}' ({err})"))
        })
        .transpose()
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<ToolOutput> {
    Ok(ToolOutput::ok(serde_json::to_string_pretty(value)?))
}

fn query_failed(tool: &str, err: ArchiveError) -> ToolOutput {
    info!(tool, error = %err, "article query failed");
    ToolOutput::failed(err.to_string())
}

fn category_slugs(categories: &[Category]) -> Vec<&'static str> {
    categories.iter().map(|c| c.slug()).collect()
}

fn archive_metadata(examples: &[&str]) -> ToolMetadata {
    ToolMetadata {
        read_only: true,
        group: "archive".to_string(),
        examples: examples.iter().map(|e| e.to_string()).collect(),
    }
}

fn category_param(description: &str) -> ToolParam {
    ToolParam::optional("category", description).with_enum(category_slugs(&Category::ALL))
}

// ── read_article ─────────────────────────────────────────────────────────────

/// Reads one article, either by path or by sampling a date and category.
pub struct ReadArticleTool {
    pub vault: Arc<Vault>,
    pub options: SampleOptions,
}

#[async_trait]
impl Tool for ReadArticleTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "read_article".to_string(),
            description: "Read the full text of a news article. Give `path` to read a file \
                          found by search or listing; otherwise a random available article is \
                          picked, optionally narrowed to a date and category."
                .to_string(),
            params: vec![
                ToolParam::optional("path", "Article file path, absolute or relative to the vault root"),
                ToolParam::optional("date", "Date in YYYY-MM-DD format (random when omitted)"),
                ToolParam::optional("category", "Category folder on that date (random when omitted)"),
                ToolParam::optional("max_retries", "Draws attempted before giving up")
                    .with_type(ParamType::Integer)
                    .with_default(self.options.max_retries),
            ],
            metadata: archive_metadata(&[
                "read_article path=2025/03/23/politik/budget-cut.md",
                "read_article date=2025-03-23 category=politik",
            ]),
        }
    }

    async fn run(&self, args: &HashMap<String, String>) -> Result<ToolOutput> {
        if let Some(path) = arg(args, "path") {
            info!(tool = "read_article", path, "reading article by path");
            return Ok(match self.vault.read_article_at(path) {
                Ok(article) => ToolOutput::ok(article.text),
                Err(err) => query_failed("read_article", err),
            });
        }

        let date = arg(args, "date");
        let category = arg(args, "category");
        let options = SampleOptions {
            max_retries: parse_arg(args, "max_retries")?.unwrap_or(self.options.max_retries),
            ..self.options
        };
        info!(tool = "read_article", ?date, ?category, max_retries = options.max_retries, "sampling article");

        let sampled = {
            let mut rng = rand::thread_rng();
            self.vault.sample_article(&mut rng, date, category, options)
        };
        Ok(match sampled {
            Ok(article) => ToolOutput::ok(article.text),
            Err(err) => query_failed("read_article", err),
        })
    }
}

// ── get_available_categories ─────────────────────────────────────────────────

pub struct GetAvailableCategoriesTool {
    pub vault: Arc<Vault>,
}

#[async_trait]
impl Tool for GetAvailableCategoriesTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "get_available_categories".to_string(),
            description: "List the news categories that have articles on a date.".to_string(),
            params: vec![ToolParam::required("date", "Date in YYYY-MM-DD format")],
            metadata: archive_metadata(&["get_available_categories date=2025-03-23"]),
        }
    }

    async fn run(&self, args: &HashMap<String, String>) -> Result<ToolOutput> {
        let raw = require(args, "date")?;
        info!(tool = "get_available_categories", date = raw, "listing categories");
        let categories = match resolve_date(raw).and_then(|date| self.vault.list_categories(&date)) {
            Ok(categories) => categories,
            Err(err) => return Ok(query_failed("get_available_categories", err)),
        };
        json(&category_slugs(&categories))
    }
}

// ── get_dates_and_categories ─────────────────────────────────────────────────

pub struct GetDatesAndCategoriesTool {
    pub vault: Arc<Vault>,
    pub default_limit: usize,
}

#[async_trait]
impl Tool for GetDatesAndCategoriesTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "get_dates_and_categories".to_string(),
            description: "List dates that have articles, newest first, with the categories on \
                          each. Page backwards with `after_date`."
                .to_string(),
            params: vec![
                ToolParam::optional("limit", "Maximum number of dates to return")
                    .with_type(ParamType::Integer)
                    .with_default(self.default_limit),
                ToolParam::optional(
                    "after_date",
                    "Only return dates strictly older than this YYYY-MM-DD date",
                ),
            ],
            metadata: archive_metadata(&[
                "get_dates_and_categories limit=5",
                "get_dates_and_categories limit=5 after_date=2025-03-20",
            ]),
        }
    }

    async fn run(&self, args: &HashMap<String, String>) -> Result<ToolOutput> {
        let limit = parse_arg(args, "limit")?.unwrap_or(self.default_limit);
        let after = arg(args, "after_date");
        info!(tool = "get_dates_and_categories", limit, ?after, "listing dates");

        let entries = match self.vault.list_dates_and_categories(limit, after) {
            Ok(entries) => entries,
            Err(err) => return Ok(query_failed("get_dates_and_categories", err)),
        };
        let mut mapping = Map::new();
        for entry in entries {
            mapping.insert(entry.date.to_string(), Value::from(category_slugs(&entry.categories)));
        }
        json(&mapping)
    }
}

// ── list_articles ────────────────────────────────────────────────────────────

pub struct ListArticlesTool {
    pub vault: Arc<Vault>,
}

#[async_trait]
impl Tool for ListArticlesTool {
    fn spec(&self) -> ToolSpec {
        let mut category = category_param("News category");
        category.required = true;
        ToolSpec {
            name: "list_articles".to_string(),
            description: "List the available articles (title, date, category, path) filed \
                          under a category on a date."
                .to_string(),
            params: vec![ToolParam::required("date", "Date in YYYY-MM-DD format"), category],
            metadata: archive_metadata(&["list_articles date=2025-03-23 category=politik"]),
        }
    }

    async fn run(&self, args: &HashMap<String, String>) -> Result<ToolOutput> {
        let raw_date = require(args, "date")?;
        let category = require(args, "category")?;
        info!(tool = "list_articles", date = raw_date, category, "listing articles");

        match resolve_date(raw_date).and_then(|date| self.vault.list_articles(&date, category)) {
            Ok(articles) => json(&articles),
            Err(err) => Ok(query_failed("list_articles", err)),
        }
    }
}

// ── fuzzy_search_articles ────────────────────────────────────────────────────

pub struct FuzzySearchArticlesTool {
    pub vault: Arc<Vault>,
    pub default_limit: usize,
    pub default_cutoff: f64,
}

#[async_trait]
impl Tool for FuzzySearchArticlesTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "fuzzy_search_articles".to_string(),
            description: "Search article file paths by fuzzy matching. Filter by name, date \
                          or category; leave the others empty. With no query and no category \
                          the first articles found are returned unranked."
                .to_string(),
            params: vec![
                ToolParam::optional("query", "Name or partial name of the article"),
                ToolParam::optional("date", "Date filter as YYYY, YYYY/MM or YYYY/MM/DD"),
                category_param("Category to favour in the ranking"),
                ToolParam::optional("limit", "Maximum number of results")
                    .with_type(ParamType::Integer)
                    .with_default(self.default_limit),
                ToolParam::optional("cutoff", "Minimum similarity score (0-100)")
                    .with_type(ParamType::Number)
                    .with_default(self.default_cutoff),
            ],
            metadata: ToolMetadata {
                group: "search".to_string(),
                ..archive_metadata(&[
                    "fuzzy_search_articles query=\"Purbaya Yudhi Sadewa\" limit=3",
                    "fuzzy_search_articles date=2025/03 category=ekonomi",
                ])
            },
        }
    }

    async fn run(&self, args: &HashMap<String, String>) -> Result<ToolOutput> {
        let query = SearchQuery {
            query: arg(args, "query").map(str::to_string),
            date: arg(args, "date").map(str::to_string),
            category: arg(args, "category").map(str::to_string),
            limit: parse_arg(args, "limit")?.unwrap_or(self.default_limit),
            cutoff: parse_arg(args, "cutoff")?.unwrap_or(self.default_cutoff),
        };
        info!(
            tool = "fuzzy_search_articles",
            query = ?query.query,
            date = ?query.date,
            category = ?query.category,
            limit = query.limit,
            "searching articles"
        );

        // A missing vault is a configuration error, not an empty result.
        let paths = self.vault.search(&query)?;
        let paths: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        json(&paths)
    }
}

// ── get_news_update ──────────────────────────────────────────────────────────

pub struct GetNewsUpdateTool {
    pub vault: Arc<Vault>,
    /// Categories to include; empty means all present.
    pub categories: Vec<Category>,
}

#[async_trait]
impl Tool for GetNewsUpdateTool {
    fn spec(&self) -> ToolSpec {
        let scope = if self.categories.is_empty() {
            "every category".to_string()
        } else {
            category_slugs(&self.categories).join(", ")
        };
        ToolSpec {
            name: "get_news_update".to_string(),
            description: format!(
                "Get the latest news: the articles in {scope} for the most recent date in the \
                 archive, keyed by category."
            ),
            params: Vec::new(),
            metadata: archive_metadata(&["get_news_update"]),
        }
    }

    async fn run(&self, _args: &HashMap<String, String>) -> Result<ToolOutput> {
        info!(tool = "get_news_update", "collecting latest articles");
        let (date, update) = match self.vault.news_update(&self.categories) {
            Ok(found) => found,
            Err(err) => return Ok(query_failed("get_news_update", err)),
        };
        info!(tool = "get_news_update", %date, categories = update.len(), "latest articles collected");

        let mut mapping = Map::new();
        for (category, articles) in update {
            mapping.insert(category.slug().to_string(), serde_json::to_value(articles)?);
        }
        json(&mapping)
    }
}
