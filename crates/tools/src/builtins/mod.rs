//! Built-in tool implementations.

mod articles;

pub use articles::{
    FuzzySearchArticlesTool, GetAvailableCategoriesTool, GetDatesAndCategoriesTool,
    GetNewsUpdateTool, ListArticlesTool, ReadArticleTool,
};

use std::sync::Arc;

use anyhow::Result;
use newsvault_archive::{Category, SampleOptions, Vault};
use newsvault_config::AppConfig;

use crate::ToolRegistry;

/// Register every article tool against one shared vault handle.
///
/// Fails when `news.categories` names a category outside the allow-list.
pub fn register_article_tools(
    registry: &mut ToolRegistry,
    vault: Arc<Vault>,
    config: &AppConfig,
) -> Result<()> {
    let news_categories = config
        .news
        .categories
        .iter()
        .map(|slug| slug.trim().parse::<Category>())
        .collect::<Result<Vec<_>, _>>()?;

    registry.register(Box::new(ReadArticleTool {
        vault: vault.clone(),
        options: SampleOptions {
            max_retries: config.sampler.max_retries,
            date_selection: config.sampler.date_selection,
        },
    }));
    registry.register(Box::new(GetAvailableCategoriesTool {
        vault: vault.clone(),
    }));
    registry.register(Box::new(GetDatesAndCategoriesTool {
        vault: vault.clone(),
        default_limit: config.index.default_limit,
    }));
    registry.register(Box::new(ListArticlesTool {
        vault: vault.clone(),
    }));
    registry.register(Box::new(FuzzySearchArticlesTool {
        vault: vault.clone(),
        default_limit: config.search.limit,
        default_cutoff: config.search.cutoff,
    }));
    registry.register(Box::new(GetNewsUpdateTool {
        vault,
        categories: news_categories,
    }));
    Ok(())
}

/// A registry holding the article tools for the vault named in `config`.
pub fn article_registry(config: &AppConfig) -> Result<ToolRegistry> {
    let vault = Arc::new(Vault::open(config.vault_root()));
    let mut registry = ToolRegistry::default();
    register_article_tools(&mut registry, vault, config)?;
    Ok(registry)
}
