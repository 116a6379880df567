use std::collections::HashMap;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use newsvault_archive::Vault;
use newsvault_config::AppConfig;
use newsvault_tools::{ToolSpec, article_registry, specs_to_openai_tools};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Parser)]
#[command(
    name = "newsvault",
    version,
    about = "Query a dated, categorized news article vault"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Vault root for this run (overrides config and OBSIDIAN_VAULT).
    #[arg(long, global = true)]
    vault: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a config file with default settings.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Show the resolved vault and what it contains.
    Doctor,
    Tool {
        #[command(subcommand)]
        command: ToolCommands,
    },
}

#[derive(Debug, Subcommand)]
enum ToolCommands {
    /// List the registered article tools.
    List {
        /// Only show tools in this group (e.g. archive, search).
        #[arg(long)]
        group: Option<String>,
    },
    /// Execute a tool directly (key=value arguments).
    /// Example: newsvault tool call list_articles date=2025-03-23 category=politik
    Call {
        /// Tool name to invoke
        name: String,
        /// Arguments as key=value pairs (e.g. query="Purbaya" limit=3)
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
    /// Print the OpenAI-compatible `tools` array for every tool.
    Schema,
}

/// Parse `key=value` arguments, warning about anything else.
fn parse_tool_args(items: &[String]) -> HashMap<String, String> {
    let mut parsed = HashMap::new();
    for item in items {
        if let Some((k, v)) = item.split_once('=') {
            parsed.insert(k.to_string(), v.to_string());
        } else {
            eprintln!("warning: skipping malformed arg '{}' (expected key=value)", item);
        }
    }
    parsed
}

/// The `tool list` text: each tool, its parameters, then example calls.
fn render_tool_list(specs: &[ToolSpec]) -> String {
    let mut out = String::from("── registered tools ─────────────────────────────────\n");
    for spec in specs {
        let _ = writeln!(out, "  {} — {}", spec.name, spec.description);
        for p in &spec.params {
            let _ = writeln!(
                out,
                "      {} [{}] — {}",
                p.name,
                if p.required { "required" } else { "optional" },
                p.description
            );
        }
        for example in &spec.metadata.examples {
            let _ = writeln!(out, "      e.g. newsvault tool call {example}");
        }
    }
    let _ = write!(out, "  ({} tools total)", specs.len());
    out
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_doctor(config: &AppConfig, config_path: &Path) {
    let root = config.vault_root();
    let vault = Vault::open(&root);

    println!("newsvault doctor");
    println!(
        "- config: {} ({})",
        config_path.display(),
        if config_path.exists() { "found" } else { "missing, using defaults" }
    );
    if root.as_os_str().is_empty() {
        println!("- vault root: (unset; set vault.root or OBSIDIAN_VAULT)");
    } else {
        println!("- vault root: {}", root.display());
    }
    match vault.list_dates() {
        Ok(dates) => {
            println!("- vault exists: yes");
            println!("- indexed dates: {}", dates.len());
            if let Some(latest) = dates.first() {
                println!("- latest date: {latest}");
            }
        }
        Err(err) => println!("- vault exists: no ({err})"),
    }
    println!("- sampler: max_retries={} date_selection={:?}", config.sampler.max_retries, config.sampler.date_selection);
    println!("- search: limit={} cutoff={}", config.search.limit, config.search.cutoff);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config)?;
    if let Some(root) = cli.vault {
        config.vault.root = root;
    }
    init_tracing(&config);
    debug!(config = %cli.config.display(), vault = %config.vault.root, "loaded configuration");

    match cli.command {
        Commands::Init { force } => {
            if cli.config.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", cli.config.display());
            }
            config.save_to(&cli.config)?;
            println!("wrote {}", cli.config.display());
        }
        Commands::Doctor => run_doctor(&config, &cli.config),
        Commands::Tool { command } => {
            let registry = article_registry(&config)?;
            match command {
                ToolCommands::List { group } => {
                    let names = group.as_deref().map(|g| registry.tools_in_group(g));
                    let specs: Vec<_> = registry
                        .list_specs()
                        .into_iter()
                        .filter(|s| names.as_ref().is_none_or(|n| n.contains(&s.name)))
                        .collect();
                    println!("{}", render_tool_list(&specs));
                }
                ToolCommands::Call { name, args } => {
                    let parsed = parse_tool_args(&args);
                    let Some(tool) = registry.get(&name) else {
                        bail!("unknown tool '{name}' (see `newsvault tool list`)");
                    };
                    match tool.run(&parsed).await {
                        Ok(out) => {
                            let status = if out.success { "succeeded" } else { "failed" };
                            println!("tool '{}' {status}:", name);
                            println!("{}", out.output);
                        }
                        Err(err) => eprintln!("error calling tool '{}': {err}", name),
                    }
                }
                ToolCommands::Schema => {
                    let tools = specs_to_openai_tools(&registry.list_specs());
                    println!("{}", serde_json::to_string_pretty(&tools)?);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_tool_call_with_global_flags() {
        let cli = Cli::try_parse_from([
            "newsvault",
            "--vault",
            "/srv/news",
            "tool",
            "call",
            "list_articles",
            "date=2025-03-23",
            "category=politik",
        ])
        .unwrap();
        assert_eq!(cli.vault.as_deref(), Some("/srv/news"));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        match cli.command {
            Commands::Tool {
                command: ToolCommands::Call { name, args },
            } => {
                assert_eq!(name, "list_articles");
                assert_eq!(args, ["date=2025-03-23", "category=politik"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn tool_list_shows_example_calls() {
        let registry = article_registry(&AppConfig::default()).unwrap();
        let listing = render_tool_list(&registry.list_specs());
        assert!(listing.contains("  list_articles — "));
        assert!(listing.contains("      date [required] — "));
        assert!(listing.contains("      e.g. newsvault tool call list_articles date=2025-03-23 category=politik"));
        assert!(listing.ends_with("(6 tools total)"));
    }

    #[test]
    fn tool_args_split_on_first_equals() {
        let parsed = parse_tool_args(&[
            "query=a=b".to_string(),
            "limit=3".to_string(),
            "garbage".to_string(),
        ]);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["query"], "a=b");
        assert_eq!(parsed["limit"], "3");
    }
}
