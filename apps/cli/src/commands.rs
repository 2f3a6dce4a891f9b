//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pokedex_api::ApiClient;
use pokedex_shared::{AppConfig, Pokemon, data_dir, init_config, load_config};
use pokedex_storage::Storage;
use pokedex_store::{CatalogStore, FavoritesStore};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Pokédex — browse the creature catalog from your terminal.
#[derive(Parser)]
#[command(
    name = "pokedex",
    version,
    about = "Browse, search, and favorite entries from the public creature catalog.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Load catalog pages and print the cached entries.
    List {
        /// Number of pages to load (initial batch plus N-1 "load more" rounds).
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },

    /// Show one entry by numeric id or name.
    Show {
        /// Numeric id or entry name.
        query: String,
    },

    /// Search for an entry by name (cache first, then the remote catalog).
    Search {
        /// Entry name, any casing.
        name: String,
    },

    /// Manage favorites.
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },

    /// Manage the local catalog cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Favorites subcommands.
#[derive(Subcommand)]
pub(crate) enum FavAction {
    /// Add an id to the favorites.
    Add { id: u32 },
    /// Remove an id from the favorites.
    Remove { id: u32 },
    /// Toggle an id in the favorites.
    Toggle { id: u32 },
    /// List favorited entries.
    List,
    /// Remove all favorites.
    Clear,
}

/// Cache subcommands.
#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// Print cache statistics.
    Stats,
    /// Drop the persisted catalog cache and cursor.
    Clear,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pokedex=info",
        1 => "pokedex=debug",
        _ => "pokedex=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::List { pages } => cmd_list(pages).await,
        Command::Show { query } => cmd_show(&query).await,
        Command::Search { name } => cmd_search(&name).await,
        Command::Fav { action } => cmd_fav(action).await,
        Command::Cache { action } => cmd_cache(action).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Build the stores from the resolved config.
fn open_stores(config: &AppConfig) -> Result<(CatalogStore, FavoritesStore)> {
    let api = ApiClient::new(&config.api.base_url, config.api.timeout_secs)?;
    let storage = Storage::open(&data_dir(config)?)?;
    let catalog = CatalogStore::new(api, storage.clone(), config.catalog.page_size);
    let favorites = FavoritesStore::new(storage);
    Ok((catalog, favorites))
}

fn spinner(msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    bar.set_message(msg.to_string());
    bar
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_list(pages: u32) -> Result<()> {
    let config = load_config()?;
    let (mut catalog, favorites) = open_stores(&config)?;

    info!(pages, cached = catalog.len(), "loading catalog pages");

    let bar = spinner("Loading catalog…");
    let mut result = catalog.load_initial_batch().await;

    for page in 1..pages {
        if result.is_err() || !catalog.has_more() {
            break;
        }
        bar.set_message(format!("Loading page {}…", page + 1));
        result = catalog.load_more().await;
    }
    bar.finish_and_clear();

    if let Err(e) = result {
        return Err(eyre!("catalog load failed: {e}"));
    }

    println!();
    println!("  {:>5}  {:<14} {:<22} FAV", "ID", "NAME", "TYPES");
    for entry in catalog.entries() {
        let fav = if favorites.is_favorite(entry.id) { "★" } else { "" };
        println!(
            "  {:>5}  {:<14} {:<22} {fav}",
            entry.id,
            entry.name,
            entry.type_names().join(", "),
        );
    }
    println!();
    println!(
        "  {} of {} entries cached (next offset {})",
        catalog.len(),
        catalog.total_count(),
        catalog.current_offset(),
    );
    println!();

    Ok(())
}

async fn cmd_show(query: &str) -> Result<()> {
    let config = load_config()?;
    let (mut catalog, favorites) = open_stores(&config)?;

    let found = match query.parse::<u32>() {
        Ok(id) => catalog.get_by_id(id).await,
        Err(_) => catalog.search_by_name(query).await,
    };

    match found {
        Some(entry) => {
            print_entry(&entry, favorites.is_favorite(entry.id));
            Ok(())
        }
        None => Err(eyre!("no entry found for '{query}'")),
    }
}

async fn cmd_search(name: &str) -> Result<()> {
    let config = load_config()?;
    let (mut catalog, _) = open_stores(&config)?;

    match catalog.search_by_name(name).await {
        Some(entry) => {
            println!("  #{} {}", entry.id, entry.name);
            Ok(())
        }
        None => {
            println!("  no entry named '{name}'");
            Ok(())
        }
    }
}

fn print_entry(entry: &Pokemon, is_favorite: bool) {
    println!();
    println!("  Name:     {}{}", entry.name, if is_favorite { " ★" } else { "" });
    println!("  ID:       {}", entry.id);
    println!("  Height:   {} dm", entry.height);
    println!("  Weight:   {} hg", entry.weight);
    println!("  Types:    {}", entry.type_names().join(", "));
    if let Some(url) = entry.artwork_url() {
        println!("  Artwork:  {url}");
    }
    println!();
}

async fn cmd_fav(action: FavAction) -> Result<()> {
    let config = load_config()?;
    let (mut catalog, mut favorites) = open_stores(&config)?;

    match action {
        FavAction::Add { id } => {
            if favorites.add(id) {
                println!("  ★ added {id}");
            } else {
                println!("  {id} is already a favorite");
            }
        }
        FavAction::Remove { id } => {
            if favorites.remove(id) {
                println!("  removed {id}");
            } else {
                println!("  {id} was not a favorite");
            }
        }
        FavAction::Toggle { id } => {
            if favorites.toggle(id) {
                println!("  ★ added {id}");
            } else {
                println!("  removed {id}");
            }
        }
        FavAction::List => {
            if !favorites.has_favorites() {
                println!("  no favorites yet");
                return Ok(());
            }
            println!("  {} favorite(s):", favorites.count());
            for id in favorites.ids().to_vec() {
                // Favorites may point at entries never cached locally.
                match catalog.get_by_id(id).await {
                    Some(entry) => println!("  ★ #{:>4} {}", entry.id, entry.name),
                    None => println!("  ★ #{id:>4} (unavailable)"),
                }
            }
        }
        FavAction::Clear => {
            favorites.clear();
            println!("  favorites cleared");
        }
    }

    Ok(())
}

async fn cmd_cache(action: CacheAction) -> Result<()> {
    let config = load_config()?;
    let (mut catalog, _) = open_stores(&config)?;

    match action {
        CacheAction::Stats => {
            println!();
            println!("  Cached entries:   {}", catalog.len());
            println!("  Remote total:     {}", catalog.total_count());
            println!("  Next offset:      {}", catalog.current_offset());
            println!("  Initial load:     {}", catalog.initial_load_complete());
            println!();
        }
        CacheAction::Clear => {
            catalog.clear();
            println!("  catalog cache cleared");
        }
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
