//! Pokédex CLI — browse, search, and favorite creature-catalog entries.
//!
//! Wraps the catalog and favorites stores in list/show/search/fav
//! subcommands, with persisted state under `~/.pokedex/`.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
