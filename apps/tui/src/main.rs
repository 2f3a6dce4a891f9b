//! Pokédex TUI — interactive terminal interface for the creature catalog.
//!
//! Provides the welcome, loading, and list views with search-as-you-type,
//! tab filtering, infinite scroll, and a detail modal, built with
//! `ratatui` + `crossterm`.

mod app;
mod views;
mod widgets;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    app::run()
}
