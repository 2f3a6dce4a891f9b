//! Shared types, error model, and configuration for the Pokédex client.
//!
//! This crate is the foundation depended on by all other Pokédex crates.
//! It provides:
//! - [`PokedexError`] — the unified error type
//! - Domain types ([`Pokemon`], [`PagedResponse`], [`CatalogSnapshot`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ApiConfig, AppConfig, CatalogConfig, config_dir, config_file_path, data_dir, init_config,
    load_config, load_config_from,
};
pub use error::{PokedexError, Result};
pub use types::{
    Artwork, CatalogSnapshot, EntrySummary, NamedResource, OtherSprites, PagedResponse, Pokemon,
    Sprites, TypeSlot,
};
