//! Client-side state stores for the Pokédex.
//!
//! This crate provides:
//! - [`CatalogStore`] — paginated, deduplicated cache of catalog entries
//!   with cache-first point lookups and persisted snapshots
//! - [`FavoritesStore`] — persisted set of favorited identifiers
//! - [`filter`] — pure view-layer filter helpers

pub mod catalog;
pub mod favorites;
pub mod filter;

pub use catalog::CatalogStore;
pub use favorites::FavoritesStore;
pub use filter::{filter_by_name, filter_favorites};
