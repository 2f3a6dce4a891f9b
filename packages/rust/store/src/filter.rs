//! Pure view-layer filters, recomputed from current state.
//!
//! The displayed list is always a filtered view of the deduplicated cache;
//! nothing here mutates state or touches the network.

use pokedex_shared::Pokemon;

/// Case-insensitive substring filter by entry name.
///
/// An empty (or whitespace-only) query matches everything.
pub fn filter_by_name<'a>(
    entries: impl IntoIterator<Item = &'a Pokemon>,
    query: &str,
) -> Vec<&'a Pokemon> {
    let needle = query.trim().to_lowercase();
    entries
        .into_iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Keep only entries whose id satisfies the favorites predicate.
pub fn filter_favorites<'a>(
    entries: impl IntoIterator<Item = &'a Pokemon>,
    is_favorite: impl Fn(u32) -> bool,
) -> Vec<&'a Pokemon> {
    entries.into_iter().filter(|p| is_favorite(p.id)).collect()
}
