//! Core domain types for the Pokédex catalog.
//!
//! The wire-facing structs mirror the PokéAPI JSON shapes so they can be
//! deserialized straight off the response body; the same structs are reused
//! for the persisted catalog snapshot.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pokemon
// ---------------------------------------------------------------------------

/// A single catalog entry, as returned by the single-entity endpoint.
/// Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Positive, unique identifier.
    pub id: u32,
    /// Lowercase display name.
    pub name: String,
    /// Height in decimeters.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    /// Sprite image URLs.
    pub sprites: Sprites,
    /// Category tags with their display order.
    #[serde(default)]
    pub types: Vec<TypeSlot>,
}

impl Pokemon {
    /// Best available artwork URL: official artwork if present, else the
    /// default front sprite.
    pub fn artwork_url(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.as_deref())
            .or(self.sprites.front_default.as_deref())
    }

    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.kind.name.as_str()).collect()
    }
}

/// Sprite URL set. Individual sprites may be null upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<OtherSprites>,
}

/// The `other` sprite group (only the official artwork is of interest).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(
        rename = "official-artwork",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub official_artwork: Option<Artwork>,
}

/// Official artwork sprite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

/// A typed category tag with its display slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// A name + URL reference, the PokéAPI convention for linked resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Paged list response
// ---------------------------------------------------------------------------

/// One entry summary in a paged list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
    /// Lowercase entry name.
    pub name: String,
    /// URL of the single-entity endpoint for this entry.
    pub url: String,
}

/// Response of the paged list endpoint (`?limit=&offset=`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse {
    /// Total number of entries in the remote catalog.
    pub count: u32,
    /// URL of the next page, if any.
    pub next: Option<String>,
    /// URL of the previous page, if any.
    pub previous: Option<String>,
    /// Entry summaries for this page.
    pub results: Vec<EntrySummary>,
}

// ---------------------------------------------------------------------------
// CatalogSnapshot
// ---------------------------------------------------------------------------

/// Persisted subset of the catalog store, written to local storage after
/// loads and read back once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// The deduplicated cache in insertion order.
    pub pokemons: Vec<Pokemon>,
    /// Total entries reported by the remote catalog.
    pub total_count: u32,
    /// Pagination cursor (offset of the next page to fetch).
    pub current_offset: u32,
    /// Whether the initial batch has completed at least once.
    pub initial_load_complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trimmed-down body of GET /pokemon/25, keeping only fields we model.
    const PIKACHU_JSON: &str = r##"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "sprites": {
            "front_default": "https://img.example/sprites/25.png",
            "other": {
                "official-artwork": {
                    "front_default": "https://img.example/artwork/25.png"
                }
            }
        },
        "types": [
            {"slot": 1, "type": {"name": "electric", "url": "https://api.example/type/13/"}}
        ]
    }"##;

    #[test]
    fn pokemon_deserializes_from_api_shape() {
        let p: Pokemon = serde_json::from_str(PIKACHU_JSON).expect("deserialize");
        assert_eq!(p.id, 25);
        assert_eq!(p.name, "pikachu");
        assert_eq!(p.height, 4);
        assert_eq!(p.weight, 60);
        assert_eq!(p.type_names(), vec!["electric"]);
        assert_eq!(
            p.artwork_url(),
            Some("https://img.example/artwork/25.png")
        );
    }

    #[test]
    fn artwork_falls_back_to_front_sprite() {
        let p = Pokemon {
            id: 1,
            name: "bulbasaur".into(),
            height: 7,
            weight: 69,
            sprites: Sprites {
                front_default: Some("https://img.example/sprites/1.png".into()),
                other: None,
            },
            types: vec![],
        };
        assert_eq!(p.artwork_url(), Some("https://img.example/sprites/1.png"));
    }

    #[test]
    fn paged_response_deserializes() {
        let json = r#"{
            "count": 1302,
            "next": "https://api.example/v2/pokemon?offset=10&limit=10",
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://api.example/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://api.example/v2/pokemon/2/"}
            ]
        }"#;
        let page: PagedResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(page.count, 1302);
        assert!(page.previous.is_none());
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].name, "ivysaur");
    }

    #[test]
    fn snapshot_roundtrip() {
        let snapshot = CatalogSnapshot {
            pokemons: vec![serde_json::from_str(PIKACHU_JSON).unwrap()],
            total_count: 1302,
            current_offset: 10,
            initial_load_complete: true,
        };
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let parsed: CatalogSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.pokemons.len(), 1);
        assert_eq!(parsed.pokemons[0].id, 25);
        assert_eq!(parsed.current_offset, 10);
        assert!(parsed.initial_load_complete);
    }
}
