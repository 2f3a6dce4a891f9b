//! Thin HTTP client wrapper around the remote creature-catalog API.
//!
//! Two read endpoints are exposed:
//! - [`ApiClient::list`] — paged entry summaries (`limit`/`offset`)
//! - [`ApiClient::fetch`] — single-entity lookup by numeric id or name
//!
//! The client performs no retries; every failure is terminal for the
//! attempt that triggered it.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use pokedex_shared::{PagedResponse, Pokemon, PokedexError, Result};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("Pokedex/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// LookupKey
// ---------------------------------------------------------------------------

/// Key for the single-entity endpoint: numeric id or lowercase name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Id(u32),
    Name(String),
}

impl LookupKey {
    /// Build a name key, lowercasing as the remote API requires.
    pub fn name(name: &str) -> Self {
        Self::Name(name.to_lowercase())
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// HTTP client for the remote catalog API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `https://pokeapi.co/api/v2`).
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| PokedexError::config(format!("invalid API base URL '{base_url}': {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PokedexError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Fetch one page of entry summaries.
    #[instrument(skip(self))]
    pub async fn list(&self, limit: u32, offset: u32) -> Result<PagedResponse> {
        let url = self.endpoint(&format!("pokemon?limit={limit}&offset={offset}"))?;
        debug!(%url, "fetching catalog page");

        let response = self.get_success(&url).await?;
        response
            .json::<PagedResponse>()
            .await
            .map_err(|e| PokedexError::decode(format!("{url}: {e}")))
    }

    /// Fetch the full details of a single entry by id or name.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn fetch(&self, key: &LookupKey) -> Result<Pokemon> {
        let url = self.endpoint(&format!("pokemon/{key}"))?;
        debug!(%url, "fetching catalog entry");

        let response = self.get_success(&url).await?;
        response
            .json::<Pokemon>()
            .await
            .map_err(|e| PokedexError::decode(format!("{url}: {e}")))
    }

    async fn get_success(&self, url: &Url) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url.as_str())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| PokedexError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PokedexError::Network(format!("{url}: HTTP {status}")));
        }

        Ok(response)
    }

    fn endpoint(&self, path_and_query: &str) -> Result<Url> {
        // A host-only base renders with a trailing slash; trim it so the
        // joined path never starts with "//".
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{path_and_query}"))
            .map_err(|e| PokedexError::validation(format!("bad endpoint '{path_and_query}': {e}")))
    }
}

// ---------------------------------------------------------------------------
// Summary URL parsing
// ---------------------------------------------------------------------------

static ID_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)/?$").expect("valid id regex"));

/// Extract the numeric id from a summary URL (`.../pokemon/25/` → `25`).
pub fn id_from_url(url: &str) -> Option<u32> {
    ID_SUFFIX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pokemon_body(id: u32, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "height": 7,
            "weight": 69,
            "sprites": {
                "front_default": format!("https://img.example/sprites/{id}.png"),
                "other": {
                    "official-artwork": {
                        "front_default": format!("https://img.example/artwork/{id}.png")
                    }
                }
            },
            "types": [
                {"slot": 1, "type": {"name": "grass", "url": "https://api.example/type/12/"}}
            ]
        })
    }

    #[test]
    fn endpoint_joins_host_root_base_without_double_slash() {
        let client = ApiClient::new("http://127.0.0.1:8080", 5).unwrap();
        let url = client.endpoint("pokemon?limit=2&offset=0").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/pokemon?limit=2&offset=0");

        let client = ApiClient::new("https://pokeapi.co/api/v2/", 5).unwrap();
        let url = client.endpoint("pokemon/25").unwrap();
        assert_eq!(url.as_str(), "https://pokeapi.co/api/v2/pokemon/25");
    }

    #[test]
    fn id_from_url_parses_trailing_id() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/1"), Some(1));
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/"), None);
        assert_eq!(id_from_url("not a url"), None);
    }

    #[tokio::test]
    async fn list_parses_paged_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .and(query_param("limit", "2"))
            .and(query_param("offset", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1302,
                "next": format!("{}/pokemon?offset=2&limit=2", server.uri()),
                "previous": null,
                "results": [
                    {"name": "bulbasaur", "url": format!("{}/pokemon/1/", server.uri())},
                    {"name": "ivysaur", "url": format!("{}/pokemon/2/", server.uri())}
                ]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), 5).unwrap();
        let page = client.list(2, 0).await.unwrap();

        assert_eq!(page.count, 1302);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].name, "bulbasaur");
        assert_eq!(id_from_url(&page.results[1].url), Some(2));
    }

    #[tokio::test]
    async fn fetch_by_id_and_name_hit_the_same_endpoint_shape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(1, "bulbasaur")))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/pokemon/bulbasaur"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(1, "bulbasaur")))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), 5).unwrap();

        let by_id = client.fetch(&LookupKey::Id(1)).await.unwrap();
        assert_eq!(by_id.name, "bulbasaur");

        let by_name = client.fetch(&LookupKey::name("Bulbasaur")).await.unwrap();
        assert_eq!(by_name.id, 1);
    }

    #[tokio::test]
    async fn non_success_status_is_a_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon/missingno"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), 5).unwrap();
        let err = client
            .fetch(&LookupKey::name("missingno"))
            .await
            .unwrap_err();

        assert!(matches!(err, PokedexError::Network(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon/25"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), 5).unwrap();
        let err = client.fetch(&LookupKey::Id(25)).await.unwrap_err();
        assert!(matches!(err, PokedexError::Decode { .. }));
    }
}
