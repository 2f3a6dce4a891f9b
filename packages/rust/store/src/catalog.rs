//! Catalog store: incremental page loading, deduplicated caching, and
//! cache-first point lookups.
//!
//! Failure policy is deliberately asymmetric: a list-page failure sets the
//! error state and propagates to the caller, while a per-entry detail
//! failure is logged and the entry omitted from the batch. Point lookups
//! resolve failures as absence.

use std::collections::HashSet;

use tracing::{info, instrument, warn};

use pokedex_api::{ApiClient, LookupKey, id_from_url};
use pokedex_shared::{CatalogSnapshot, Pokemon, Result};
use pokedex_storage::Storage;

/// Paginated, persisted cache of catalog entries.
///
/// Invariant: no two cached entries share an identifier.
pub struct CatalogStore {
    api: ApiClient,
    storage: Storage,
    page_size: u32,
    pokemons: Vec<Pokemon>,
    total_count: u32,
    current_offset: u32,
    is_loading: bool,
    is_loading_more: bool,
    initial_load_complete: bool,
    error: Option<String>,
}

impl CatalogStore {
    /// Create a store, restoring any persisted snapshot from `storage`.
    pub fn new(api: ApiClient, storage: Storage, page_size: u32) -> Self {
        let snapshot = storage.load_catalog().unwrap_or_default();

        let mut store = Self {
            api,
            storage,
            page_size,
            pokemons: snapshot.pokemons,
            total_count: snapshot.total_count,
            current_offset: snapshot.current_offset,
            is_loading: false,
            is_loading_more: false,
            initial_load_complete: snapshot.initial_load_complete,
            error: None,
        };

        // Reconcile a snapshot written before the dedup check existed.
        store.remove_duplicates();
        store
    }

    // -----------------------------------------------------------------------
    // Derived state
    // -----------------------------------------------------------------------

    /// Cached entries in insertion order.
    pub fn entries(&self) -> &[Pokemon] {
        &self.pokemons
    }

    pub fn len(&self) -> usize {
        self.pokemons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemons.is_empty()
    }

    /// Total entries reported by the remote catalog.
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Offset of the next page to fetch.
    pub fn current_offset(&self) -> u32 {
        self.current_offset
    }

    /// Whether the remote catalog holds entries not yet cached.
    pub fn has_more(&self) -> bool {
        (self.pokemons.len() as u32) < self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn initial_load_complete(&self) -> bool {
        self.initial_load_complete
    }

    /// Message of the last list-page failure, cleared on the next load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // -----------------------------------------------------------------------
    // Page loading
    // -----------------------------------------------------------------------

    /// Fetch the first page and mark the initial load complete, on success
    /// or failure. A list-fetch error is recorded and propagated.
    #[instrument(skip(self))]
    pub async fn load_initial_batch(&mut self) -> Result<()> {
        let result = self.load_page(self.page_size, 0, true).await;
        self.initial_load_complete = true;
        self.persist();
        result
    }

    /// Fetch the next page at the current cursor.
    ///
    /// No-op when a load is already in flight or the cache holds every
    /// entry the remote catalog reports.
    #[instrument(skip(self))]
    pub async fn load_more(&mut self) -> Result<()> {
        if self.is_loading_more || !self.has_more() {
            return Ok(());
        }
        self.load_page(self.page_size, self.current_offset, false).await
    }

    async fn load_page(&mut self, limit: u32, offset: u32, initial: bool) -> Result<()> {
        if initial {
            self.is_loading = true;
        } else {
            self.is_loading_more = true;
        }
        self.error = None;

        let outcome = self.fetch_page(limit, offset).await;

        self.is_loading = false;
        self.is_loading_more = false;

        match outcome {
            Ok(added) => {
                info!(added, offset, cached = self.pokemons.len(), "page loaded");
                self.persist();
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch one page of summaries, then their details concurrently.
    ///
    /// A detail failure omits that entry without failing the batch; the
    /// cursor advances only after the joint detail wait resolves.
    async fn fetch_page(&mut self, limit: u32, offset: u32) -> Result<usize> {
        let page = self.api.list(limit, offset).await?;
        self.total_count = page.count;

        let mut handles = Vec::new();
        for summary in page.results {
            let key = match id_from_url(&summary.url) {
                // Already cached entries are not re-fetched.
                Some(id) if self.contains(id) => continue,
                Some(id) => LookupKey::Id(id),
                None => LookupKey::name(&summary.name),
            };

            let api = self.api.clone();
            let name = summary.name;
            handles.push(tokio::spawn(async move {
                match api.fetch(&key).await {
                    Ok(pokemon) => Some(pokemon),
                    Err(e) => {
                        warn!(%name, error = %e, "detail fetch failed, omitting entry");
                        None
                    }
                }
            }));
        }

        let mut added = 0;
        for handle in handles {
            match handle.await {
                Ok(Some(pokemon)) => {
                    if self.add_to_cache(pokemon) {
                        added += 1;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "detail task panicked, omitting entry"),
            }
        }

        self.current_offset = offset + limit;
        Ok(added)
    }

    // -----------------------------------------------------------------------
    // Point lookups
    // -----------------------------------------------------------------------

    /// Look up an entry by exact name, case-insensitively, consulting the
    /// cache first. A remote miss or failure resolves to `None`.
    #[instrument(skip(self))]
    pub async fn search_by_name(&mut self, name: &str) -> Option<Pokemon> {
        let query = name.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = self
            .pokemons
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(query))
        {
            return Some(cached.clone());
        }

        match self.api.fetch(&LookupKey::name(query)).await {
            Ok(pokemon) => {
                self.add_to_cache(pokemon.clone());
                self.persist();
                Some(pokemon)
            }
            Err(e) => {
                warn!(name = query, error = %e, "entry not found");
                None
            }
        }
    }

    /// Look up an entry by identifier, consulting the cache first.
    /// A remote failure resolves to `None`.
    #[instrument(skip(self))]
    pub async fn get_by_id(&mut self, id: u32) -> Option<Pokemon> {
        if let Some(cached) = self.pokemons.iter().find(|p| p.id == id) {
            return Some(cached.clone());
        }

        match self.api.fetch(&LookupKey::Id(id)).await {
            Ok(pokemon) => {
                self.add_to_cache(pokemon.clone());
                self.persist();
                Some(pokemon)
            }
            Err(e) => {
                warn!(id, error = %e, "entry not found");
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Cache maintenance
    // -----------------------------------------------------------------------

    fn contains(&self, id: u32) -> bool {
        self.pokemons.iter().any(|p| p.id == id)
    }

    /// Append an entry unless its id is already cached.
    /// Returns whether the entry was inserted.
    fn add_to_cache(&mut self, pokemon: Pokemon) -> bool {
        if self.contains(pokemon.id) {
            return false;
        }
        self.pokemons.push(pokemon);
        true
    }

    /// Rebuild the cache with duplicates removed, keeping the first
    /// occurrence of each id in order.
    pub fn remove_duplicates(&mut self) {
        let mut seen = HashSet::new();
        self.pokemons.retain(|p| seen.insert(p.id));
    }

    /// Reset the cache, cursor, and flags, and persist the empty state.
    pub fn clear(&mut self) {
        self.pokemons.clear();
        self.total_count = 0;
        self.current_offset = 0;
        self.initial_load_complete = false;
        self.error = None;
        self.persist();
    }

    /// Write the snapshot through to storage. A write failure is logged
    /// and does not fail the mutation that triggered it.
    fn persist(&self) {
        let snapshot = CatalogSnapshot {
            pokemons: self.pokemons.clone(),
            total_count: self.total_count,
            current_offset: self.current_offset,
            initial_load_complete: self.initial_load_complete,
        };
        if let Err(e) = self.storage.save_catalog(&snapshot) {
            warn!(error = %e, "failed to persist catalog snapshot");
        }
    }

    /// Force the in-flight guard, to verify the no-op path in tests.
    #[cfg(test)]
    fn set_loading_more(&mut self, value: bool) {
        self.is_loading_more = value;
    }
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
            "sprites": {"front_default": format!("https://img.example/{id}.png")},
            "types": [
                {"slot": 1, "type": {"name": "normal", "url": "https://api.example/type/1/"}}
            ]
        })
    }

    fn list_body(server_uri: &str, count: u32, entries: &[(u32, &str)]) -> serde_json::Value {
        json!({
            "count": count,
            "next": null,
            "previous": null,
            "results": entries
                .iter()
                .map(|(id, name)| json!({
                    "name": name,
                    "url": format!("{server_uri}/pokemon/{id}/")
                }))
                .collect::<Vec<_>>()
        })
    }

    async fn mount_list(server: &MockServer, offset: u32, count: u32, entries: &[(u32, &str)]) {
        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(list_body(&server.uri(), count, entries)),
            )
            .mount(server)
            .await;
    }

    async fn mount_detail(server: &MockServer, id: u32, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/pokemon/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(id, name)))
            .mount(server)
            .await;
    }

    fn store_for(server: &MockServer, dir: &tempfile::TempDir, page_size: u32) -> CatalogStore {
        let api = ApiClient::new(&server.uri(), 5).unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        CatalogStore::new(api, storage, page_size)
    }

    #[tokio::test]
    async fn initial_batch_populates_cache_and_advances_cursor() {
        let server = MockServer::start().await;
        mount_list(&server, 0, 4, &[(1, "bulbasaur"), (2, "ivysaur")]).await;
        mount_detail(&server, 1, "bulbasaur").await;
        mount_detail(&server, 2, "ivysaur").await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);

        store.load_initial_batch().await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.total_count(), 4);
        assert_eq!(store.current_offset(), 2);
        assert!(store.initial_load_complete());
        assert!(store.has_more());
        assert!(store.error().is_none());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn overlapping_pages_never_duplicate_ids() {
        let server = MockServer::start().await;
        mount_list(&server, 0, 3, &[(1, "bulbasaur"), (2, "ivysaur")]).await;
        mount_list(&server, 2, 3, &[(2, "ivysaur"), (3, "venusaur")]).await;
        mount_detail(&server, 1, "bulbasaur").await;
        mount_detail(&server, 3, "venusaur").await;

        // The cached entry must not be re-fetched on the second page.
        Mock::given(method("GET"))
            .and(path("/pokemon/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(2, "ivysaur")))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);

        store.load_initial_batch().await.unwrap();
        store.load_more().await.unwrap();

        assert_eq!(store.len(), 3);
        let ids: Vec<u32> = store.entries().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.current_offset(), 4);
        assert!(!store.has_more());
    }

    #[tokio::test]
    async fn detail_failure_omits_entry_but_batch_succeeds() {
        let server = MockServer::start().await;
        mount_list(&server, 0, 2, &[(1, "bulbasaur"), (99, "glitch")]).await;
        mount_detail(&server, 1, "bulbasaur").await;

        Mock::given(method("GET"))
            .and(path("/pokemon/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);

        store.load_initial_batch().await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.initial_load_complete());
        assert!(store.error().is_none());
        // Cursor still advances past the failed entry's page.
        assert_eq!(store.current_offset(), 2);
    }

    #[tokio::test]
    async fn list_failure_sets_error_and_still_completes_initial_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);

        let result = store.load_initial_batch().await;

        assert!(result.is_err());
        assert!(store.initial_load_complete());
        assert!(store.error().unwrap().contains("500"));
        assert!(store.is_empty());
        assert_eq!(store.current_offset(), 0);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn load_more_is_noop_when_cache_holds_everything() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(list_body(&server.uri(), 1, &[(1, "bulbasaur")])),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_detail(&server, 1, "bulbasaur").await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);

        store.load_initial_batch().await.unwrap();
        assert!(!store.has_more());

        // Verified by the expect(1) above: no further list requests.
        store.load_more().await.unwrap();
        store.load_more().await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn load_more_is_noop_while_a_load_is_in_flight() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(list_body(&server.uri(), 5, &[(1, "bulbasaur")])),
            )
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);
        store.set_loading_more(true);

        store.load_more().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_fetches_remotely_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon/pikachu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(25, "pikachu")))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);

        let first = store.search_by_name("PIKACHU").await.expect("found");
        let second = store.search_by_name("pikachu").await.expect("cached");

        assert_eq!(first.id, 25);
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn search_miss_resolves_to_absence() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/missingno"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);

        assert!(store.search_by_name("missingno").await.is_none());
        assert!(store.search_by_name("   ").await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn get_by_id_consults_cache_before_remote() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon/25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pokemon_body(25, "pikachu")))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);

        assert_eq!(store.get_by_id(25).await.expect("fetched").name, "pikachu");
        assert_eq!(store.get_by_id(25).await.expect("cached").id, 25);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_survives_a_restart() {
        let server = MockServer::start().await;
        mount_list(&server, 0, 4, &[(1, "bulbasaur"), (2, "ivysaur")]).await;
        mount_detail(&server, 1, "bulbasaur").await;
        mount_detail(&server, 2, "ivysaur").await;

        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = store_for(&server, &dir, 2);
            store.load_initial_batch().await.unwrap();
        }

        let restored = store_for(&server, &dir, 2);
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.total_count(), 4);
        assert_eq!(restored.current_offset(), 2);
        assert!(restored.initial_load_complete());
    }

    #[tokio::test]
    async fn duplicated_snapshot_is_reconciled_on_load() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let duplicated: Pokemon = serde_json::from_value(pokemon_body(7, "squirtle")).unwrap();
        let snapshot = CatalogSnapshot {
            pokemons: vec![duplicated.clone(), duplicated],
            total_count: 4,
            current_offset: 2,
            initial_load_complete: true,
        };
        Storage::open(dir.path())
            .unwrap()
            .save_catalog(&snapshot)
            .unwrap();

        let store = store_for(&server, &dir, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].id, 7);
    }

    #[tokio::test]
    async fn clear_resets_state_and_persists() {
        let server = MockServer::start().await;
        mount_list(&server, 0, 1, &[(1, "bulbasaur")]).await;
        mount_detail(&server, 1, "bulbasaur").await;

        let dir = tempfile::tempdir().unwrap();
        let mut store = store_for(&server, &dir, 2);
        store.load_initial_batch().await.unwrap();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.current_offset(), 0);
        assert!(!store.initial_load_complete());

        let restored = store_for(&server, &dir, 2);
        assert!(restored.is_empty());
        assert!(!restored.initial_load_complete());
    }
}
