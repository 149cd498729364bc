//! Entity list managers: load a collection, enrich each member with
//! document statistics fetched concurrently, cache the composite, and
//! guard against stale loads with a generation counter.

use api_client::models::{DocumentStats, Driver, Vehicle};
use api_client::ApiClient;
use async_trait::async_trait;
use client_core::cache::TtlCache;
use client_core::diagnostics::SharedDiagnostics;
use client_core::error::ApiError;
use client_core::retry::{retry_with_backoff, RetryConfig};
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Stats cache shared between a list manager and the document browser
/// so deletions invalidate both views.
pub type SharedStatsCache = Arc<Mutex<TtlCache<DocumentStats>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Drivers,
    Vehicles,
    Other,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Drivers => "drivers",
            EntityKind::Vehicles => "vehicles",
            EntityKind::Other => "other",
        }
    }
}

/// Minimal view of an entity the list layer needs: identity, a display
/// name, and the text the search box matches against.
pub trait EntityRecord: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn display_name(&self) -> &str;
    fn search_haystack(&self) -> String;
}

impl EntityRecord for Driver {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.full_name
    }

    fn search_haystack(&self) -> String {
        let mut haystack = self.full_name.clone();
        if let Some(phone) = &self.phone {
            haystack.push(' ');
            haystack.push_str(phone);
        }
        if let Some(national_id) = &self.national_id {
            haystack.push(' ');
            haystack.push_str(national_id);
        }
        haystack
    }
}

impl EntityRecord for Vehicle {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        self.license_plate.as_deref().unwrap_or(&self.id)
    }

    fn search_haystack(&self) -> String {
        [
            self.license_plate.as_deref(),
            self.make.as_deref(),
            self.model.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Where a manager's base collection comes from. One implementation per
/// entity type, injected at construction.
#[async_trait]
pub trait EntitySource: Send + Sync {
    type Item: EntityRecord;

    fn kind(&self) -> EntityKind;
    /// Fixed composite cache key, e.g. `drivers_with_docs`.
    fn cache_key(&self) -> &'static str;
    async fn fetch(&self, api: &ApiClient) -> Result<Vec<Self::Item>, ApiError>;
}

pub struct DriverSource;

#[async_trait]
impl EntitySource for DriverSource {
    type Item = Driver;

    fn kind(&self) -> EntityKind {
        EntityKind::Drivers
    }

    fn cache_key(&self) -> &'static str {
        "drivers_with_docs"
    }

    async fn fetch(&self, api: &ApiClient) -> Result<Vec<Driver>, ApiError> {
        api.drivers().await
    }
}

pub struct VehicleSource;

#[async_trait]
impl EntitySource for VehicleSource {
    type Item = Vehicle;

    fn kind(&self) -> EntityKind {
        EntityKind::Vehicles
    }

    fn cache_key(&self) -> &'static str {
        "vehicles_with_docs"
    }

    async fn fetch(&self, api: &ApiClient) -> Result<Vec<Vehicle>, ApiError> {
        api.vehicles().await
    }
}

#[derive(Debug, Clone)]
pub struct EntityWithDocs<T> {
    pub record: T,
    pub stats: DocumentStats,
}

/// Result of a load: fresh data, or a completion that lost the race to
/// a newer load and was discarded.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    Fresh(Vec<EntityWithDocs<T>>),
    Superseded,
}

pub struct EntityListManager<S: EntitySource> {
    source: S,
    api: Arc<ApiClient>,
    retry: RetryConfig,
    diagnostics: SharedDiagnostics,
    composite_cache: Mutex<TtlCache<Vec<EntityWithDocs<S::Item>>>>,
    stats_cache: SharedStatsCache,
    // Monotonic load ticket; completions from older tickets are stale.
    generation: AtomicU64,
    state: Mutex<Vec<EntityWithDocs<S::Item>>>,
}

impl<S: EntitySource> EntityListManager<S> {
    pub fn new(
        source: S,
        api: Arc<ApiClient>,
        retry: RetryConfig,
        diagnostics: SharedDiagnostics,
    ) -> Self {
        Self {
            source,
            api,
            retry,
            diagnostics,
            composite_cache: Mutex::new(TtlCache::with_defaults()),
            stats_cache: Arc::new(Mutex::new(TtlCache::with_defaults())),
            generation: AtomicU64::new(0),
            state: Mutex::new(Vec::new()),
        }
    }

    /// The per-member stats cache, for sharing with a [`DocumentBrowser`]
    /// so both views invalidate together.
    ///
    /// [`DocumentBrowser`]: crate::browser::DocumentBrowser
    pub fn stats_cache(&self) -> SharedStatsCache {
        Arc::clone(&self.stats_cache)
    }

    /// Load the collection with enriched document statistics.
    ///
    /// Cache hit renders immediately. On a miss the base collection is
    /// fetched with retry, then one stats request per member runs
    /// concurrently; individual stats failures are swallowed to zeroed
    /// stats so a single member can never fail the whole load. A load
    /// that is superseded by a newer one before finishing is discarded.
    pub async fn load(&self) -> Result<LoadOutcome<S::Item>, ApiError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let key = self.source.cache_key();

        if let Some(cached) = self.composite_cache.lock().await.get(key).cloned() {
            *self.state.lock().await = cached.clone();
            return Ok(LoadOutcome::Fresh(cached));
        }

        let records = match retry_with_backoff(&self.retry, key, || self.source.fetch(&self.api))
            .await
        {
            Ok(records) => records,
            Err(e) => {
                if let Ok(mut log) = self.diagnostics.lock() {
                    log.record_error(key, e.to_string());
                }
                return Err(e);
            }
        };

        let kind = self.source.kind().as_str();
        let tasks = records.iter().map(|record| {
            let api = Arc::clone(&self.api);
            let stats_cache = Arc::clone(&self.stats_cache);
            let diagnostics = Arc::clone(&self.diagnostics);
            let id = record.id().to_string();
            async move {
                let stats_key = stats_key(kind, &id);
                if let Some(stats) = stats_cache.lock().await.get(&stats_key).cloned() {
                    return stats;
                }
                match api.documents_for_entity(kind, &id).await {
                    Ok(response) => {
                        stats_cache
                            .lock()
                            .await
                            .set(stats_key, response.stats.clone());
                        response.stats
                    }
                    Err(e) => {
                        tracing::warn!(
                            entity_type = kind,
                            entity_id = %id,
                            error = %e,
                            "document stats fetch failed, defaulting to zero"
                        );
                        if let Ok(mut log) = diagnostics.lock() {
                            log.record_error(stats_key, e.to_string());
                        }
                        DocumentStats::default()
                    }
                }
            }
        });
        let stats = join_all(tasks).await;

        let enriched: Vec<EntityWithDocs<S::Item>> = records
            .into_iter()
            .zip(stats)
            .map(|(record, stats)| EntityWithDocs { record, stats })
            .collect();

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(key, generation, "discarding superseded load");
            return Ok(LoadOutcome::Superseded);
        }

        self.composite_cache
            .lock()
            .await
            .set(key, enriched.clone());
        *self.state.lock().await = enriched.clone();
        Ok(LoadOutcome::Fresh(enriched))
    }

    /// Case-insensitive substring filter over the loaded collection.
    /// Callers debounce keystrokes with `client_core::format::Debouncer`.
    pub async fn filter(&self, query: &str) -> Vec<EntityWithDocs<S::Item>> {
        let state = self.state.lock().await;
        if query.trim().is_empty() {
            return state.clone();
        }
        let needle = query.to_lowercase();
        state
            .iter()
            .filter(|e| e.record.search_haystack().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Drop the composite entry and every member stats entry for this
    /// collection. Called after any mutation that could leave them stale.
    pub async fn invalidate(&self) {
        self.composite_cache.lock().await.remove(self.source.cache_key());
        let prefix = format!("docstats_{}_", self.source.kind().as_str());
        self.stats_cache
            .lock()
            .await
            .remove_where(|k| k.starts_with(&prefix));
    }
}

pub(crate) fn stats_key(kind: &str, id: &str) -> String {
    format!("docstats_{}_{}", kind, id)
}
