// Flight search orchestration: validate, consult the cache, authenticate,
// fetch, normalize, sort, cache. The only component that wires the others
// together.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::{AuthError, TokenManager};
use crate::cache::CacheStore;
use crate::config::ProviderConfig;
use crate::normalize::{normalize_offer, FlightRecord};
use crate::provider::{AmadeusSource, OfferSource, SearchQuery};

/// Search request as submitted by the UI. Round trips are accepted but only
/// the outbound leg is priced; `return_date` participates in the cache key so
/// a one-way and a round-trip search never alias.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub origin: String,
    pub destination: String,
    /// YYYY-MM-DD
    pub departure_date: String,
    pub return_date: Option<String>,
    pub passengers: u32,
}

#[derive(Error, Debug)]
pub enum SearchError {
    /// Request rejected before any network I/O.
    #[error("invalid search request: {0}")]
    Validation(String),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The provider answered with an error. `code` is the provider's
    /// machine-readable error code when its error envelope was present.
    #[error("flight search failed (HTTP {status}): {message}")]
    Provider {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("flight search network error: {0}")]
    Network(String),

    #[error("unexpected flight search response: {0}")]
    MalformedResponse(String),
}

fn validate(request: &SearchRequest) -> Result<(), SearchError> {
    let mut missing = Vec::new();
    if request.origin.trim().is_empty() {
        missing.push("origin");
    }
    if request.destination.trim().is_empty() {
        missing.push("destination");
    }
    if request.departure_date.trim().is_empty() {
        missing.push("departure date");
    }
    if request.passengers == 0 {
        missing.push("passenger count");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SearchError::Validation(format!(
            "missing {}",
            missing.join(", ")
        )))
    }
}

fn cache_key(request: &SearchRequest) -> String {
    format!(
        "flights_{}_{}_{}_{}_{}",
        request.origin,
        request.destination,
        request.departure_date,
        request.return_date.as_deref().unwrap_or(""),
        request.passengers
    )
}

/// One search pipeline instance: provider handle, token slot and result cache.
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct FlightSearchClient {
    source: Arc<dyn OfferSource>,
    tokens: TokenManager,
    cache: CacheStore,
    config: ProviderConfig,
}

impl FlightSearchClient {
    pub fn new(config: ProviderConfig) -> Self {
        let source = Arc::new(AmadeusSource::new(config.clone()));
        Self::with_source(source, config)
    }

    /// Builds a client over any `OfferSource`, which is how tests substitute a
    /// stub provider.
    pub fn with_source(source: Arc<dyn OfferSource>, config: ProviderConfig) -> Self {
        let tokens = TokenManager::new(source.clone());
        Self {
            source,
            tokens,
            cache: CacheStore::new(),
            config,
        }
    }

    /// The shared cache handle. Other services reuse this for their own
    /// memoized calls; flight results occupy `flights_*` keys.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Drops the held provider token; the next search re-authenticates.
    pub fn invalidate_token(&self) {
        self.tokens.invalidate();
    }

    /// Runs one flight search. Identical requests within the cache TTL are
    /// answered from the cache without touching the network; a cached empty
    /// result is returned as-is. No automatic retries on any failure.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<FlightRecord>, SearchError> {
        validate(request)?;

        let key = cache_key(request);
        if let Some(cached) = self.cache.get_as::<Vec<FlightRecord>>(&key) {
            debug!(%key, results = cached.len(), "serving flight search from cache");
            return Ok(cached);
        }

        let token = self.tokens.get_token().await?;

        let query = SearchQuery {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            departure_date: request.departure_date.clone(),
            adults: request.passengers,
            currency_code: self.config.currency_code.clone(),
            max: self.config.max_offers,
        };
        let response = self.source.fetch_offers(&token, &query).await?;

        if response.data.is_empty() {
            // An empty result is a success and is cached like any other,
            // so repeated empty queries stay off the network
            info!(%key, "no flight offers found");
            let empty: Vec<FlightRecord> = Vec::new();
            self.cache.put_as(&key, &empty, Some(self.config.cache_ttl));
            return Ok(empty);
        }

        let carriers = response.carriers();
        let total = response.data.len();
        let mut records: Vec<FlightRecord> = response
            .data
            .iter()
            .filter_map(|offer| normalize_offer(offer, &carriers))
            .collect();
        if records.len() < total {
            warn!(
                dropped = total - records.len(),
                total, "some offers failed to normalize and were dropped"
            );
        }

        // sort_by is stable: equal prices keep provider order
        records.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));

        self.cache
            .put_as(&key, &records, Some(self.config.cache_ttl));
        info!(%key, results = records.len(), "flight search complete");
        Ok(records)
    }
}
