// Flight-offer retrieval and normalization pipeline.
//
// The pipeline acquires a short-lived provider token, runs a parameterized
// offer search, maps the nested provider response into flat flight records
// and memoizes results in a TTL cache. Everything else (rendering, maps,
// itinerary generation) lives outside this crate.

pub mod airports;
pub mod auth;
pub mod cache;
pub mod config;
pub mod flights;
pub mod normalize;
pub mod provider;

// Re-export key types for convenience
pub use airports::{suggest, Airport};
pub use auth::{AuthError, TokenManager};
pub use cache::{CacheStatsReport, CacheStore};
pub use config::ProviderConfig;
pub use flights::{FlightSearchClient, SearchError, SearchRequest};
pub use normalize::FlightRecord;
pub use provider::{AmadeusSource, OfferSource, OffersResponse, SearchQuery, TokenGrant};
