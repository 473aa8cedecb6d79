// Environment-driven configuration for the flight data provider.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_AUTH_URL: &str = "https://test.api.amadeus.com/v1/security/oauth2/token";
const DEFAULT_SEARCH_URL: &str = "https://test.api.amadeus.com/v2/shopping/flight-offers";
// Use https://api.amadeus.com/... for the production environment
const DEFAULT_CURRENCY: &str = "INR";
const DEFAULT_MAX_OFFERS: u32 = 25;
const DEFAULT_CACHE_TTL_SECS: u64 = 15 * 60;

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub search_url: String,
    /// Settlement currency requested from the provider. Fixed per deployment,
    /// no FX conversion happens anywhere in the pipeline.
    pub currency_code: String,
    /// Maximum number of offers requested per search.
    pub max_offers: u32,
    /// TTL applied to cached search results.
    pub cache_ttl: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            currency_code: DEFAULT_CURRENCY.to_string(),
            max_offers: DEFAULT_MAX_OFFERS,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl ProviderConfig {
    /// Reads configuration from the environment (a `.env` file is honored).
    /// Missing credentials are tolerated here; `is_configured` reports them
    /// and the auth exchange fails with a clear error if they stay absent.
    /// Malformed numeric overrides are rejected rather than silently defaulted.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self {
            client_id: env::var("AMADEUS_API_KEY").unwrap_or_default(),
            client_secret: env::var("AMADEUS_API_SECRET").unwrap_or_default(),
            ..Self::default()
        };

        if let Ok(url) = env::var("AMADEUS_AUTH_URL") {
            config.auth_url = url;
        }
        if let Ok(url) = env::var("AMADEUS_SEARCH_URL") {
            config.search_url = url;
        }
        if let Ok(currency) = env::var("FLIGHT_CURRENCY_CODE") {
            config.currency_code = currency;
        }
        if let Ok(raw) = env::var("FLIGHT_MAX_OFFERS") {
            config.max_offers = raw
                .parse()
                .with_context(|| format!("FLIGHT_MAX_OFFERS is not a number: {raw:?}"))?;
        }
        if let Ok(raw) = env::var("FLIGHT_CACHE_TTL_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("FLIGHT_CACHE_TTL_SECS is not a number: {raw:?}"))?;
            config.cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Whether provider credentials are present. Says nothing about their
    /// validity; that is only known after a token exchange.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}
