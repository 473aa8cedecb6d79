// Wire-level contract with the flight data provider (Amadeus self-service tier).
// Everything past this boundary treats offers as untyped JSON; only the
// normalizer reads individual fields out of them.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::auth::AuthError;
use crate::config::ProviderConfig;
use crate::flights::SearchError;

/// Parameters actually sent to the search endpoint. Built by the orchestrator
/// after validation; the return leg is deliberately absent (only the outbound
/// itinerary is modeled by this pipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    /// YYYY-MM-DD
    pub departure_date: String,
    pub adults: u32,
    pub currency_code: String,
    pub max: u32,
}

/// Successful client-credentials exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Lifetime in seconds, as reported by the auth endpoint.
    pub expires_in: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct Dictionaries {
    #[serde(default)]
    pub carriers: HashMap<String, String>,
}

/// Envelope of the offer search response. Offers stay untyped (`Value`) so a
/// malformed entry can be dropped per offer instead of failing the batch.
#[derive(Debug, Default, Deserialize)]
pub struct OffersResponse {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub dictionaries: Option<Dictionaries>,
}

impl OffersResponse {
    pub fn carriers(&self) -> HashMap<String, String> {
        self.dictionaries
            .as_ref()
            .map(|d| d.carriers.clone())
            .unwrap_or_default()
    }
}

/// The seam between the pipeline and the provider's HTTP API. Tests substitute
/// call-counting stubs here.
#[async_trait]
pub trait OfferSource: Send + Sync {
    async fn exchange_token(&self) -> Result<TokenGrant, AuthError>;
    async fn fetch_offers(
        &self,
        bearer: &str,
        query: &SearchQuery,
    ) -> Result<OffersResponse, SearchError>;
}

/// Real provider client. Both endpoints share one pooled reqwest client with
/// timeouts so an unresponsive provider surfaces as an error instead of a hang.
pub struct AmadeusSource {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl AmadeusSource {
    pub fn new(config: ProviderConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(5))
            .build()
            .expect("reqwest client");
        Self { http, config }
    }
}

#[async_trait]
impl OfferSource for AmadeusSource {
    async fn exchange_token(&self) -> Result<TokenGrant, AuthError> {
        if !self.config.is_configured() {
            return Err(AuthError::MissingCredentials);
        }

        debug!("fetching new provider token");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        let response = self
            .http
            .post(&self.config.auth_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let reason = body
                .get("error_description")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("auth endpoint returned HTTP {}", status.as_u16()));
            error!(status = status.as_u16(), "token exchange rejected");
            return Err(AuthError::Rejected { reason });
        }

        let grant: TokenGrant = response
            .json()
            .await
            .map_err(|_| AuthError::MalformedResponse)?;
        if grant.access_token.is_empty() || grant.expires_in == 0 {
            return Err(AuthError::MalformedResponse);
        }
        Ok(grant)
    }

    async fn fetch_offers(
        &self,
        bearer: &str,
        query: &SearchQuery,
    ) -> Result<OffersResponse, SearchError> {
        debug!(
            origin = %query.origin,
            destination = %query.destination,
            date = %query.departure_date,
            "calling flight offers search"
        );
        let params: [(&str, String); 6] = [
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.departure_date.clone()),
            ("adults", query.adults.to_string()),
            ("currencyCode", query.currency_code.clone()),
            ("max", query.max.to_string()),
        ];
        let response = self
            .http
            .get(&self.config.search_url)
            .bearer_auth(bearer)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            error!(status = status.as_u16(), "flight offers search failed");
            return Err(provider_error(status.as_u16(), &body));
        }

        response
            .json::<OffersResponse>()
            .await
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))
    }
}

/// Shapes a non-success search response into a `SearchError`, keeping the
/// provider's code/title/detail triple when the error envelope is present.
fn provider_error(status: u16, body: &Value) -> SearchError {
    let errors = body.get("errors").and_then(Value::as_array);
    let (code, message) = match errors {
        Some(list) if !list.is_empty() => {
            let code = list[0]
                .get("code")
                .map(|c| c.to_string().trim_matches('"').to_string());
            let joined = list
                .iter()
                .map(|e| {
                    let code = e.get("code").map(|c| c.to_string()).unwrap_or_default();
                    let title = e.get("title").and_then(Value::as_str).unwrap_or("");
                    let detail = e.get("detail").and_then(Value::as_str).unwrap_or("");
                    format!("({code}) {title} - {detail}")
                })
                .collect::<Vec<_>>()
                .join("; ");
            (code, joined)
        }
        _ => (None, "failed to fetch flight data".to_string()),
    };
    SearchError::Provider {
        status,
        code,
        message,
    }
}
