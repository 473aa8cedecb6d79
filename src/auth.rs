// Client-credentials token management for the flight data provider.
// One token is held per process; callers share it until it nears expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::provider::OfferSource;

/// A token this close to expiry is never reused; keeping this margin is the
/// main rate-limit protection for the auth endpoint.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("API authentication credentials missing")]
    MissingCredentials,

    #[error("provider rejected client credentials: {reason}")]
    Rejected { reason: String },

    #[error("auth network error: {0}")]
    Network(String),

    #[error("invalid token response structure")]
    MalformedResponse,
}

#[derive(Debug, Clone)]
struct HeldToken {
    bearer: String,
    expires_at: Instant,
}

impl HeldToken {
    fn is_fresh(&self) -> bool {
        self.expires_at > Instant::now() + EXPIRY_MARGIN
    }
}

/// Holds at most one bearer token. Overlapping refreshes are not deduplicated;
/// the slot is last-writer-wins, which is fine for bearer credentials that stay
/// valid until their own expiry. The lock is never held across an await.
pub struct TokenManager {
    source: Arc<dyn OfferSource>,
    slot: Mutex<Option<HeldToken>>,
}

impl TokenManager {
    pub fn new(source: Arc<dyn OfferSource>) -> Self {
        Self {
            source,
            slot: Mutex::new(None),
        }
    }

    /// Returns the held token when it has more than `EXPIRY_MARGIN` left,
    /// otherwise exchanges credentials for a fresh one. On exchange failure the
    /// slot is cleared so a stale token is never retained.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        if let Some(held) = self.slot.lock().as_ref() {
            if held.is_fresh() {
                debug!("using held provider token");
                return Ok(held.bearer.clone());
            }
        }

        match self.source.exchange_token().await {
            Ok(grant) => {
                debug!(expires_in = grant.expires_in, "new provider token obtained");
                let held = HeldToken {
                    bearer: grant.access_token.clone(),
                    expires_at: Instant::now() + Duration::from_secs(grant.expires_in),
                };
                *self.slot.lock() = Some(held);
                Ok(grant.access_token)
            }
            Err(err) => {
                warn!(%err, "token exchange failed, clearing held token");
                *self.slot.lock() = None;
                Err(err)
            }
        }
    }

    /// Drops any held token. The next `get_token` call performs a fresh
    /// exchange. Used on auth failures and for test isolation.
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}
