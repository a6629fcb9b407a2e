use crate::auth::{AccessGate, SessionAuthority};
use crate::metrics::HitCounter;
use crate::store::Store;
use std::sync::Arc;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// One store instance, built at startup and shared by every handler.
/// Everything here is cheap to clone: `Store` and the rest are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub sessions: Arc<SessionAuthority>,
    pub gate: AccessGate,
    pub hits: Arc<HitCounter>,
    /// API key the payment provider sends with webhooks. No key, no webhooks.
    pub polka_key: Option<String>,
}

impl AppState {
    pub fn new(store: Store, jwt_secret: &str, polka_key: Option<String>) -> Self {
        let sessions = Arc::new(SessionAuthority::new(jwt_secret, store.clone()));
        let gate = AccessGate::new(sessions.clone(), store.clone());

        Self {
            store,
            sessions,
            gate,
            hits: Arc::new(HitCounter::default()),
            polka_key,
        }
    }
}
