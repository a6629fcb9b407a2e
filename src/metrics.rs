use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts requests served from the static `/app` tree.
#[derive(Debug, Default)]
pub struct HitCounter(AtomicU64);

impl HitCounter {
    pub fn hits(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Middleware for `from_fn_with_state`: bumps the counter, then runs the request.
pub async fn count_hits(State(hits): State<Arc<HitCounter>>, request: Request, next: Next) -> Response {
    hits.increment();
    next.run(request).await
}
