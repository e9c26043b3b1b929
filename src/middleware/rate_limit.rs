use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header::RETRY_AFTER, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::middleware::auth::Claims;

const WINDOW: Duration = Duration::from_secs(1);

/// Callers idle this long lose their window on the next sweep.
const IDLE_AFTER: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Window {
    start: Instant,
    used: u32,
}

#[derive(Debug)]
struct Windows {
    by_caller: HashMap<String, Window>,
    last_sweep: Instant,
}

/// Per-caller request budget over a fixed one-second window. Must run
/// behind the bearer auth layer, which supplies the caller identity.
#[derive(Clone, Debug)]
pub struct CallerRateLimiter {
    budget: u32,
    windows: Arc<Mutex<Windows>>,
}

impl CallerRateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            budget: requests_per_second.max(1),
            windows: Arc::new(Mutex::new(Windows {
                by_caller: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    fn admit_at(&self, caller: &str, now: Instant) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if now.duration_since(windows.last_sweep) >= IDLE_AFTER {
            windows
                .by_caller
                .retain(|_, w| now.duration_since(w.start) < IDLE_AFTER);
            windows.last_sweep = now;
        }

        let window = windows
            .by_caller
            .entry(caller.to_string())
            .or_insert(Window { start: now, used: 0 });
        if now.duration_since(window.start) >= WINDOW {
            *window = Window { start: now, used: 0 };
        }
        if window.used >= self.budget {
            return false;
        }
        window.used += 1;
        true
    }

    pub fn admit(&self, caller: &str) -> bool {
        self.admit_at(caller, Instant::now())
    }

    #[cfg(test)]
    fn tracked_callers(&self) -> usize {
        self.windows
            .lock()
            .map(|w| w.by_caller.len())
            .unwrap_or_default()
    }
}

pub async fn caller_rate_limit(
    State(limiter): State<CallerRateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // Requests without claims never got past auth; nothing to count.
    let caller = req
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.sub.clone());

    if let Some(caller) = caller {
        if !limiter.admit(&caller) {
            tracing::warn!(owner_id = %caller, path = %req.uri().path(), "rate limit exceeded");
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, "1")],
                Json(json!({ "error": "rate_limit_exceeded" })),
            )
                .into_response();
        }
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_resets_with_next_window() {
        let limiter = CallerRateLimiter::new(2);
        let start = Instant::now();
        assert!(limiter.admit_at("alice", start));
        assert!(limiter.admit_at("alice", start));
        assert!(!limiter.admit_at("alice", start));
        assert!(limiter.admit_at("alice", start + WINDOW));
    }

    #[test]
    fn callers_have_separate_budgets() {
        let limiter = CallerRateLimiter::new(1);
        let start = Instant::now();
        assert!(limiter.admit_at("alice", start));
        assert!(!limiter.admit_at("alice", start));
        assert!(limiter.admit_at("bob", start));
    }

    #[test]
    fn idle_callers_are_swept() {
        let limiter = CallerRateLimiter::new(5);
        let start = Instant::now();
        limiter.admit_at("alice", start);
        limiter.admit_at("bob", start + IDLE_AFTER);
        assert_eq!(limiter.tracked_callers(), 1);
    }
}
