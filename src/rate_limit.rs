//! Per-client fixed-window rate limiting.
//!
//! Every (client IP, route template) pair gets a counter that admits
//! `requests` hits per `window`. The first hit opens the window; once it has
//! elapsed the next hit opens a fresh one. The check and the increment happen
//! under one lock, so concurrent requests from the same client can never be
//! admitted past the quota.
//!
//! Windows that have expired are pruned lazily, at most once per window
//! length, so the map only holds clients seen recently.
//!
//! The limiter reads [`tokio::time::Instant`], which lets tests pause and
//! advance the clock instead of sleeping through a real window.
//!
//! # Example
//!
//! ```
//! use capjobs::rate_limit::RateLimiter;
//! use capjobs_core::config::RateLimitSettings;
//!
//! let limiter = RateLimiter::new(RateLimitSettings::default());
//! let ip = "10.0.0.1".parse().unwrap();
//!
//! for _ in 0..5 {
//!     assert!(limiter.check(ip, "/jobs/capitals/{keyword}").is_allowed());
//! }
//! assert!(!limiter.check(ip, "/jobs/capitals/{keyword}").is_allowed());
//! ```

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use capjobs_core::config::RateLimitSettings;
use tokio::time::Instant;
use tracing::debug;

use crate::{error::AppError, state::AppState};

/// Outcome of a single [`RateLimiter::check`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed {
        /// Hits left in the current window after this one.
        remaining: u32,
    },
    Limited {
        /// Time until the current window closes.
        retry_after: Duration,
    },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    hits: u32,
}

type ClientKey = (IpAddr, String);

#[derive(Debug)]
struct Windows {
    by_client: HashMap<ClientKey, Window>,
    last_prune: Instant,
}

/// Process-wide limiter shared by every request task.
#[derive(Debug)]
pub struct RateLimiter {
    settings: RateLimitSettings,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            windows: Mutex::new(Windows {
                by_client: HashMap::new(),
                last_prune: Instant::now(),
            }),
        }
    }

    pub fn settings(&self) -> RateLimitSettings {
        self.settings
    }

    /// Count a hit from `ip` on `route` and decide whether to admit it.
    pub fn check(&self, ip: IpAddr, route: &str) -> RateLimitDecision {
        let now = Instant::now();
        let window_len = self.settings.window;
        let limit = self.settings.requests;

        // Nothing inside the lock can panic halfway through an update.
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if now.duration_since(windows.last_prune) >= window_len {
            windows
                .by_client
                .retain(|_, w| now.duration_since(w.started) < window_len);
            windows.last_prune = now;
        }

        let window = windows
            .by_client
            .entry((ip, route.to_string()))
            .or_insert(Window {
                started: now,
                hits: 0,
            });

        let elapsed = now.duration_since(window.started);
        if elapsed >= window_len {
            window.started = now;
            window.hits = 0;
        }

        if window.hits < limit {
            window.hits += 1;
            RateLimitDecision::Allowed {
                remaining: limit - window.hits,
            }
        } else {
            RateLimitDecision::Limited {
                retry_after: window_len.saturating_sub(now.duration_since(window.started)),
            }
        }
    }

    /// Number of (client, route) pairs currently holding a window.
    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_client
            .len()
    }
}

/// Middleware guarding a route with the shared [`RateLimiter`].
///
/// Rejects with [`AppError::RateLimited`] before the handler runs.
pub async fn rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    match state.limiter.check(ip, &route) {
        RateLimitDecision::Allowed { remaining } => {
            debug!(%ip, route = %route, remaining, "request admitted");
            Ok(next.run(request).await)
        }
        RateLimitDecision::Limited { retry_after } => {
            let settings = state.limiter.settings();
            Err(AppError::RateLimited {
                limit: settings.requests,
                window_secs: settings.window.as_secs(),
                retry_after,
            })
        }
    }
}

/// Peer address of the connection; requests without connection info share
/// the unspecified address.
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
