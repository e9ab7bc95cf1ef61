//! Login throttling keyed on the client address
//!
//! The key is the TCP peer. `X-Forwarded-For` is only read when the server is
//! configured to sit behind a reverse proxy, and then only its right-most hop
//! (the address the proxy itself saw) is used.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use shared::error::{AppError, ErrorCode};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Attempts allowed per client within one window
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub attempts: u32,
    pub window: Duration,
}

/// 5 login attempts per minute
pub const LOGIN_QUOTA: Quota = Quota {
    attempts: 5,
    window: Duration::from_secs(60),
};

/// Windows idle this long are dropped by [`RateLimiter::cleanup`]
const IDLE_AFTER: Duration = Duration::from_secs(300);

/// Peer stand-in when the connection address is unavailable
const UNKNOWN_PEER: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

struct Window {
    opened: Instant,
    used: u32,
}

impl Window {
    /// Count one attempt; `false` once the quota for this window is spent
    fn admit(&mut self, now: Instant, quota: Quota) -> bool {
        if now.duration_since(self.opened) >= quota.window {
            self.opened = now;
            self.used = 0;
        }
        self.used = self.used.saturating_add(1);
        self.used <= quota.attempts
    }
}

type Key = (&'static str, IpAddr);

#[derive(Clone, Default)]
pub struct RateLimiter {
    trust_proxy: bool,
    windows: Arc<Mutex<HashMap<Key, Window>>>,
}

impl RateLimiter {
    pub fn new(trust_proxy: bool) -> Self {
        Self {
            trust_proxy,
            ..Self::default()
        }
    }

    /// Record an attempt on `route` from `client`; `false` means throttled.
    pub async fn check(&self, route: &'static str, client: IpAddr, quota: Quota) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        windows
            .entry((route, client))
            .or_insert(Window { opened: now, used: 0 })
            .admit(now, quota)
    }

    /// Forget clients whose window opened more than five minutes ago
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.opened) < IDLE_AFTER);
        tracing::debug!(dropped = before - windows.len(), "Rate limiter cleanup");
    }

    /// Address the quota is charged to
    fn client_of(&self, request: &Request) -> IpAddr {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(UNKNOWN_PEER);
        if !self.trust_proxy {
            return peer;
        }
        request
            .headers()
            .get_all("x-forwarded-for")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .last()
            .and_then(|hop| hop.trim().parse().ok())
            .unwrap_or(peer)
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}

/// Throttle the login route per client
pub async fn login_rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = limiter.client_of(&request);
    if !limiter.check("login", client, LOGIN_QUOTA).await {
        tracing::warn!(target: "security", client = %client, "login_rate_limited");
        return Err(AppError::new(ErrorCode::TooManyRequests));
    }
    Ok(next.run(request).await)
}
