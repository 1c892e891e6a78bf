//! Per-client sliding-window rate limiting.

use super::response::ApiResponse;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lru::LruCache;
use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Admits at most `max_requests` per client IP in any rolling `window`.
///
/// The ledger keeps the admission instants of each client, bounded to
/// `max_clients` entries; the least recently seen client is evicted first.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    ledger: Mutex<LruCache<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration, max_clients: usize) -> Self {
        let capacity = NonZeroUsize::new(max_clients).unwrap_or(NonZeroUsize::MIN);
        Self {
            max_requests,
            window,
            ledger: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Records a request from `ip` if it is within its allowance.
    ///
    /// Returns `Err(retry_after)` with the time until the client's oldest
    /// admission leaves the window.
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        self.check_at(ip, Instant::now())
    }

    pub fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), Duration> {
        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        let admitted = ledger.get_or_insert_mut(ip, VecDeque::new);

        while let Some(&oldest) = admitted.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                admitted.pop_front();
            } else {
                break;
            }
        }

        if admitted.len() < self.max_requests {
            admitted.push_back(now);
            return Ok(());
        }

        let retry_after = admitted
            .front()
            .map(|&oldest| {
                self.window
                    .saturating_sub(now.saturating_duration_since(oldest))
            })
            .unwrap_or(self.window);
        Err(retry_after)
    }

    /// Human-readable limit, e.g. "10 per 1 minute".
    pub fn describe(&self) -> String {
        let secs = self.window.as_secs();
        let (count, unit) = if secs > 0 && secs % 3600 == 0 {
            (secs / 3600, "hour")
        } else if secs > 0 && secs % 60 == 0 {
            (secs / 60, "minute")
        } else {
            (secs, "second")
        };
        let plural = if count == 1 { "" } else { "s" };
        format!("{} per {} {}{}", self.max_requests, count, unit, plural)
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Middleware rejecting clients over their allowance with 429.
///
/// The client is identified by the peer address from `ConnectInfo`. Requests
/// without one (in-process callers) share a single bucket.
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match limiter.check(ip) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            // Round up so clients never retry early
            let retry_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            tracing::info!(client = %ip, retry_after_secs = retry_secs, "Rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_secs.max(1).to_string())],
                Json(ApiResponse::error(format!(
                    "Rate limit exceeded: {}",
                    limiter.describe()
                ))),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(203, 0, 113, last))
    }

    #[test]
    fn test_allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(10, WINDOW, 100);
        let start = Instant::now();

        for i in 0..10 {
            assert!(limiter.check_at(ip(1), start + Duration::from_secs(i)).is_ok());
        }
        let retry = limiter
            .check_at(ip(1), start + Duration::from_secs(10))
            .unwrap_err();
        // Oldest admission at +0s leaves the window at +60s
        assert_eq!(retry, Duration::from_secs(50));
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(2, WINDOW, 100);
        let start = Instant::now();

        assert!(limiter.check_at(ip(1), start).is_ok());
        assert!(limiter.check_at(ip(1), start + Duration::from_secs(30)).is_ok());
        assert!(limiter.check_at(ip(1), start + Duration::from_secs(59)).is_err());
        // First admission expires at exactly one window
        assert!(limiter.check_at(ip(1), start + WINDOW).is_ok());
        assert!(limiter.check_at(ip(1), start + Duration::from_secs(61)).is_err());
    }

    #[test]
    fn test_rejected_requests_do_not_extend_window() {
        let limiter = RateLimiter::new(1, WINDOW, 100);
        let start = Instant::now();

        assert!(limiter.check_at(ip(1), start).is_ok());
        for s in 1..60 {
            assert!(limiter.check_at(ip(1), start + Duration::from_secs(s)).is_err());
        }
        assert!(limiter.check_at(ip(1), start + WINDOW).is_ok());
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, WINDOW, 100);
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).is_ok());
        assert!(limiter.check_at(ip(1), now).is_err());
        assert!(limiter.check_at(ip(2), now).is_ok());
    }

    #[test]
    fn test_ledger_bounded_by_max_clients() {
        let limiter = RateLimiter::new(1, WINDOW, 2);
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).is_ok());
        assert!(limiter.check_at(ip(2), now).is_ok());
        assert!(limiter.check_at(ip(3), now).is_ok());
        assert_eq!(limiter.tracked_clients(), 2);
        // ip(1) was evicted, so its history is gone
        assert!(limiter.check_at(ip(1), now).is_ok());
    }

    #[test]
    fn test_zero_allowance_rejects_everything() {
        let limiter = RateLimiter::new(0, WINDOW, 10);
        assert_eq!(limiter.check_at(ip(1), Instant::now()), Err(WINDOW));
    }

    #[test]
    fn test_describe() {
        assert_eq!(RateLimiter::new(10, WINDOW, 1).describe(), "10 per 1 minute");
        assert_eq!(
            RateLimiter::new(5, Duration::from_secs(7200), 1).describe(),
            "5 per 2 hours"
        );
        assert_eq!(
            RateLimiter::new(3, Duration::from_secs(30), 1).describe(),
            "3 per 30 seconds"
        );
    }
}
