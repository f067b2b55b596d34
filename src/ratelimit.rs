//! Per-client submission rate limiting (fixed window).

use crate::{Error, Result};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Entries kept before expired windows are swept
const SWEEP_THRESHOLD: usize = 1024;

struct Window {
    started: Instant,
    count: u32,
}

/// Admits at most `limit` requests per client per window.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    /// `limit == 0` disables limiting.
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request from `client`.
    pub fn check(&self, client: IpAddr) -> Result<()> {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: IpAddr, now: Instant) -> Result<()> {
        if self.limit == 0 {
            return Ok(());
        }
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        if clients.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        if entry.count >= self.limit {
            let retry = self.window.saturating_sub(now.duration_since(entry.started));
            log::warn!("rate limiting {}", client);
            return Err(Error::RateLimited(retry.as_secs().max(1)));
        }
        entry.count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const A: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const B: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn admits_limit_then_rejects() {
        let rl = RateLimiter::new(3, Duration::from_secs(60));
        let t0 = Instant::now();
        for _ in 0..3 {
            assert!(rl.check_at(A, t0).is_ok());
        }
        assert!(matches!(rl.check_at(A, t0), Err(Error::RateLimited(60))));
        // other clients have their own window
        assert!(rl.check_at(B, t0).is_ok());
    }

    #[test]
    fn window_resets() {
        let rl = RateLimiter::new(1, Duration::from_secs(10));
        let t0 = Instant::now();
        assert!(rl.check_at(A, t0).is_ok());
        assert!(rl.check_at(A, t0 + Duration::from_secs(5)).is_err());
        assert!(rl.check_at(A, t0 + Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn zero_limit_disables() {
        let rl = RateLimiter::new(0, Duration::from_secs(1));
        for _ in 0..100 {
            assert!(rl.check(A).is_ok());
        }
    }
}
