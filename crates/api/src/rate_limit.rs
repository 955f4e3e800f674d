use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

const PRUNE_THRESHOLD: usize = 4096;

/// Sliding-window limiter keyed by client address.
#[derive(Debug, Clone)]
pub struct ClientRateLimiter {
    windows: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    window: Duration,
    max_requests: usize,
}

impl ClientRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_requests: max_requests.max(1),
        }
    }

    pub fn allow(&self, client: &str) -> bool {
        self.allow_at(client, Instant::now())
    }

    fn allow_at(&self, client: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock();
        if windows.len() >= PRUNE_THRESHOLD {
            prune(&mut windows, now, self.window);
        }
        let hits = windows.entry(client.to_string()).or_default();
        evict(hits, now, self.window);

        if hits.len() >= self.max_requests {
            return false;
        }
        hits.push_back(now);
        true
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }
}

/// Drops clients with no request inside the window.
fn prune(windows: &mut HashMap<String, VecDeque<Instant>>, now: Instant, window: Duration) {
    windows.retain(|_, hits| {
        evict(hits, now, window);
        !hits.is_empty()
    });
}

fn evict(hits: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while hits
        .front()
        .is_some_and(|oldest| now.duration_since(*oldest) > window)
    {
        hits.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_limit_and_recovers() {
        let limiter = ClientRateLimiter::new(Duration::from_secs(10), 2);
        let start = Instant::now();
        assert!(limiter.allow_at("a", start));
        assert!(limiter.allow_at("a", start));
        assert!(!limiter.allow_at("a", start));
        assert!(limiter.allow_at("b", start));
        assert!(limiter.allow_at("a", start + Duration::from_secs(11)));
    }

    #[test]
    fn idle_clients_are_pruned() {
        let limiter = ClientRateLimiter::new(Duration::from_secs(1), 5);
        let start = Instant::now();
        for idx in 0..PRUNE_THRESHOLD {
            assert!(limiter.allow_at(&format!("client-{idx}"), start));
        }
        assert_eq!(limiter.tracked_clients(), PRUNE_THRESHOLD);

        assert!(limiter.allow_at("late", start + Duration::from_secs(5)));
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
