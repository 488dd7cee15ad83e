use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{error, warn};

#[derive(Debug)]
struct Window {
    attempts: u32,
    started: Instant,
}

/// Fixed-window write throttle keyed by caller.
#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    max_attempts: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_attempts,
            window,
        }
    }

    /// Counts one attempt for `key`. On refusal returns the seconds until the
    /// window resets (at least 1).
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), u64> {
        // Window counters stay usable after a panic elsewhere; keep enforcing.
        let mut windows = self.windows.lock().unwrap_or_else(|poisoned| {
            error!("Rate limit lock poisoned; recovering");
            poisoned.into_inner()
        });

        windows.retain(|_, w| now.duration_since(w.started) <= self.window * 2);

        let window = windows.entry(key.to_string()).or_insert(Window { attempts: 0, started: now });
        if now.duration_since(window.started) > self.window {
            *window = Window { attempts: 0, started: now };
        }

        if window.attempts >= self.max_attempts {
            let wait = (window.started + self.window).saturating_duration_since(now);
            let retry_after = wait.as_secs().max(1);
            warn!("Rate limit triggered for key {}: retry in {}s", key, retry_after);
            return Err(retry_after);
        }

        window.attempts += 1;
        Ok(())
    }
}
