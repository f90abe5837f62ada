use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Failed logins within the window before a CAPTCHA token is required.
const CAPTCHA_THRESHOLD: u32 = 3;
/// Failed logins within the window before attempts are blocked outright.
const BLOCK_THRESHOLD: u32 = 5;
const WINDOW: Duration = Duration::from_secs(15 * 60);

pub enum LoginGate {
    Allowed,
    CaptchaRequired,
    /// Blocked; retry after the given number of seconds.
    Blocked(u64),
}

/// Per-email sliding-window tracker of failed login attempts.
pub struct LoginAttemptTracker {
    /// email -> (failed_count, window_start)
    entries: DashMap<String, (u32, Instant)>,
}

impl LoginAttemptTracker {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Decide whether a login attempt may proceed. Does NOT increment the
    /// counter; call `record_failure()` on invalid credentials.
    pub fn check(&self, email: &str) -> LoginGate {
        let now = Instant::now();

        let Some(entry) = self.entries.get(&email.to_lowercase()) else {
            return LoginGate::Allowed;
        };

        let (count, start) = entry.value();

        if now.duration_since(*start) > WINDOW {
            return LoginGate::Allowed;
        }

        if *count >= BLOCK_THRESHOLD {
            let elapsed = now.duration_since(*start).as_secs();
            return LoginGate::Blocked(WINDOW.as_secs().saturating_sub(elapsed));
        }

        if *count >= CAPTCHA_THRESHOLD {
            return LoginGate::CaptchaRequired;
        }

        LoginGate::Allowed
    }

    pub fn record_failure(&self, email: &str) {
        let now = Instant::now();

        let mut entry = self.entries.entry(email.to_lowercase()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > WINDOW {
            *count = 1;
            *start = now;
        } else {
            *count += 1;
        }
    }

    pub fn clear(&self, email: &str) {
        self.entries.remove(&email.to_lowercase());
    }

    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries
            .retain(|_, (_, start)| now.duration_since(*start) < max_age);
    }
}

impl Default for LoginAttemptTracker {
    fn default() -> Self {
        Self::new()
    }
}
