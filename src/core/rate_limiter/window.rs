//! Global sliding window over admitted requests and tokens

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Usage inside the trailing window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStatus {
    pub requests_used: u64,
    pub tokens_used: u64,
}

/// Request and token timestamps for the trailing window.
///
/// Entries are pushed in admission order, so pruning only ever pops the front.
#[derive(Debug)]
pub struct GlobalWindow {
    window: Duration,
    requests: VecDeque<Instant>,
    tokens: VecDeque<(Instant, u32)>,
    tokens_total: u64,
}

impl Default for GlobalWindow {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl GlobalWindow {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            requests: VecDeque::new(),
            tokens: VecDeque::new(),
            tokens_total: 0,
        }
    }

    pub fn record_event(&mut self, tokens: u32) {
        self.record_event_at(tokens, Instant::now());
    }

    pub fn record_event_at(&mut self, tokens: u32, now: Instant) {
        self.requests.push_back(now);
        self.tokens.push_back((now, tokens));
        self.tokens_total += u64::from(tokens);
    }

    pub fn current_status(&mut self) -> WindowStatus {
        self.current_status_at(Instant::now())
    }

    /// Prune entries older than the window, then report what remains
    pub fn current_status_at(&mut self, now: Instant) -> WindowStatus {
        self.prune(now);
        WindowStatus {
            requests_used: self.requests.len() as u64,
            tokens_used: self.tokens_total,
        }
    }

    fn prune(&mut self, now: Instant) {
        let window = self.window;
        let expired = |t: Instant| now.duration_since(t) >= window;

        while self.requests.front().is_some_and(|&t| expired(t)) {
            self.requests.pop_front();
        }
        while let Some(&(t, tokens)) = self.tokens.front() {
            if !expired(t) {
                break;
            }
            self.tokens.pop_front();
            self.tokens_total -= u64::from(tokens);
        }
    }

    /// Time until the oldest entry leaves the window
    pub fn time_until_oldest_expires(&self, now: Instant) -> Option<Duration> {
        self.requests
            .front()
            .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
    }
}
