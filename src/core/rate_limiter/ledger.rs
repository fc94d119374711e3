//! Per-caller usage ledger with day and minute rollover

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::time::Duration;

const MINUTE: ChronoDuration = ChronoDuration::seconds(60);

/// Counters for one caller identity
#[derive(Debug, Clone, PartialEq)]
pub struct CallerUsage {
    pub requests_today: u32,
    pub tokens_used_today: u64,
    pub last_request_at: DateTime<Utc>,
    pub requests_this_minute: u32,
    pub minute_window_started_at: DateTime<Utc>,
}

impl CallerUsage {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            requests_today: 0,
            tokens_used_today: 0,
            last_request_at: now,
            requests_this_minute: 0,
            minute_window_started_at: now,
        }
    }

    fn is_same_day(&self, now: DateTime<Utc>) -> bool {
        self.last_request_at.date_naive() == now.date_naive()
    }

    /// Requests counted against today, as seen at `now`
    pub fn effective_requests_today(&self, now: DateTime<Utc>) -> u32 {
        if self.is_same_day(now) {
            self.requests_today
        } else {
            0
        }
    }

    fn roll_over(&mut self, now: DateTime<Utc>) {
        if !self.is_same_day(now) {
            self.requests_today = 0;
            self.tokens_used_today = 0;
        }
        if now - self.minute_window_started_at > MINUTE {
            self.requests_this_minute = 0;
            self.minute_window_started_at = now;
        }
    }
}

/// Usage counters keyed by caller id
#[derive(Debug, Default)]
pub struct UsageLedger {
    callers: HashMap<String, CallerUsage>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_usage(&mut self, caller_id: &str, tokens: u32) {
        self.record_usage_at(caller_id, tokens, Utc::now());
    }

    /// Count one request and `tokens` for the caller, applying rollover first
    pub fn record_usage_at(&mut self, caller_id: &str, tokens: u32, now: DateTime<Utc>) {
        let usage = match self.callers.get_mut(caller_id) {
            Some(usage) => usage,
            None => self
                .callers
                .entry(caller_id.to_string())
                .or_insert_with(|| CallerUsage::new(now)),
        };

        usage.roll_over(now);
        usage.requests_today += 1;
        usage.tokens_used_today += u64::from(tokens);
        usage.requests_this_minute += 1;
        usage.last_request_at = now;
    }

    pub fn has_exceeded_daily_cap(&self, caller_id: &str, cap: u32) -> bool {
        self.has_exceeded_daily_cap_at(caller_id, cap, Utc::now())
    }

    /// A caller with no recorded usage never exceeds the cap
    pub fn has_exceeded_daily_cap_at(&self, caller_id: &str, cap: u32, now: DateTime<Utc>) -> bool {
        self.callers
            .get(caller_id)
            .is_some_and(|usage| usage.effective_requests_today(now) >= cap)
    }

    /// Requests recorded today across all callers
    pub fn total_requests_today(&self, now: DateTime<Utc>) -> u64 {
        self.callers
            .values()
            .map(|usage| u64::from(usage.effective_requests_today(now)))
            .sum()
    }

    pub fn sweep(&mut self, max_age: Duration) -> usize {
        self.sweep_at(max_age, Utc::now())
    }

    /// Drop callers idle for longer than `max_age`; returns how many were removed.
    ///
    /// Callers with requests counted against today are always kept, whatever
    /// `max_age` says.
    pub fn sweep_at(&mut self, max_age: Duration, now: DateTime<Utc>) -> usize {
        let max_age = ChronoDuration::from_std(max_age).unwrap_or(ChronoDuration::MAX);
        let before = self.callers.len();
        self.callers.retain(|_, usage| {
            usage.is_same_day(now) || now.signed_duration_since(usage.last_request_at) <= max_age
        });
        before - self.callers.len()
    }

    pub fn usage(&self, caller_id: &str) -> Option<&CallerUsage> {
        self.callers.get(caller_id)
    }

    pub fn len(&self) -> usize {
        self.callers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callers.is_empty()
    }
}
