use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Epoch second at which the current rate-limit window resets.
pub const RESET_HEADER: &str = "x-rate-limit-reset";
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// A rate-limit rejection as seen by the fetcher.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateLimitSignal {
    pub status: Option<u16>,
    pub headers: BTreeMap<String, String>,
}

impl RateLimitSignal {
    pub fn new(status: Option<u16>, headers: BTreeMap<String, String>) -> Self {
        Self { status, headers }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
    }

    /// When the window resets: the reset header if it parses, else
    /// `retry-after`, else `now + default_reset`. Values that do not fit in a
    /// timestamp count as unusable.
    pub fn reset_at(&self, now: DateTime<Utc>, default_reset: Duration) -> DateTime<Utc> {
        if let Some(reset) = self.header(RESET_HEADER).and_then(parse_epoch_seconds) {
            return reset;
        }

        if let Some(reset) = self
            .header(RETRY_AFTER_HEADER)
            .and_then(|value| value.parse::<u64>().ok())
            .and_then(|seconds| offset_by_seconds(now, seconds))
        {
            return reset;
        }

        debug!(
            "No usable reset header, assuming reset in {:?}",
            default_reset
        );
        chrono::Duration::from_std(default_reset)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Time left until the reset, never negative.
    pub fn wait_time(&self, now: DateTime<Utc>, default_reset: Duration) -> Duration {
        (self.reset_at(now, default_reset) - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

fn offset_by_seconds(now: DateTime<Utc>, seconds: u64) -> Option<DateTime<Utc>> {
    let delta = i64::try_from(seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)?;
    now.checked_add_signed(delta)
}

fn parse_epoch_seconds(value: &str) -> Option<DateTime<Utc>> {
    let seconds = value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|secs| secs as i64))?;
    Utc.timestamp_opt(seconds, 0).single()
}
