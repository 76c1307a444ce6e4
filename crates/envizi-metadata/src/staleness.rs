use std::time::Duration;

use crate::clock::duration_to_ms;
use crate::TimestampMs;

/// Why a dataset is being refreshed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RefreshMode {
    /// Re-fetch only when the dataset is stale.
    IfStale,
    /// Re-fetch unconditionally (after login: new credentials may see
    /// different data).
    Always,
}

/// Age-based staleness.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StalenessPolicy {
    refresh_interval: Duration,
}

impl StalenessPolicy {
    pub const fn new(refresh_interval: Duration) -> Self {
        Self { refresh_interval }
    }

    pub const fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// A dataset without a timestamp is always stale. Otherwise it is stale
    /// once strictly older than the refresh interval.
    pub fn is_stale(&self, written_at: Option<TimestampMs>, now: TimestampMs) -> bool {
        match written_at {
            None => true,
            Some(written_at) => now.saturating_sub(written_at) > duration_to_ms(self.refresh_interval),
        }
    }
}

/// Age of a dataset written at `written_at`. Timestamps in the future read as
/// zero age.
pub fn age(written_at: TimestampMs, now: TimestampMs) -> Duration {
    let ms = now.saturating_sub(written_at).max(0);
    Duration::from_millis(ms as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn policy() -> StalenessPolicy {
        StalenessPolicy::new(Duration::from_millis(2 * DAY_MS as u64))
    }

    #[test]
    fn missing_timestamp_is_stale() {
        assert!(policy().is_stale(None, 0));
        assert!(policy().is_stale(None, 10 * DAY_MS));
    }

    #[test]
    fn boundary_is_exclusive() {
        let written = 1_000;
        assert!(!policy().is_stale(Some(written), written));
        assert!(!policy().is_stale(Some(written), written + 2 * DAY_MS));
        assert!(policy().is_stale(Some(written), written + 2 * DAY_MS + 1));
    }

    #[test]
    fn future_timestamps_are_fresh() {
        assert!(!policy().is_stale(Some(5 * DAY_MS), 0));
        assert_eq!(age(5 * DAY_MS, 0), Duration::ZERO);
    }
}
