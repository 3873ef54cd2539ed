use chrono::{DateTime, Duration, Utc};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.millis.store(to.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// Decides which tokens are past their lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpiryPolicy {
    lifetime: Duration,
}

impl ExpiryPolicy {
    pub fn new(lifetime_minutes: u32) -> Self {
        Self {
            lifetime: Duration::minutes(i64::from(lifetime_minutes)),
        }
    }

    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Tokens created strictly before this instant are expired.
    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.lifetime
    }

    #[must_use]
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        created_at < self.cutoff(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_now_minus_lifetime() {
        let now = Utc::now();
        let policy = ExpiryPolicy::new(60);
        assert_eq!(policy.cutoff(now), now - Duration::minutes(60));
    }

    #[test]
    fn token_expires_only_after_full_lifetime() {
        let created_at = Utc::now();
        let policy = ExpiryPolicy::new(60);
        assert!(!policy.is_expired(created_at, created_at + Duration::minutes(59)));
        assert!(!policy.is_expired(created_at, created_at + Duration::minutes(60)));
        assert!(policy.is_expired(
            created_at,
            created_at + Duration::minutes(60) + Duration::milliseconds(1)
        ));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        let other = clock.clone();
        clock.advance(Duration::minutes(61));
        assert_eq!(other.now(), start + Duration::minutes(61));
        other.set(start);
        assert_eq!(clock.now(), start);
    }
}
