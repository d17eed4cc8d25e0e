//! Time utilities for the client simulation

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Frame pacing defaults (host display refresh)
pub const FRAMES_PER_SECOND: u32 = 60;
pub const FRAME_DURATION_MILLIS: u64 = 1_000 / FRAMES_PER_SECOND as u64;

/// Source of time for cooldowns and intent timestamps.
///
/// Cooldowns are measured on the monotonic `now()`; `unix_millis()` only
/// stamps outbound messages.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    fn unix_millis(&self) -> u64;
}

/// Wall clock backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn unix_millis(&self) -> u64 {
        unix_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    base_unix_millis: u64,
    offset_millis: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            base_unix_millis: 1_700_000_000_000,
            offset_millis: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_millis
            .fetch_add(by.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.offset_millis.load(Ordering::Relaxed)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.elapsed_millis())
    }

    fn unix_millis(&self) -> u64 {
        self.base_unix_millis + self.elapsed_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_both_timelines_together() {
        let clock = ManualClock::new();
        let start = clock.now();
        let start_unix = clock.unix_millis();

        clock.advance(Duration::from_millis(1_500));

        assert_eq!(clock.now() - start, Duration::from_millis(1_500));
        assert_eq!(clock.unix_millis() - start_unix, 1_500);
    }

    #[test]
    fn frame_duration_matches_refresh_rate() {
        assert_eq!(FRAME_DURATION_MILLIS, 16);
    }
}
