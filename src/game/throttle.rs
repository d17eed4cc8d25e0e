//! Cooldown bookkeeping for rate-limited actions (bomb drops, damage ticks)

use std::time::{Duration, Instant};

/// Concurrency cap plus cooldown for a discrete action.
///
/// An action fires only if `in_flight < max_concurrent` and the cooldown
/// window of the previous firing has elapsed.
#[derive(Debug, Clone)]
pub struct ActionThrottle {
    in_flight: u32,
    max_concurrent: u32,
    cooldown: Duration,
    cooldown_until: Option<Instant>,
}

impl ActionThrottle {
    pub fn new(max_concurrent: u32, cooldown: Duration) -> Self {
        Self {
            in_flight: 0,
            max_concurrent,
            cooldown,
            cooldown_until: None,
        }
    }

    /// Check if the action may fire at `now`
    pub fn permits(&self, now: Instant) -> bool {
        self.in_flight < self.max_concurrent
            && self.cooldown_until.map_or(true, |until| now >= until)
    }

    /// Fire if permitted: counts one more in flight and starts the cooldown.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if !self.permits(now) {
            return false;
        }
        self.in_flight += 1;
        self.cooldown_until = Some(now + self.cooldown);
        true
    }

    /// One in-flight action finished upstream
    pub fn resolve(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn raise_limit(&mut self, by: u32) {
        self.max_concurrent = self.max_concurrent.saturating_add(by);
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    pub fn max_concurrent(&self) -> u32 {
        self.max_concurrent
    }
}

/// Lets an event through at most once per window.
#[derive(Debug, Clone)]
pub struct CooldownGate {
    window: Duration,
    last_pass: Option<Instant>,
}

impl CooldownGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_pass: None,
        }
    }

    pub fn try_pass(&mut self, now: Instant) -> bool {
        let open = self
            .last_pass
            .map_or(true, |last| now.saturating_duration_since(last) > self.window);
        if open {
            self.last_pass = Some(now);
        }
        open
    }
}
