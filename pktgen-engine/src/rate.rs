//! Rate limiter for controlling packet send rate
//!
//! Pacing is best effort: the limiter sleeps until the next send slot but
//! never tries to catch up on slots missed while the caller was busy.

use std::thread;
use std::time::{Duration, Instant};
use tracing::trace;

/// Blocking packets-per-second limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum packets per second
    packets_per_second: u64,
    /// Time between two sends
    interval: Duration,
    /// Earliest time the next packet may leave
    next_slot: Option<Instant>,
    /// Total packets released
    total_packets: u64,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(packets_per_second: u64) -> Self {
        let packets_per_second = packets_per_second.max(1); // Minimum 1 pps
        let interval = Duration::from_nanos(1_000_000_000 / packets_per_second);

        Self {
            packets_per_second,
            interval,
            next_slot: None,
            total_packets: 0,
        }
    }

    /// Block until it's time to send the next packet
    pub fn wait(&mut self) {
        let now = Instant::now();
        let slot = match self.next_slot {
            Some(slot) if slot > now => {
                let delay = slot - now;
                trace!(delay_us = delay.as_micros() as u64, "Rate limiting");
                thread::sleep(delay);
                slot
            }
            _ => now,
        };

        self.next_slot = Some(slot + self.interval);
        self.total_packets += 1;
    }

    /// Get the configured rate
    pub fn packets_per_second(&self) -> u64 {
        self.packets_per_second
    }

    /// Interval between two packets
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Get total packets released
    pub fn total_packets(&self) -> u64 {
        self.total_packets
    }
}
