// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 rwspin contributors
//
// Spin-then-yield waiting: execute the current spin count of pause hints,
// yield past the threshold, then grow the count toward a cap.

use crate::config::SpinConfig;
use crate::loom::hint;

/// One waiting schedule, owned by a single acquisition attempt.
///
/// Each [`snooze`](Backoff::snooze) executes the current spin count of CPU
/// pause hints, yields the thread once the count exceeds the configured
/// threshold, and then advances the count through the configured progression
/// while it is still below the cap. Callers re-check their condition (and,
/// in the timed paths, the deadline) between steps.
pub struct Backoff {
    spins: u32,
    max_spins: u32,
    yield_threshold: u32,
    next_spins: fn(u32) -> u32,
    yield_now: fn(),
}

impl Backoff {
    /// Schedule starting from a single pause, capped at `max_spins`.
    pub fn new(config: &SpinConfig, max_spins: u32) -> Self {
        Self {
            spins: 1,
            max_spins,
            yield_threshold: config.yield_threshold,
            next_spins: config.next_spins,
            yield_now: config.yield_now,
        }
    }

    /// Schedule for a reader waiting on the writer flag.
    pub(crate) fn writer_wait(config: &SpinConfig) -> Self {
        Self::new(config, config.max_writer_wait_spins)
    }

    /// Schedule for a writer draining active readers.
    pub(crate) fn reader_wait(config: &SpinConfig) -> Self {
        Self::new(config, config.max_reader_wait_spins)
    }

    /// One waiting step: pause, maybe yield, advance.
    pub fn snooze(&mut self) {
        pause(self.spins);
        if self.spins > self.yield_threshold {
            (self.yield_now)();
        }
        if self.spins < self.max_spins {
            self.spins = (self.next_spins)(self.spins);
        }
    }

    /// Current spin count.
    pub fn spins(&self) -> u32 {
        self.spins
    }

    /// Restart the schedule from a single pause.
    pub fn reset(&mut self) {
        self.spins = 1;
    }
}

#[cfg(not(loom))]
#[inline]
fn pause(count: u32) {
    for _ in 0..count {
        hint::spin_loop();
    }
}

// Loom intercepts every hint; one per step keeps models bounded.
#[cfg(loom)]
#[inline]
fn pause(_count: u32) {
    hint::spin_loop();
}
