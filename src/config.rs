// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 rwspin contributors
//
// Tuning knobs for the waiting discipline, resolved once at lock
// construction.

/// Spin and yield tuning for [`RawRwSpinLock`](crate::RawRwSpinLock).
///
/// A lock copies its configuration at construction; all contended paths of
/// that lock then follow it. The default reproduces the stock schedule:
/// exponential growth from a single pause, caps of 1024 spins for either
/// wait, and a cooperative yield on every step past 512 spins.
///
/// ```
/// use rwspin::{RawRwSpinLock, SpinConfig};
///
/// fn creep(spins: u32) -> u32 {
///     spins + 1
/// }
///
/// let config = SpinConfig {
///     next_spins: creep,
///     yield_threshold: 64,
///     ..SpinConfig::DEFAULT
/// };
/// let lock = RawRwSpinLock::with_config(config);
/// lock.lock_shared();
/// lock.unlock_shared();
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SpinConfig {
    /// Progression of the spin count from one backoff step to the next.
    /// Always entered at 1.
    pub next_spins: fn(u32) -> u32,
    /// Cap on the spin count while readers wait for a writer to release.
    pub max_writer_wait_spins: u32,
    /// Cap on the spin count while a writer drains active readers.
    pub max_reader_wait_spins: u32,
    /// Spin count past which each backoff step also yields the thread.
    pub yield_threshold: u32,
    /// Cooperative yield invoked past the threshold.
    pub yield_now: fn(),
}

impl SpinConfig {
    pub const DEFAULT: Self = Self {
        next_spins: double_spins,
        max_writer_wait_spins: 1024,
        max_reader_wait_spins: 1024,
        yield_threshold: 512,
        yield_now: yield_thread,
    };
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn double_spins(spins: u32) -> u32 {
    spins.saturating_mul(2)
}

fn yield_thread() {
    crate::loom::thread::yield_now();
}
