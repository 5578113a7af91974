// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 rwspin contributors
//
// The synchronization protocol: two independent atomic fields and the
// acquisition/release procedures for shared and exclusive modes.
// - writer_locked marks a writer holding or claiming exclusivity.
// - reader_count counts the readers currently admitted.

use crate::backoff::Backoff;
use crate::clock::Deadline;
use crate::config::SpinConfig;
use crate::loom::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(feature = "cache-padded")]
type Pad<T> = crossbeam_utils::CachePadded<T>;

#[cfg(not(feature = "cache-padded"))]
type Pad<T> = T;

#[cfg(feature = "cache-padded")]
const fn pad<T>(value: T) -> Pad<T> {
    crossbeam_utils::CachePadded::new(value)
}

#[cfg(not(feature = "cache-padded"))]
const fn pad<T>(value: T) -> Pad<T> {
    value
}

/// A reader-writer spinlock: any number of concurrent readers, or one
/// writer.
///
/// A writer claims the flag first and only then waits for admitted readers
/// to drain, so readers arriving during the drain back off rather than pass
/// the writer. Nothing throttles a continuous stream of readers that keeps
/// the count above zero; the protocol is writer-preferring at the boundary
/// but makes no fairness guarantee.
///
/// Waiting never enters the kernel. Contended paths spin with a growing
/// pause burst and yield the thread past a configurable threshold (see
/// [`SpinConfig`]); this targets short critical sections where blocking
/// primitives would dominate cost.
///
/// This type is the bare protocol, with free-standing acquire and release
/// calls for callers that manage holds themselves. [`RwSpinLock`] wraps it
/// behind guards that release on drop. Releasing a hold that was never
/// acquired is caught by debug assertions only and corrupts the lock state
/// in release builds.
///
/// [`RwSpinLock`]: crate::RwSpinLock
pub struct RawRwSpinLock {
    writer_locked: Pad<AtomicBool>,
    reader_count: Pad<AtomicU32>,
    config: SpinConfig,
}

impl RawRwSpinLock {
    /// New unlocked lock with the default spin configuration.
    #[cfg(not(loom))]
    pub const fn new() -> Self {
        Self::with_config(SpinConfig::DEFAULT)
    }

    #[cfg(loom)]
    pub fn new() -> Self {
        Self::with_config(SpinConfig::DEFAULT)
    }

    /// New unlocked lock with explicit tuning.
    #[cfg(not(loom))]
    pub const fn with_config(config: SpinConfig) -> Self {
        Self {
            writer_locked: pad(AtomicBool::new(false)),
            reader_count: pad(AtomicU32::new(0)),
            config,
        }
    }

    #[cfg(loom)]
    pub fn with_config(config: SpinConfig) -> Self {
        Self {
            writer_locked: pad(AtomicBool::new(false)),
            reader_count: pad(AtomicU32::new(0)),
            config,
        }
    }

    /// Acquire a shared hold, spinning until no writer is present.
    pub fn lock_shared(&self) {
        let mut backoff = Backoff::writer_wait(&self.config);
        loop {
            while self.writer_locked.load(Ordering::Acquire) {
                backoff.snooze();
            }

            // Publish the reader before re-checking: a claiming writer
            // either sees the count and drains it, or is seen here and the
            // increment is rolled back.
            self.reader_count.fetch_add(1, Ordering::Relaxed);

            if !self.writer_locked.load(Ordering::Acquire) {
                return;
            }

            self.reader_count.fetch_sub(1, Ordering::Release);
        }
    }

    /// Try to acquire a shared hold without waiting.
    ///
    /// Returns `false` if a writer holds or is claiming the lock.
    pub fn try_lock_shared(&self) -> bool {
        if self.writer_locked.load(Ordering::Acquire) {
            return false;
        }

        self.reader_count.fetch_add(1, Ordering::Relaxed);

        if self.writer_locked.load(Ordering::Acquire) {
            self.reader_count.fetch_sub(1, Ordering::Release);
            return false;
        }

        true
    }

    /// Acquire a shared hold, giving up once `deadline` has passed.
    ///
    /// Returns `false` on timeout, with the reader count unperturbed. A
    /// success may overshoot the deadline by at most one backoff step.
    pub fn try_lock_shared_until(&self, deadline: Deadline) -> bool {
        let mut backoff = Backoff::writer_wait(&self.config);
        while !deadline.has_passed() {
            if self.writer_locked.load(Ordering::Acquire) {
                backoff.snooze();
                continue;
            }

            self.reader_count.fetch_add(1, Ordering::Relaxed);

            if !self.writer_locked.load(Ordering::Acquire) {
                return true;
            }

            self.reader_count.fetch_sub(1, Ordering::Release);
            backoff.snooze();
        }
        false
    }

    /// Release a shared hold.
    pub fn unlock_shared(&self) {
        debug_assert!(
            self.reader_count.load(Ordering::Relaxed) > 0,
            "shared release without a shared hold"
        );
        self.reader_count.fetch_sub(1, Ordering::Release);
    }

    /// Acquire the exclusive hold: claim the writer flag, then wait for the
    /// admitted readers to drain.
    pub fn lock_exclusive(&self) {
        // Spurious weak-CAS failures retry like contended ones.
        while self
            .writer_locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            #[cfg(loom)]
            crate::loom::thread::yield_now();
        }

        // Readers arriving from here on observe the flag and back out.
        let mut backoff = Backoff::reader_wait(&self.config);
        while self.reader_count.load(Ordering::Acquire) > 0 {
            backoff.snooze();
        }
    }

    /// Try to take the exclusive hold without waiting.
    ///
    /// Returns `false` if the flag is held or readers are active; a claimed
    /// flag is released again before reporting failure.
    pub fn try_lock_exclusive(&self) -> bool {
        // Strong exchange: a single-shot probe must not fail spuriously on
        // an idle lock.
        if self
            .writer_locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }

        if self.reader_count.load(Ordering::Acquire) > 0 {
            self.writer_locked.store(false, Ordering::Release);
            return false;
        }

        true
    }

    /// Acquire the exclusive hold, giving up once `deadline` has passed.
    ///
    /// Both the claim and the drain phase are deadline-checked; a timeout in
    /// the drain releases the already-claimed flag before reporting failure,
    /// so readers are not locked out by an abandoned attempt.
    pub fn try_lock_exclusive_until(&self, deadline: Deadline) -> bool {
        let mut backoff = Backoff::reader_wait(&self.config);

        while self
            .writer_locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            if deadline.has_passed() {
                return false;
            }
            backoff.snooze();
        }

        while self.reader_count.load(Ordering::Acquire) > 0 {
            if deadline.has_passed() {
                self.writer_locked.store(false, Ordering::Release);
                return false;
            }
            backoff.snooze();
        }

        true
    }

    /// Release the exclusive hold.
    pub fn unlock_exclusive(&self) {
        debug_assert!(
            self.writer_locked.load(Ordering::Relaxed),
            "exclusive release without the exclusive hold"
        );
        self.writer_locked.store(false, Ordering::Release);
    }

    /// Whether any hold, shared or exclusive, is currently in effect.
    ///
    /// Racy snapshot for diagnostics; only the acquire operations are
    /// authoritative.
    pub fn is_locked(&self) -> bool {
        self.writer_locked.load(Ordering::Relaxed)
            || self.reader_count.load(Ordering::Relaxed) > 0
    }

    /// Whether a writer currently holds or is claiming the lock.
    pub fn is_locked_exclusive(&self) -> bool {
        self.writer_locked.load(Ordering::Relaxed)
    }

    /// Number of shared holds at the instant of the load.
    pub fn reader_count(&self) -> u32 {
        self.reader_count.load(Ordering::Relaxed)
    }
}

impl Default for RawRwSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn sequential_acquire_release_cycle() {
        let lock = RawRwSpinLock::new();

        lock.lock_exclusive();
        assert!(lock.is_locked_exclusive());
        lock.unlock_exclusive();

        lock.lock_shared();
        assert_eq!(lock.reader_count(), 1);
        lock.unlock_shared();

        assert!(!lock.is_locked());
        assert_eq!(lock.reader_count(), 0);
    }

    #[test]
    fn shared_holds_stack() {
        let lock = RawRwSpinLock::new();

        lock.lock_shared();
        lock.lock_shared();
        assert!(lock.try_lock_shared());
        assert_eq!(lock.reader_count(), 3);

        lock.unlock_shared();
        lock.unlock_shared();
        lock.unlock_shared();
        assert!(!lock.is_locked());
    }

    #[test]
    fn try_on_idle_lock_succeeds() {
        let lock = RawRwSpinLock::new();

        assert!(lock.try_lock_shared());
        lock.unlock_shared();

        assert!(lock.try_lock_exclusive());
        lock.unlock_exclusive();

        assert!(!lock.is_locked());
    }

    #[test]
    fn try_exclusive_rejected_while_readers_active() {
        let lock = RawRwSpinLock::new();

        lock.lock_shared();
        assert!(!lock.try_lock_exclusive());
        // The probe must not leave the flag claimed or touch the count.
        assert!(!lock.is_locked_exclusive());
        assert_eq!(lock.reader_count(), 1);

        lock.unlock_shared();
        assert!(!lock.is_locked());
    }

    #[test]
    fn try_shared_rejected_while_writer_holds() {
        let lock = RawRwSpinLock::new();

        lock.lock_exclusive();
        assert!(!lock.try_lock_shared());
        assert_eq!(lock.reader_count(), 0);

        lock.unlock_exclusive();
    }

    #[test]
    fn timed_shared_with_past_deadline_times_out() {
        let lock = RawRwSpinLock::new();

        // Checked before the first attempt, even on an idle lock.
        assert!(!lock.try_lock_shared_until(Deadline::now()));
        assert_eq!(lock.reader_count(), 0);
        assert!(!lock.is_locked());
    }

    #[test]
    fn timed_exclusive_claims_idle_lock_despite_past_deadline() {
        // The claim attempt precedes the first deadline check, so an
        // uncontended lock is still taken.
        let lock = RawRwSpinLock::new();

        assert!(lock.try_lock_exclusive_until(Deadline::now()));
        assert!(lock.is_locked_exclusive());
        lock.unlock_exclusive();
    }

    #[test]
    fn timed_exclusive_times_out_against_holder() {
        let lock = RawRwSpinLock::new();

        lock.lock_exclusive();
        assert!(!lock.try_lock_exclusive_until(Deadline::after(Duration::from_millis(5))));
        // The loser must not have cleared the holder's flag.
        assert!(lock.is_locked_exclusive());
        lock.unlock_exclusive();
    }

    #[test]
    fn timed_exclusive_drain_timeout_releases_flag() {
        let lock = RawRwSpinLock::new();

        lock.lock_shared();
        assert!(!lock.try_lock_exclusive_until(Deadline::after(Duration::from_millis(5))));
        // The abandoned claim must not lock new readers out.
        assert!(!lock.is_locked_exclusive());
        assert!(lock.try_lock_shared());

        lock.unlock_shared();
        lock.unlock_shared();
        assert!(!lock.is_locked());
    }

    #[test]
    fn timed_succeeds_on_idle_lock() {
        let lock = RawRwSpinLock::new();
        let deadline = Deadline::after(Duration::from_secs(1));

        assert!(lock.try_lock_shared_until(deadline));
        lock.unlock_shared();
        assert!(lock.try_lock_exclusive_until(deadline));
        lock.unlock_exclusive();
    }
}
