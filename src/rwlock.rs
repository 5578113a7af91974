// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 rwspin contributors
//
// RAII surface: lock_api traits over the raw protocol, so holds are
// released on every exit path, panics included.

use core::time::Duration;

use lock_api::GuardSend;

use crate::clock::Deadline;
use crate::raw::RawRwSpinLock;

/// A reader-writer spinlock protecting a `T`.
///
/// [`read`](lock_api::RwLock::read) and [`write`](lock_api::RwLock::write)
/// return guards that release on drop; `try_read` / `try_write` probe once,
/// and `try_read_until(Deadline)` / `try_write_for(Duration)` (and their
/// counterparts) bound the wait. Construction with non-default tuning goes
/// through the raw lock:
///
/// ```
/// use rwspin::{RawRwSpinLock, RwSpinLock, SpinConfig};
///
/// static CONFIG: SpinConfig = SpinConfig {
///     yield_threshold: 64,
///     ..SpinConfig::DEFAULT
/// };
/// static COUNTER: RwSpinLock<u64> =
///     RwSpinLock::const_new(RawRwSpinLock::with_config(CONFIG), 0);
///
/// *COUNTER.write() += 1;
/// assert_eq!(*COUNTER.read(), 1);
/// ```
pub type RwSpinLock<T> = lock_api::RwLock<RawRwSpinLock, T>;

/// Shared-hold guard returned by `read` and its try/timed variants.
pub type RwSpinLockReadGuard<'a, T> = lock_api::RwLockReadGuard<'a, RawRwSpinLock, T>;

/// Exclusive-hold guard returned by `write` and its try/timed variants.
pub type RwSpinLockWriteGuard<'a, T> = lock_api::RwLockWriteGuard<'a, RawRwSpinLock, T>;

unsafe impl lock_api::RawRwLock for RawRwSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::new();

    type GuardMarker = GuardSend;

    #[inline]
    fn lock_shared(&self) {
        RawRwSpinLock::lock_shared(self);
    }

    #[inline]
    fn try_lock_shared(&self) -> bool {
        RawRwSpinLock::try_lock_shared(self)
    }

    #[inline]
    unsafe fn unlock_shared(&self) {
        RawRwSpinLock::unlock_shared(self);
    }

    #[inline]
    fn lock_exclusive(&self) {
        RawRwSpinLock::lock_exclusive(self);
    }

    #[inline]
    fn try_lock_exclusive(&self) -> bool {
        RawRwSpinLock::try_lock_exclusive(self)
    }

    #[inline]
    unsafe fn unlock_exclusive(&self) {
        RawRwSpinLock::unlock_exclusive(self);
    }

    #[inline]
    fn is_locked(&self) -> bool {
        RawRwSpinLock::is_locked(self)
    }

    #[inline]
    fn is_locked_exclusive(&self) -> bool {
        RawRwSpinLock::is_locked_exclusive(self)
    }
}

unsafe impl lock_api::RawRwLockTimed for RawRwSpinLock {
    type Duration = Duration;
    type Instant = Deadline;

    #[inline]
    fn try_lock_shared_for(&self, timeout: Duration) -> bool {
        RawRwSpinLock::try_lock_shared_until(self, Deadline::after(timeout))
    }

    #[inline]
    fn try_lock_shared_until(&self, deadline: Deadline) -> bool {
        RawRwSpinLock::try_lock_shared_until(self, deadline)
    }

    #[inline]
    fn try_lock_exclusive_for(&self, timeout: Duration) -> bool {
        RawRwSpinLock::try_lock_exclusive_until(self, Deadline::after(timeout))
    }

    #[inline]
    fn try_lock_exclusive_until(&self, deadline: Deadline) -> bool {
        RawRwSpinLock::try_lock_exclusive_until(self, deadline)
    }
}
