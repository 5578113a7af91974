// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 rwspin contributors
//
// Monotonic nanosecond clock and the absolute deadlines used by the timed
// acquisition paths.

use std::time::Duration;

/// An absolute point on the monotonic clock, in nanoseconds.
///
/// Timed acquisitions take a `Deadline` rather than a duration so that
/// nested timed operations share one time budget, and so that re-checking
/// the deadline inside a spin loop is a single integer comparison. The
/// monotonic source never runs backward, so wall-clock adjustments cannot
/// force an early timeout.
///
/// ```
/// use std::time::Duration;
/// use rwspin::Deadline;
///
/// let deadline = Deadline::after(Duration::from_millis(50));
/// assert!(!deadline.has_passed());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline {
    ns: u64,
}

impl Deadline {
    /// The current instant. Already passed by the time it is first checked.
    pub fn now() -> Self {
        Self { ns: now_ns() }
    }

    /// The instant `timeout` from now, saturating at the clock's maximum.
    pub fn after(timeout: Duration) -> Self {
        let timeout_ns = u64::try_from(timeout.as_nanos()).unwrap_or(u64::MAX);
        Self {
            ns: now_ns().saturating_add(timeout_ns),
        }
    }

    /// Whether the clock has reached this deadline.
    pub fn has_passed(self) -> bool {
        now_ns() >= self.ns
    }

    /// Nanosecond reading the clock must reach for the deadline to pass.
    pub fn as_nanos(self) -> u64 {
        self.ns
    }
}

pub(crate) fn now_ns() -> u64 {
    imp::now_ns()
}

#[cfg(unix)]
mod imp {
    const NS_PER_SEC: u64 = 1_000_000_000;

    pub(super) fn now_ns() -> u64 {
        let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
        debug_assert_eq!(rc, 0, "clock_gettime(CLOCK_MONOTONIC) failed");
        ts.tv_sec as u64 * NS_PER_SEC + ts.tv_nsec as u64
    }
}

#[cfg(not(unix))]
mod imp {
    use std::sync::OnceLock;
    use std::time::Instant;

    // Instant has no absolute reading; anchor it to a process-local epoch.
    pub(super) fn now_ns() -> u64 {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        let epoch = *EPOCH.get_or_init(Instant::now);
        u64::try_from(epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
