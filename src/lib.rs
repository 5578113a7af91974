// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 rwspin contributors
//
// Spin-based reader-writer lock for short critical sections: any number of
// concurrent readers or a single writer, built from two atomic fields with
// a spin-then-yield waiting strategy. Blocking, try, and deadline-bounded
// acquisition in both modes; no kernel wait queues anywhere.

pub(crate) mod loom;

mod config;
pub use config::SpinConfig;

mod backoff;
pub use backoff::Backoff;

mod clock;
pub use clock::Deadline;

mod raw;
pub use raw::RawRwSpinLock;

#[cfg(not(loom))]
mod rwlock;
#[cfg(not(loom))]
pub use rwlock::{RwSpinLock, RwSpinLockReadGuard, RwSpinLockWriteGuard};
