// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 rwspin contributors
//
// Model-checked exclusion and visibility on the raw lock. Run with:
//   RUSTFLAGS="--cfg loom" cargo test --test loom --release
#![cfg(loom)]

use loom::cell::UnsafeCell;
use loom::sync::Arc;
use loom::thread;

use rwspin::RawRwSpinLock;

struct Shared {
    lock: RawRwSpinLock,
    value: UnsafeCell<u32>,
}

// The lock serializes every access to `value`; loom verifies that claim.
unsafe impl Sync for Shared {}

impl Shared {
    fn new() -> Self {
        Self {
            lock: RawRwSpinLock::new(),
            value: UnsafeCell::new(0),
        }
    }
}

// Two writers increment a plain cell; loom flags any unsynchronized access,
// so completion with the right total proves mutual exclusion.
#[test]
fn writers_are_mutually_exclusive() {
    loom::model(|| {
        let shared = Arc::new(Shared::new());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    shared.lock.lock_exclusive();
                    let value = shared.value.with(|ptr| unsafe { *ptr });
                    shared.value.with_mut(|ptr| unsafe { *ptr = value + 1 });
                    shared.lock.unlock_exclusive();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.value.with(|ptr| unsafe { *ptr }), 2);
    });
}

// The reader gets in either before the writer claims or after it releases;
// loom verifies the cell accesses never overlap, and a reader that follows
// the writer must observe its store.
#[test]
fn reader_and_writer_never_overlap() {
    loom::model(|| {
        let shared = Arc::new(Shared::new());

        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                shared.lock.lock_exclusive();
                shared.value.with_mut(|ptr| unsafe { *ptr = 1 });
                shared.lock.unlock_exclusive();
            })
        };

        shared.lock.lock_shared();
        let value = shared.value.with(|ptr| unsafe { *ptr });
        assert!(value == 0 || value == 1);
        shared.lock.unlock_shared();

        writer.join().unwrap();
    });
}

// A try-writer only touches the cell when its probe wins, and the probe
// must lose while the reader is admitted.
#[test]
fn try_exclusive_respects_readers() {
    loom::model(|| {
        let shared = Arc::new(Shared::new());

        let prober = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                if shared.lock.try_lock_exclusive() {
                    shared.value.with_mut(|ptr| unsafe { *ptr = 7 });
                    shared.lock.unlock_exclusive();
                }
            })
        };

        shared.lock.lock_shared();
        let value = shared.value.with(|ptr| unsafe { *ptr });
        assert!(value == 0 || value == 7);
        shared.lock.unlock_shared();

        prober.join().unwrap();
    });
}
