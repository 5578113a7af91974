// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 rwspin contributors
//
// Stress demo: worker threads (one writer per four) hammer a single lock
// for a bounded duration. Writers increment the protected counter, readers
// snapshot it and check that it never runs backward; at the end the counter
// must equal the number of writer iterations.
//
// Usage:
//   stress [threads] [seconds]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rwspin::RwSpinLock;

const WRITER_STRIDE: usize = 4;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let threads: usize = match args.get(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| usage()),
        None => 32,
    };
    let seconds: u64 = match args.get(2) {
        Some(arg) => arg.parse().unwrap_or_else(|_| usage()),
        None => 5,
    };

    println!("stress: {threads} threads ({} writers) for {seconds}s", threads.div_ceil(WRITER_STRIDE));

    let counter = Arc::new(RwSpinLock::new(0u64));
    let stop = Arc::new(AtomicBool::new(false));
    let writes = Arc::new(AtomicU64::new(0));
    let reads = Arc::new(AtomicU64::new(0));

    let workers: Vec<_> = (0..threads)
        .map(|tid| {
            let counter = Arc::clone(&counter);
            let stop = Arc::clone(&stop);
            let writes = Arc::clone(&writes);
            let reads = Arc::clone(&reads);
            thread::spawn(move || {
                let is_writer = tid % WRITER_STRIDE == 0;
                // Deterministic per-thread jitter.
                let mut seed = tid as u64 * 7919 + 17;
                let mut last_seen = 0u64;

                while !stop.load(Ordering::Relaxed) {
                    if is_writer {
                        let mut value = counter.write();
                        *value += 1;
                        drop(value);
                        writes.fetch_add(1, Ordering::Relaxed);
                    } else {
                        let value = *counter.read();
                        assert!(value >= last_seen, "counter ran backward");
                        last_seen = value;
                        reads.fetch_add(1, Ordering::Relaxed);
                    }

                    seed = seed
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    thread::sleep(Duration::from_nanos(seed % 1_000_000));
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_secs(seconds));
    stop.store(true, Ordering::Relaxed);
    for worker in workers {
        worker.join().unwrap();
    }

    let final_value = *counter.read();
    let total_writes = writes.load(Ordering::Relaxed);
    println!("final value: {final_value}");
    println!("writes:      {total_writes}");
    println!("reads:       {}", reads.load(Ordering::Relaxed));
    assert_eq!(final_value, total_writes, "writer increments were lost");
}

fn usage() -> ! {
    eprintln!("usage: stress [threads] [seconds]");
    std::process::exit(1);
}
