//! A queue of owned strings on a singly linked chain, with in-place
//! reversal and merge sort.

mod error;
mod merge_sort;
pub mod optional;
mod queue;

pub use error::{InvariantViolation, QueueError, Result};
pub use queue::{Iter, Queue};

#[cfg(test)]
static SOME_ELEMS: usize = 10;
#[cfg(test)]
static MANY_ELEMS: usize = 100_000;
#[cfg(test)]
static NUM_THREADS: usize = 4;
#[cfg(test)]
static ELEMS_PER_THREAD: usize = MANY_ELEMS / NUM_THREADS;

#[cfg(test)]
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Deterministic xorshift values so property checks are reproducible.
#[cfg(test)]
fn scrambled(count: usize, seed: u64) -> Vec<String> {
    let mut state = seed | 1;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            format!("{:x}", state % 1_000)
        })
        .collect()
}
