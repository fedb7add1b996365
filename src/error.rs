//! Error types for queue operations

use thiserror::Error;

/// Failures reported by mutating queue operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Storage for a node or its string copy could not be obtained.
    #[error("could not allocate storage for a queue element")]
    AllocationFailure,

    /// The operation was handed an absent queue.
    #[error("queue is absent")]
    InvalidOperand,

    /// Removal was attempted on a queue with no elements.
    #[error("queue is empty")]
    EmptyQueue,
}

/// A broken structural invariant found by [`Queue::check_invariants`].
///
/// [`Queue::check_invariants`]: crate::Queue::check_invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("size is {recorded} but {reachable} elements are reachable from head")]
    SizeMismatch { recorded: usize, reachable: usize },

    #[error("more than {recorded} elements are reachable from head")]
    Unterminated { recorded: usize },

    #[error("head and tail disagree on emptiness")]
    DanglingTail,

    #[error("tail is not the terminal element of the chain")]
    TailNotTerminal,
}

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;
