//! Queue operations that accept an absent queue.
//!
//! Each function mirrors a [`Queue`] method but takes the queue as an
//! `Option`. An absent queue is reported as [`QueueError::InvalidOperand`]
//! by fallible operations and treated as empty by the rest.

use crate::error::{QueueError, Result};
use crate::queue::Queue;

pub fn create() -> Queue {
    Queue::new()
}

pub fn destroy(queue: Option<Queue>) {
    if let Some(queue) = queue {
        queue.destroy();
    }
}

pub fn insert_head(queue: Option<&mut Queue>, value: &str) -> Result<()> {
    queue
        .ok_or(QueueError::InvalidOperand)?
        .insert_head(value)
}

pub fn insert_tail(queue: Option<&mut Queue>, value: &str) -> Result<()> {
    queue
        .ok_or(QueueError::InvalidOperand)?
        .insert_tail(value)
}

pub fn remove_head(queue: Option<&mut Queue>, buffer: Option<&mut [u8]>) -> Result<()> {
    queue
        .ok_or(QueueError::InvalidOperand)?
        .remove_head(buffer)
}

pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::len)
}

pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

pub fn sort(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.sort();
    }
}
