use std::fmt;
use std::marker::PhantomData;
use std::ptr;

use tracing::{debug, trace, warn};

use crate::error::{InvariantViolation, QueueError, Result};
use crate::merge_sort::merge_sort;

// Nodes are allocated with `Box::into_raw` and only turned back into a box
// when they leave the queue, so no owning box moves while `tail` points at it.
pub(crate) type Link = *mut Node;

pub(crate) struct Node {
    pub(crate) value: String,
    pub(crate) next: Link,
}

impl Node {
    pub(crate) fn alloc(value: String) -> Link {
        Box::into_raw(Box::new(Node {
            value,
            next: ptr::null_mut(),
        }))
    }
}

/// How `settle` should restore the tail after a mutation.
enum Tail {
    Keep,
    At(Link),
    Walk,
}

/// A queue of owned strings backed by a singly linked chain.
///
/// Mutation needs `&mut Queue`, so at most one mutator exists at a time.
/// Threads that mutate a shared queue need an external lock such as
/// `Mutex<Queue>`.
pub struct Queue {
    head: Link,
    // Terminal node of the chain starting at `head`; null exactly when `head` is.
    tail: Link,
    size: usize,
}

// Every node is reachable only through one queue, values are `String`, and
// nothing is mutated through `&Queue`.
unsafe impl Send for Queue {}
unsafe impl Sync for Queue {}

impl Queue {
    pub fn new() -> Queue {
        Queue {
            head: ptr::null_mut(),
            tail: ptr::null_mut(),
            size: 0,
        }
    }

    /// Releases every element, then the queue itself.
    pub fn destroy(mut self) {
        let released = self.release_all();
        debug!(released, "queue destroyed");
    }

    pub fn clear(&mut self) {
        self.release_all();
    }

    /// Copies `value` into a new element at the head.
    ///
    /// On failure the queue is left exactly as it was.
    pub fn insert_head(&mut self, value: &str) -> Result<()> {
        let node = Node::alloc(copy_value(value)?);
        // SAFETY: `node` is freshly allocated and not yet linked anywhere.
        unsafe { (*node).next = self.head };
        self.head = node;
        self.size += 1;

        let tail = if self.size == 1 { Tail::At(node) } else { Tail::Keep };
        self.settle(tail);
        trace!(size = self.size, "inserted at head");
        Ok(())
    }

    pub fn insert_tail(&mut self, value: &str) -> Result<()> {
        let node = Node::alloc(copy_value(value)?);
        if self.tail.is_null() {
            self.head = node;
        } else {
            // SAFETY: a non-null tail is a live node owned by this queue, and
            // `&mut self` rules out any other access to it.
            unsafe { (*self.tail).next = node };
        }
        self.size += 1;

        self.settle(Tail::At(node));
        trace!(size = self.size, "inserted at tail");
        Ok(())
    }

    /// Detaches the head element and returns its value.
    pub fn pop_head(&mut self) -> Option<String> {
        if self.head.is_null() {
            return None;
        }
        // SAFETY: the head came from `Node::alloc` and is unlinked here, so
        // ownership returns to the box exactly once.
        let node = unsafe { Box::from_raw(self.head) };
        self.head = node.next;
        self.size -= 1;

        self.settle(Tail::Keep);
        trace!(size = self.size, "removed head");
        Some(node.value)
    }

    /// Removes the head element, copying its value into `buffer` if one is supplied.
    ///
    /// At most `buffer.len() - 1` bytes of the value are copied, followed by a
    /// NUL terminator. Longer values are truncated silently. A zero-length
    /// buffer receives nothing.
    pub fn remove_head(&mut self, buffer: Option<&mut [u8]>) -> Result<()> {
        let value = self.pop_head().ok_or(QueueError::EmptyQueue)?;
        if let Some(buffer) = buffer {
            bounded_copy(value.as_bytes(), buffer);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn peek_head(&self) -> Option<&str> {
        // SAFETY: a non-null head is a live node owned by this queue.
        unsafe { self.head.as_ref() }.map(|node| node.value.as_str())
    }

    pub fn peek_tail(&self) -> Option<&str> {
        // SAFETY: a non-null tail is a live node owned by this queue.
        unsafe { self.tail.as_ref() }.map(|node| node.value.as_str())
    }

    pub fn reverse(&mut self) {
        if self.size < 2 {
            return;
        }

        let former_head = self.head;
        let mut previous: Link = ptr::null_mut();
        let mut current = self.head;
        while !current.is_null() {
            // SAFETY: `current` walks the queue's own null-terminated chain.
            unsafe {
                let next = (*current).next;
                (*current).next = previous;
                previous = current;
                current = next;
            }
        }
        self.head = previous;

        self.settle(Tail::At(former_head));
        debug!(size = self.size, "queue reversed");
    }

    /// Sorts the elements into ascending byte-wise order of their values.
    ///
    /// The relative order of equal values is unspecified.
    pub fn sort(&mut self) {
        if self.size < 2 {
            return;
        }

        // SAFETY: the chain is owned by this queue and null-terminated.
        self.head = unsafe { merge_sort(self.head) };
        self.settle(Tail::Walk);
        debug!(size = self.size, "queue sorted");
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head,
            remaining: self.size,
            marker: PhantomData,
        }
    }

    /// Walks the whole chain and checks the structural invariants.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantViolation> {
        if self.head.is_null() != self.tail.is_null() {
            return Err(InvariantViolation::DanglingTail);
        }

        let mut reachable = 0;
        let mut last: Link = ptr::null_mut();
        let mut current = self.head;
        while !current.is_null() {
            // A cycle or an overlong chain shows up as more nodes than recorded.
            if reachable == self.size {
                return Err(InvariantViolation::Unterminated {
                    recorded: self.size,
                });
            }
            reachable += 1;
            last = current;
            // SAFETY: at most `size` live nodes are visited.
            current = unsafe { (*current).next };
        }

        if reachable != self.size {
            return Err(InvariantViolation::SizeMismatch {
                recorded: self.size,
                reachable,
            });
        }
        if last != self.tail {
            return Err(InvariantViolation::TailNotTerminal);
        }
        Ok(())
    }

    /// Restores the tail after a mutation. Every mutating operation ends here.
    fn settle(&mut self, tail: Tail) {
        if self.head.is_null() {
            self.tail = ptr::null_mut();
        } else {
            match tail {
                Tail::Keep => {}
                Tail::At(node) => self.tail = node,
                // SAFETY: the chain from `head` is owned and null-terminated.
                Tail::Walk => self.tail = unsafe { terminal(self.head) },
            }
        }

        debug_assert_eq!(self.head.is_null(), self.size == 0);
        debug_assert_eq!(self.head.is_null(), self.tail.is_null());
        // SAFETY: a non-null tail is a live node owned by this queue.
        debug_assert!(unsafe { self.tail.as_ref() }.map_or(true, |node| node.next.is_null()));
    }

    /// Frees the chain front to back, stopping when the links run out.
    fn release_all(&mut self) -> usize {
        let released = self.size;
        let mut current = self.head;
        self.head = ptr::null_mut();
        while !current.is_null() {
            // SAFETY: each node is unlinked from the chain before it is freed.
            let node = unsafe { Box::from_raw(current) };
            current = node.next;
        }
        self.size = 0;
        self.settle(Tail::Keep);
        released
    }
}

impl Default for Queue {
    fn default() -> Self {
        Queue::new()
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Forward traversal over a [`Queue`].
pub struct Iter<'a> {
    next: *const Node,
    remaining: usize,
    marker: PhantomData<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        // SAFETY: the queue is borrowed for 'a, so its nodes stay alive and unchanged.
        let node: &'a Node = unsafe { self.next.as_ref() }?;
        self.next = node.next;
        self.remaining -= 1;
        Some(node.value.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Copies `value` into freshly reserved storage, reporting exhaustion
/// instead of aborting.
fn copy_value(value: &str) -> Result<String> {
    let mut owned = String::new();
    if owned.try_reserve_exact(value.len()).is_err() {
        warn!(len = value.len(), "could not allocate element value");
        return Err(QueueError::AllocationFailure);
    }
    owned.push_str(value);
    Ok(owned)
}

fn bounded_copy(value: &[u8], buffer: &mut [u8]) {
    let capacity = match buffer.len().checked_sub(1) {
        Some(capacity) => capacity,
        None => return,
    };
    let copied = value.len().min(capacity);
    buffer[..copied].copy_from_slice(&value[..copied]);
    buffer[copied] = 0;
}

/// # Safety
///
/// `head` must be the first node of a live, null-terminated chain.
unsafe fn terminal(mut head: Link) -> Link {
    while !(*head).next.is_null() {
        head = (*head).next;
    }
    head
}
