//! Top-down merge sort over a raw chain of queue nodes.
//!
//! Nodes are relinked, never allocated or copied. Splitting halves the
//! chain at every level so the driver recurses at most log2(n) deep; the
//! merge itself is a loop.
//!
//! Every function here requires its input chains to be live,
//! null-terminated, and exclusively owned by the caller.

use std::ptr;

use crate::queue::Link;

pub(crate) unsafe fn merge_sort(head: Link) -> Link {
    if head.is_null() || (*head).next.is_null() {
        return head;
    }
    let (front, back) = split(head);
    merge(merge_sort(front), merge_sort(back))
}

/// Cuts a non-empty chain into a front of ceil(n/2) nodes and a back of
/// floor(n/2). `fast` moves two links for every link `slow` moves.
pub(crate) unsafe fn split(head: Link) -> (Link, Link) {
    let mut slow = head;
    let mut fast = (*head).next;
    while !fast.is_null() {
        fast = (*fast).next;
        if !fast.is_null() {
            slow = (*slow).next;
            fast = (*fast).next;
        }
    }

    let back = (*slow).next;
    (*slow).next = ptr::null_mut();
    (head, back)
}

/// Interleaves two sorted chains, taking the front whose value is `<=`
/// the other's. The leftover chain is appended in one step.
pub(crate) unsafe fn merge(mut a: Link, mut b: Link) -> Link {
    let mut head: Link = ptr::null_mut();
    let mut last: Link = ptr::null_mut();

    while !a.is_null() && !b.is_null() {
        let node = if (*a).value <= (*b).value {
            let node = a;
            a = (*a).next;
            node
        } else {
            let node = b;
            b = (*b).next;
            node
        };
        if last.is_null() {
            head = node;
        } else {
            (*last).next = node;
        }
        last = node;
    }

    let rest = if a.is_null() { b } else { a };
    if last.is_null() {
        return rest;
    }
    (*last).next = rest;
    head
}
