//! Ring-buffer byte queue consumed by the framing reader.
//!
//! The queue stores bytes in arrival order and exposes a zero-copy view of
//! its front segment. Because the backing store is a ring buffer, the queued
//! bytes may live in up to two contiguous runs; callers that need to walk
//! everything do so by scanning [`flat`](ByteQueue::flat) and dropping what
//! they have consumed until the queue runs dry.

use std::collections::VecDeque;

/// Ordered, growable queue of raw bytes.
#[derive(Default, Debug)]
pub struct ByteQueue {
    inner: VecDeque<u8>,
}

impl ByteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of queued bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Appends `data` to the back of the queue.
    pub fn push(&mut self, data: &[u8]) {
        self.inner.extend(data.iter().copied());
    }

    /// Front contiguous segment of the queue. Empty exactly when the queue
    /// itself is empty; never covers less than the front run of bytes.
    pub fn flat(&self) -> &[u8] {
        self.inner.as_slices().0
    }

    /// Removes the first `n` bytes without copying them anywhere.
    ///
    /// `n` must not exceed [`len`](ByteQueue::len).
    pub fn drop_front(&mut self, n: usize) {
        debug_assert!(n <= self.inner.len());
        drop(self.inner.drain(..n));
    }

    /// Removes the first `buf.len()` bytes, copying them into `buf`.
    ///
    /// `buf.len()` must not exceed [`len`](ByteQueue::len).
    pub fn read_out(&mut self, buf: &mut [u8]) {
        let n = buf.len();
        debug_assert!(n <= self.inner.len());
        for (dst, src) in buf.iter_mut().zip(self.inner.drain(..n)) {
            *dst = src;
        }
    }

    /// Moves every byte of `front` ahead of this queue's contents, keeping
    /// both originals' internal order. `front` is left empty.
    pub fn splice_front(&mut self, front: &mut ByteQueue) {
        if front.inner.is_empty() {
            return;
        }
        front.inner.append(&mut self.inner);
        std::mem::swap(&mut self.inner, &mut front.inner);
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
