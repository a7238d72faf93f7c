use crate::errors::BufferError;
use tracing::{debug, warn};

/// Fixed-capacity ring buffer of `i32`. Pushing onto a full buffer is an
/// error, never an overwrite.
///
/// Emptiness and fullness are derived from `len`; there is no separate flag.
/// A capacity of zero, or one too large to allocate, is rejected by
/// [`RingBuffer::new`].
#[derive(Debug, Clone)]
pub struct RingBuffer {
    data: Vec<i32>,
    head: usize,
    tail: usize,
    len:  usize,
}

impl RingBuffer {
    pub fn new(cap: usize) -> Result<Self, BufferError> {
        if cap == 0 {
            return Err(BufferError::InvalidCapacity { capacity: cap });
        }
        let mut data = Vec::new();
        data.try_reserve_exact(cap)
            .map_err(|_| BufferError::TooLarge { capacity: cap })?;
        data.resize(cap, 0);
        Ok(Self { data, head: 0, tail: 0, len: 0 })
    }

    /// Append `val` at the tail. Fails with [`BufferError::Full`] and leaves
    /// the buffer untouched when `len() == capacity()`.
    pub fn push(&mut self, val: i32) -> Result<(), BufferError> {
        if self.is_full() {
            warn!(value = val, capacity = self.capacity(), "push rejected: buffer full");
            return Err(BufferError::Full);
        }
        self.data[self.tail] = val;
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
        debug!(value = val, head = self.head, tail = self.tail, len = self.len, "push");
        Ok(())
    }

    /// Remove and return the oldest element. Fails with [`BufferError::Empty`]
    /// and leaves the buffer untouched when nothing is held.
    pub fn pop(&mut self) -> Result<i32, BufferError> {
        if self.is_empty() {
            warn!("pop rejected: buffer empty");
            return Err(BufferError::Empty);
        }
        let val = std::mem::take(&mut self.data[self.head]);
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        debug!(value = val, head = self.head, tail = self.tail, len = self.len, "pop");
        Ok(val)
    }

    /// The element the next `pop` would return.
    pub fn peek(&self) -> Option<i32> {
        if self.is_empty() { None } else { Some(self.data[self.head]) }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn capacity(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn is_full(&self) -> bool { self.len == self.capacity() }
}
