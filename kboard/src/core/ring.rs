use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use crate::errors::ClipError;

pub const RING_BUFFER_SIZE: usize = 5;
/// Sentinel held by unoccupied slots.
pub const RING_BUFFER_INIT_VALUE: i32 = -1;

/// Fixed five-slot clip ring.
///
/// The ring does no synchronization of its own. Every mutator must run inside
/// a writer critical section; `peek` inside a reader (or writer) section.
/// Fields are atomics only so that the unsynchronized diagnostic reads
/// (`snapshot`, `len`) are not data races; `Relaxed` is enough because the
/// admission protocol's locks order every critical section.
pub struct RingBuffer {
    slots: [AtomicI32; RING_BUFFER_SIZE],
    count: AtomicUsize,
    // Index of the oldest clip, next to be pasted.
    head: AtomicUsize,
}

/// Point-in-time copy of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingState {
    pub slots: [i32; RING_BUFFER_SIZE],
    pub count: usize,
    pub head: usize,
}

impl RingBuffer {
    pub fn new() -> RingBuffer {
        RingBuffer {
            slots: [
                AtomicI32::new(RING_BUFFER_INIT_VALUE),
                AtomicI32::new(RING_BUFFER_INIT_VALUE),
                AtomicI32::new(RING_BUFFER_INIT_VALUE),
                AtomicI32::new(RING_BUFFER_INIT_VALUE),
                AtomicI32::new(RING_BUFFER_INIT_VALUE),
            ],
            count: AtomicUsize::new(0),
            head: AtomicUsize::new(0),
        }
    }

    pub fn try_push(&self, value: i32) -> Result<(), ClipError> {
        debug_assert!(value >= 0, "negative clips are rejected before admission");
        let count = self.count.load(Ordering::Relaxed);
        if count >= RING_BUFFER_SIZE {
            return Err(ClipError::Full);
        }
        let head = self.head.load(Ordering::Relaxed);
        self.slots[(head + count) % RING_BUFFER_SIZE].store(value, Ordering::Relaxed);
        self.count.store(count + 1, Ordering::Relaxed);
        Ok(())
    }

    pub fn try_pop(&self) -> Result<i32, ClipError> {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return Err(ClipError::Empty);
        }
        let head = self.head.load(Ordering::Relaxed);
        let value = self.slots[head].swap(RING_BUFFER_INIT_VALUE, Ordering::Relaxed);
        self.head.store((head + 1) % RING_BUFFER_SIZE, Ordering::Relaxed);
        self.count.store(count - 1, Ordering::Relaxed);
        Ok(value)
    }

    /// Raw slot value, possibly the sentinel.
    #[inline]
    pub fn peek(&self, index: usize) -> i32 {
        self.slots[index % RING_BUFFER_SIZE].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> RingState {
        let mut slots = [RING_BUFFER_INIT_VALUE; RING_BUFFER_SIZE];
        for (dst, src) in slots.iter_mut().zip(self.slots.iter()) {
            *dst = src.load(Ordering::Relaxed);
        }
        RingState {
            slots,
            count: self.count.load(Ordering::Relaxed),
            head: self.head.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for slot in self.slots.iter() {
            slot.store(RING_BUFFER_INIT_VALUE, Ordering::Relaxed);
        }
        self.count.store(0, Ordering::Relaxed);
        self.head.store(0, Ordering::Relaxed);
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        RingBuffer::new()
    }
}

impl RingState {
    /// Exactly `count` slots starting at `head` hold clips, all others the sentinel.
    pub fn is_consistent(&self) -> bool {
        if self.count > RING_BUFFER_SIZE || self.head >= RING_BUFFER_SIZE {
            return false;
        }
        (0..RING_BUFFER_SIZE).all(|offset| {
            let value = self.slots[(self.head + offset) % RING_BUFFER_SIZE];
            if offset < self.count {
                value >= 0
            } else {
                value == RING_BUFFER_INIT_VALUE
            }
        })
    }
}
