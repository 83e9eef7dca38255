use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::ring::{RingState, RING_BUFFER_SIZE};
use crate::sync::SyncSolution;

/// Completed critical-section entries per role.
///
/// Readers overlap each other, so the reader count is bumped concurrently.
#[derive(Default)]
pub struct OperationCounters {
    writer_ops: AtomicU64,
    reader_ops: AtomicU64,
}

impl OperationCounters {
    pub fn new() -> OperationCounters {
        OperationCounters::default()
    }

    #[inline]
    pub fn record_writer_op(&self) {
        self.writer_ops.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_reader_op(&self) {
        self.reader_ops.fetch_add(1, Ordering::Relaxed);
    }

    /// `(writer_ops, reader_ops)`
    pub fn load(&self) -> (u64, u64) {
        (
            self.writer_ops.load(Ordering::Relaxed),
            self.reader_ops.load(Ordering::Relaxed),
        )
    }

    pub fn reset(&self) {
        self.writer_ops.store(0, Ordering::Relaxed);
        self.reader_ops.store(0, Ordering::Relaxed);
    }
}

/// Diagnostic view of the whole board. Taken without admission, so fields
/// may come from different moments when traffic is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub ring: RingState,
    pub writer_ops: u64,
    pub reader_ops: u64,
    pub solution: SyncSolution,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "====== Kboard Status ======")?;
        writeln!(f, "[RingBuffer]")?;
        for index in 0..RING_BUFFER_SIZE {
            writeln!(f, "index: '{}', value: '{}'", index, self.ring.slots[index])?;
        }
        writeln!(f, "[Count: '{}']", self.ring.count)?;
        writeln!(f, "[CurrentIndex: '{}']", self.ring.head)?;
        writeln!(
            f,
            "[Writer: '{}' times, Reader: '{}' times]",
            self.writer_ops, self.reader_ops
        )?;
        writeln!(f, "[Synchronization Solution: '{}']", self.solution)?;
        writeln!(f, "===========================")
    }
}
