//! Five-slot clip board shared by writers (copy/paste) and readers (peek),
//! guarded by a selectable readers-writers admission protocol.

use std::sync::Arc;

pub mod config;
pub mod core;
pub mod endpoint;
mod errors;
pub mod reader;
pub mod sync;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::config::KboardConfig;
pub use crate::errors::{ClipError, KboardError};
pub use crate::reader::Peek;
pub use crate::sync::SyncSolution;

pub const RING_BUFFER_SIZE: usize = core::RING_BUFFER_SIZE;
pub const RING_BUFFER_INIT_VALUE: i32 = core::RING_BUFFER_INIT_VALUE;

/// Handle to one board. Clones share the same board.
#[derive(Clone)]
pub struct Kboard {
    service: Arc<core::KboardService>,
    writer: writer::ClipWriter,
    reader: reader::ClipReader,
}

impl Kboard {
    pub fn new(cfg: &KboardConfig) -> Kboard {
        let service = Arc::new(core::KboardService::new(cfg));
        service.reset();
        Kboard {
            writer: writer::ClipWriter::new(Arc::clone(&service)),
            reader: reader::ClipReader::new(Arc::clone(&service)),
            service,
        }
    }

    pub fn with_solution(sync_solution: SyncSolution) -> Kboard {
        Kboard::new(&KboardConfig::builder().sync_solution(sync_solution).build())
    }

    pub fn enqueue(&self, item: i32) -> Result<(), ClipError> {
        self.writer.enqueue(item)
    }

    pub fn dequeue(&self) -> Result<i32, ClipError> {
        self.writer.dequeue()
    }

    pub fn peek_random(&self) -> Peek {
        self.reader.peek_random()
    }

    /// Empties the ring and zeroes the counters. Must not race with other operations.
    pub fn reset(&self) {
        self.service.reset()
    }

    /// Occupied slots.
    pub fn count(&self) -> usize {
        self.service.len()
    }

    pub fn dump(&self) -> core::Snapshot {
        self.service.snapshot()
    }

    pub fn solution(&self) -> SyncSolution {
        self.service.solution()
    }

    pub fn writer(&self) -> writer::ClipWriter {
        self.writer.clone()
    }

    pub fn reader(&self) -> reader::ClipReader {
        self.reader.clone()
    }
}

impl Default for Kboard {
    fn default() -> Self {
        Kboard::new(&KboardConfig::default())
    }
}
