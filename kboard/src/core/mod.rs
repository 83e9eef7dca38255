use std::thread;
use std::time::Duration;

use log::info;

use crate::config::KboardConfig;
use crate::sync::{self, Admission, SyncSolution};

mod counters;
mod ring;

pub use self::counters::{OperationCounters, Snapshot};
pub use self::ring::{RingBuffer, RingState, RING_BUFFER_INIT_VALUE, RING_BUFFER_SIZE};

/// Shared state of one board: the ring, its counters and the protocol that
/// admits threads to them. Every role handle holds an `Arc` to one service.
pub struct KboardService {
    ring: RingBuffer,
    counters: OperationCounters,
    admission: Box<dyn Admission>,
    // Time spent inside a critical section after a successful ring operation.
    perform_delay: Duration,
}

impl KboardService {
    pub fn new(cfg: &KboardConfig) -> KboardService {
        let service = KboardService {
            ring: RingBuffer::new(),
            counters: OperationCounters::new(),
            admission: cfg.sync_solution.build(),
            perform_delay: Duration::from_millis(cfg.perform_delay_ms),
        };
        info!(
            "kboard started, synchronization solution: '{}' ({:?}), perform delay: {:?}",
            cfg.sync_solution, cfg.sync_solution, service.perform_delay
        );
        service
    }

    #[inline]
    fn perform(&self) {
        if self.perform_delay > Duration::from_millis(0) {
            thread::sleep(self.perform_delay);
        }
    }

    /// Runs `f` in a writer critical section and counts it as a writer op,
    /// whatever `f` returns. Only a successful transfer holds the section
    /// for the perform delay; a rejected one leaves at once.
    pub fn write_ring<T, E, F>(&self, f: F) -> Result<T, E>
        where F: FnOnce(&RingBuffer) -> Result<T, E>,
    {
        let _pass = sync::writer_pass(self.admission.as_ref());
        self.counters.record_writer_op();
        let result = f(&self.ring);
        if result.is_ok() {
            self.perform();
        }
        result
    }

    /// Runs `f` in a reader critical section and counts it as a reader op.
    pub fn read_ring<R, F>(&self, f: F) -> R
        where F: FnOnce(&RingBuffer) -> R,
    {
        let _pass = sync::reader_pass(self.admission.as_ref());
        self.counters.record_reader_op();
        let result = f(&self.ring);
        self.perform();
        result
    }

    /// Back to the startup state. Bypasses admission: callers must make sure
    /// no operation is in flight.
    pub fn reset(&self) {
        info!("kboard reset");
        self.ring.reset();
        self.counters.reset();
    }

    /// Occupied slots, read without admission.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Best-effort view, read without admission.
    pub fn snapshot(&self) -> Snapshot {
        let (writer_ops, reader_ops) = self.counters.load();
        Snapshot {
            ring: self.ring.snapshot(),
            writer_ops,
            reader_ops,
            solution: self.solution(),
        }
    }

    #[inline]
    pub fn solution(&self) -> SyncSolution {
        self.admission.solution()
    }
}
