use std::sync::{Mutex, MutexGuard, PoisonError};

use log::trace;

use super::{Admission, Semaphore, SyncSolution};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TicketCounts {
    pub active_writers: usize,
    pub active_readers: usize,
    pub waiting_writers: usize,
    pub waiting_readers: usize,
}

/// Who a departing thread let in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handoff {
    None,
    Writer,
    Readers(usize),
}

/// Solution 3: neither role can starve the other.
///
/// A writer waits if anyone is inside or queued; a reader waits only behind
/// writers. A departing writer admits the whole queue of waiting readers at
/// once, or failing that a single writer. The last reader out admits one
/// waiting writer.
///
/// The departing thread moves the threads it wakes from the waiting counts to
/// the active counts before signalling them, so the counts always describe
/// who may be inside even while the woken threads are still being scheduled.
/// The guarding mutex is never held while blocked on a role semaphore.
pub struct Ticket {
    counts: Mutex<TicketCounts>,
    writer_turn: Semaphore,
    reader_turn: Semaphore,
}

impl Ticket {
    pub fn new() -> Ticket {
        Ticket {
            counts: Mutex::new(TicketCounts::default()),
            writer_turn: Semaphore::new(0),
            reader_turn: Semaphore::new(0),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, TicketCounts> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn counts(&self) -> TicketCounts {
        *self.lock()
    }

    /// Writer departure; returns who was let in.
    pub(crate) fn release_writer(&self) -> Handoff {
        let mut counts = self.lock();
        counts.active_writers -= 1;
        let handoff = if counts.waiting_readers > 0 {
            let woken = counts.waiting_readers;
            counts.waiting_readers = 0;
            counts.active_readers += woken;
            for _ in 0..woken {
                self.reader_turn.up();
            }
            Handoff::Readers(woken)
        } else if counts.waiting_writers > 0 {
            counts.waiting_writers -= 1;
            counts.active_writers += 1;
            self.writer_turn.up();
            Handoff::Writer
        } else {
            Handoff::None
        };
        drop(counts);
        trace!("writer left, handoff: {:?}", handoff);
        handoff
    }

    /// Reader departure; returns who was let in.
    pub(crate) fn release_reader(&self) -> Handoff {
        let mut counts = self.lock();
        counts.active_readers -= 1;
        let handoff = if counts.active_readers == 0 && counts.waiting_writers > 0 {
            counts.waiting_writers -= 1;
            counts.active_writers += 1;
            self.writer_turn.up();
            Handoff::Writer
        } else {
            Handoff::None
        };
        drop(counts);
        if handoff != Handoff::None {
            trace!("last reader left, handoff: {:?}", handoff);
        }
        handoff
    }
}

impl Default for Ticket {
    fn default() -> Self {
        Ticket::new()
    }
}

impl Admission for Ticket {
    fn enter_writer(&self) {
        let mut counts = self.lock();
        if counts.active_writers > 0
            || counts.active_readers > 0
            || counts.waiting_writers > 0
            || counts.waiting_readers > 0
        {
            counts.waiting_writers += 1;
            drop(counts);
            // Counted as active by whoever signals us.
            self.writer_turn.down();
            return;
        }
        counts.active_writers += 1;
    }

    fn leave_writer(&self) {
        self.release_writer();
    }

    fn enter_reader(&self) {
        let mut counts = self.lock();
        if counts.waiting_writers > 0 || counts.active_writers > 0 {
            counts.waiting_readers += 1;
            drop(counts);
            self.reader_turn.down();
            return;
        }
        counts.active_readers += 1;
    }

    fn leave_reader(&self) {
        self.release_reader();
    }

    fn solution(&self) -> SyncSolution {
        SyncSolution::Ticket
    }
}
