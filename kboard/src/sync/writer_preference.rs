use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Admission, Semaphore, SyncSolution};

/// Solution 2: writers have priority.
///
/// Readers register exactly as in [`super::ReaderPreference`], but must first
/// pass through `reader_gate`. The first writer to show up closes that gate and
/// the last writer to leave reopens it, so once a writer is waiting no new
/// reader can join the group that is holding it off.
pub struct WriterPreference {
    writer_gate: Semaphore,
    reader_gate: Semaphore,
    writer_count: Mutex<usize>,
    reader_count: Mutex<usize>,
}

impl WriterPreference {
    pub fn new() -> WriterPreference {
        WriterPreference {
            writer_gate: Semaphore::new(1),
            reader_gate: Semaphore::new(1),
            writer_count: Mutex::new(0),
            reader_count: Mutex::new(0),
        }
    }

    #[inline]
    fn writers(&self) -> MutexGuard<'_, usize> {
        self.writer_count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn readers(&self) -> MutexGuard<'_, usize> {
        self.reader_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for WriterPreference {
    fn default() -> Self {
        WriterPreference::new()
    }
}

impl Admission for WriterPreference {
    fn enter_writer(&self) {
        {
            let mut writers = self.writers();
            *writers += 1;
            if *writers == 1 {
                self.reader_gate.down();
            }
        }
        self.writer_gate.down();
    }

    fn leave_writer(&self) {
        self.writer_gate.up();
        let mut writers = self.writers();
        *writers -= 1;
        if *writers == 0 {
            self.reader_gate.up();
        }
    }

    fn enter_reader(&self) {
        // Checkpoint only: blocks while a writer holds the gate closed.
        self.reader_gate.down();
        self.reader_gate.up();

        let mut readers = self.readers();
        *readers += 1;
        if *readers == 1 {
            self.writer_gate.down();
        }
    }

    fn leave_reader(&self) {
        let mut readers = self.readers();
        *readers -= 1;
        if *readers == 0 {
            self.writer_gate.up();
        }
    }

    fn solution(&self) -> SyncSolution {
        SyncSolution::WriterPreference
    }
}
