use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Admission, Semaphore, SyncSolution};

/// Solution 1: readers have priority.
///
/// The first reader in takes the writer gate for the whole reader group and
/// the last reader out returns it. A reader arriving while other readers are
/// inside never looks at the gate, so a steady stream of readers starves
/// writers.
pub struct ReaderPreference {
    writer_gate: Semaphore,
    // Held across the first reader's wait on `writer_gate` so later readers queue behind it.
    reader_count: Mutex<usize>,
}

impl ReaderPreference {
    pub fn new() -> ReaderPreference {
        ReaderPreference {
            writer_gate: Semaphore::new(1),
            reader_count: Mutex::new(0),
        }
    }

    #[inline]
    fn readers(&self) -> MutexGuard<'_, usize> {
        self.reader_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ReaderPreference {
    fn default() -> Self {
        ReaderPreference::new()
    }
}

impl Admission for ReaderPreference {
    fn enter_writer(&self) {
        self.writer_gate.down();
    }

    fn leave_writer(&self) {
        self.writer_gate.up();
    }

    fn enter_reader(&self) {
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
        SyncSolution::ReaderPreference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn reader_overtakes_waiting_writer() {
        let admission = Arc::new(ReaderPreference::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        admission.enter_reader();

        let writer = thread::spawn({
            let admission = Arc::clone(&admission);
            let log = Arc::clone(&log);
            move || {
                admission.enter_writer();
                log.lock().unwrap().push("writer");
                admission.leave_writer();
            }
        });
        // Let the writer block on the gate.
        thread::sleep(Duration::from_millis(50));
        assert_eq!(admission.writer_gate.permits(), 0);

        let reader = thread::spawn({
            let admission = Arc::clone(&admission);
            let log = Arc::clone(&log);
            move || {
                admission.enter_reader();
                log.lock().unwrap().push("reader");
                admission.leave_reader();
            }
        });
        reader.join().expect("reader panicked");
        assert_eq!(*log.lock().unwrap(), vec!["reader"]);

        admission.leave_reader();
        writer.join().expect("writer panicked");
        assert_eq!(*log.lock().unwrap(), vec!["reader", "writer"]);
        assert_eq!(*admission.readers(), 0);
        assert_eq!(admission.writer_gate.permits(), 1);
    }
}
