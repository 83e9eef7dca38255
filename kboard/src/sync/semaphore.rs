use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Counting semaphore.
///
/// Unlike a mutex, a permit is not owned by the thread that took it: any
/// thread may `up` a permit another thread `down`ed. The reader gates of the
/// preference protocols depend on this, since the last departing reader
/// returns the permit the first arriving reader took.
pub struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    pub fn new(permits: usize) -> Semaphore {
        Semaphore {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, usize> {
        // Only counter arithmetic runs under this lock, so a poisoned state is still consistent.
        self.permits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a permit, blocking until one is available.
    pub fn down(&self) {
        let mut permits = self.lock();
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *permits -= 1;
    }

    /// Returns a permit and wakes one blocked `down`, if any.
    pub fn up(&self) {
        let mut permits = self.lock();
        *permits += 1;
        drop(permits);
        self.available.notify_one();
    }

    #[cfg(test)]
    pub(crate) fn permits(&self) -> usize {
        *self.lock()
    }
}
