use std::fmt;
use std::sync::Arc;

use log::debug;
use rand::Rng;

use super::core::*;

/// Value found in one slot by a reader. `value` may be the empty sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peek {
    pub index: usize,
    pub value: i32,
}

impl fmt::Display for Peek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Read random value from Kboard: index: '{}', value: '{}'",
            self.index, self.value
        )
    }
}

#[derive(Clone)]
pub struct ClipReader {
    service: Arc<KboardService>,
}

impl ClipReader {
    pub fn new(service: Arc<KboardService>) -> ClipReader {
        ClipReader { service }
    }

    /// Looks at a uniformly chosen slot without removing anything.
    pub fn peek_random(&self) -> Peek {
        let index = rand::thread_rng().gen_range(0..RING_BUFFER_SIZE);
        self.peek(index)
    }

    pub(crate) fn peek(&self, index: usize) -> Peek {
        debug!("'peek' index: '{}'", index);
        let value = self.service.read_ring(|ring| ring.peek(index));
        Peek { index, value }
    }
}
