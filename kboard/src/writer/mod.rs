use std::sync::Arc;

use log::debug;

use super::core::*;
use crate::errors::ClipError;

/// Writer-role handle: both copying a clip in and pasting one out mutate
/// the ring, so both go through writer admission.
#[derive(Clone)]
pub struct ClipWriter {
    service: Arc<KboardService>,
}

impl ClipWriter {
    pub fn new(service: Arc<KboardService>) -> ClipWriter {
        ClipWriter { service }
    }

    /// Copies `item` into the ring.
    pub fn enqueue(&self, item: i32) -> Result<(), ClipError> {
        debug!("'enqueue' item: '{}'", item);
        if item < 0 {
            debug!("Item cannot be negative value, item: '{}'", item);
            return Err(ClipError::InvalidArgument(item));
        }
        self.service.write_ring(|ring| {
            ring.try_push(item).map_err(|e| {
                debug!("Ring buffer is full, count: '{}'", ring.len());
                e
            })
        })
    }

    /// Pastes the oldest clip out of the ring.
    pub fn dequeue(&self) -> Result<i32, ClipError> {
        debug!("'dequeue'");
        self.service.write_ring(|ring| {
            ring.try_pop().map_err(|e| {
                debug!("Ring buffer is empty, count: '{}'", ring.len());
                e
            })
        })
    }
}
