use std::sync::atomic::{AtomicU32, Ordering};

use super::types::NotificationId;

/// Hands out notification ids: 1, 2, 3, ...
///
/// Safe to share between request handlers without any further locking; every
/// call returns a value no other call has seen. Overflow past `u32::MAX`
/// wraps around and is not handled.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    pub fn next_id(&self) -> NotificationId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
