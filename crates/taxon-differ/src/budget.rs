//! Counting semaphore bounding write batches in flight.

use parking_lot::{Condvar, Mutex};

#[derive(Debug)]
pub struct WriteBudget {
    available: Mutex<usize>,
    released: Condvar,
    capacity: usize,
}

impl WriteBudget {
    /// A budget of at least one permit.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            available: Mutex::new(capacity),
            released: Condvar::new(),
            capacity,
        }
    }

    /// Block until a permit is free.
    pub fn acquire(&self) -> WritePermit<'_> {
        let mut available = self.available.lock();
        while *available == 0 {
            self.released.wait(&mut available);
        }
        *available -= 1;
        WritePermit { budget: self }
    }

    pub fn try_acquire(&self) -> Option<WritePermit<'_>> {
        let mut available = self.available.lock();
        if *available == 0 {
            return None;
        }
        *available -= 1;
        Some(WritePermit { budget: self })
    }

    pub fn available(&self) -> usize {
        *self.available.lock()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Returned to the budget on drop.
#[derive(Debug)]
pub struct WritePermit<'a> {
    budget: &'a WriteBudget,
}

impl Drop for WritePermit<'_> {
    fn drop(&mut self) {
        *self.budget.available.lock() += 1;
        self.budget.released.notify_one();
    }
}
