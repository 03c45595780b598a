use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// Counting semaphore bounding how many frames are outstanding on the GPU.
///
/// Permits come back in any order; only the count matters.
#[derive(Debug)]
pub struct FramePermits {
    available: Mutex<usize>,
    returned: Condvar,
    total: usize,
}

impl FramePermits {
    pub fn new(total: usize) -> Self {
        Self {
            available: Mutex::new(total),
            returned: Condvar::new(),
            total,
        }
    }

    /// Blocks until a permit is free, then takes it.
    pub fn acquire(&self) {
        let mut available = self.available.lock();
        while *available == 0 {
            self.returned.wait(&mut available);
        }
        *available -= 1;
    }

    pub fn try_acquire(&self) -> bool {
        let mut available = self.available.lock();
        if *available == 0 {
            return false;
        }
        *available -= 1;
        true
    }

    pub fn release(&self) {
        let mut available = self.available.lock();
        assert!(
            *available < self.total,
            "frame permit released more often than acquired"
        );
        *available += 1;
        self.returned.notify_one();
    }

    pub fn available(&self) -> usize {
        *self.available.lock()
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Proof that a ring slot is owned by a recorded frame.
///
/// Hand it to whatever observes GPU completion. Releasing it (or dropping it) returns
/// the permit, letting the slot be recorded into again.
#[derive(Debug)]
pub struct SlotToken {
    permits: Arc<FramePermits>,
    slot: usize,
    frame: u64,
}

impl SlotToken {
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Marks the frame as consumed by the GPU.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for SlotToken {
    fn drop(&mut self) {
        log::trace!("Frame {} released slot {}", self.frame, self.slot);
        self.permits.release();
    }
}

/// Round-robin selection of frame slots gated by [`FramePermits`].
///
/// Permits only bound how many frames are outstanding; they do not say which slot is
/// free. Slot reuse is safe because the GPU completes frames in submission order, so
/// the oldest frame (the owner of the next slot) is always released first.
#[derive(Debug)]
pub struct FrameRing {
    permits: Arc<FramePermits>,
    slot_count: usize,
    slot: usize,
    frame: u64,
}

impl FrameRing {
    pub fn new(slot_count: usize) -> Self {
        assert!(slot_count > 0, "frame ring needs at least one slot");
        Self {
            permits: Arc::new(FramePermits::new(slot_count)),
            slot_count,
            slot: 0,
            frame: 0,
        }
    }

    /// Waits for a free permit and moves to the next slot.
    pub fn advance(&mut self) -> SlotToken {
        self.permits.acquire();
        self.slot = (self.slot + 1) % self.slot_count;
        self.frame += 1;
        log::trace!("Frame {} acquired slot {}", self.frame, self.slot);

        SlotToken {
            permits: Arc::clone(&self.permits),
            slot: self.slot,
            frame: self.frame,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames whose tokens have not been released yet.
    pub fn in_flight(&self) -> usize {
        self.permits.total() - self.permits.available()
    }
}
