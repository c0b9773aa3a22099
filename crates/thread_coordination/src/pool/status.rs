//! src/pool/status.rs
//!
//! Status-array operations.
//!
//! Workers self-report liveness by writing a nonzero tag into their own slot
//! (by convention; only the bounds are enforced). External liveness checks
//! read the array and treat a slot that stops updating as a hung or lost
//! worker, feeding the result back into
//! [`ThreadPool::join`](super::ThreadPool::join).

use super::manager::ThreadPool;
use super::shared::{exit_allocation_failure, lock, PoolContext, PoolShared};

impl PoolShared {
    /// Replaces the status array with a fresh zeroed one sized to the
    /// current pool size. Allocation failure is not recoverable here:
    /// status tracking is essential infrastructure, not best-effort.
    pub(crate) fn create_status_array(&self) {
        let size = self.pool_size();
        let mut fresh: Vec<i32> = Vec::new();
        if fresh.try_reserve_exact(size).is_err() {
            exit_allocation_failure("status array");
        }
        fresh.resize(size, 0);
        *lock(&self.status) = fresh;
    }

    /// Reallocates when the array length no longer matches the pool size,
    /// otherwise zeroes every slot in place.
    pub(crate) fn init_status_array(&self) {
        let size = self.pool_size();
        let stale = lock(&self.status).len() != size;
        if stale {
            self.create_status_array();
        } else {
            lock(&self.status).fill(0);
        }
    }

    pub(crate) fn status_snapshot(&self) -> Vec<i32> {
        lock(&self.status).clone()
    }

    /// Writes one slot. False when `index` is out of bounds, in which case
    /// the array is left untouched.
    pub(crate) fn set_status_element(&self, index: usize, value: i32) -> bool {
        let mut status = lock(&self.status);
        match status.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl ThreadPool {
    /// Allocates a fresh status array sized to the pool, discarding any
    /// previous contents.
    pub fn create_status_array(&self) {
        self.shared.create_status_array();
    }

    /// Resets the status array for a new round of reporting: zeroes the
    /// slots in place when the length already matches the pool size, and
    /// delegates to [`ThreadPool::create_status_array`] otherwise.
    pub fn init_status_array(&self) {
        self.shared.init_status_array();
    }

    /// Snapshot of the status array.
    ///
    /// A copy, not a reference into the live array: a later
    /// reinitialization cannot invalidate or resize what the caller holds.
    pub fn status_array(&self) -> Vec<i32> {
        self.shared.status_snapshot()
    }

    /// Writes `value` into `index`. Returns false without writing when the
    /// index is out of bounds; the caller must check.
    pub fn set_status_element(&self, index: usize, value: i32) -> bool {
        self.shared.set_status_element(index, value)
    }
}

impl PoolContext {
    /// Worker-side status report; see
    /// [`ThreadPool::set_status_element`]. Each worker should write only
    /// its own slot, discovered via [`PoolContext::find_my_index`].
    pub fn set_status_element(&self, index: usize, value: i32) -> bool {
        self.shared.set_status_element(index, value)
    }

    /// Snapshot of the status array, for liveness checks that hold only a
    /// context.
    pub fn status_array(&self) -> Vec<i32> {
        self.shared.status_snapshot()
    }
}
