//! src/pool/shared.rs
//!
//! The pool's shared coordination state and the worker-facing handle to it.
//!
//! Four fields, four locks. The locks are independent, never nested, and
//! never held across a join or a timed wait; each locked read is a
//! consistent snapshot that may be stale by the time the caller acts on it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};

use tracing::error;

use super::ALLOC_FAILURE_EXIT_CODE;

/// Acquires a guard, recovering the data when a panicking worker poisoned
/// the lock. Every field guarded here is valid in any observable state, and
/// the coordination layer must keep operating after a worker panic.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn exit_allocation_failure(what: &str) -> ! {
    error!("unable to allocate memory for the {}", what);
    std::process::exit(ALLOC_FAILURE_EXIT_CODE);
}

/// Shared pool state, one exclusive lock per field.
pub(crate) struct PoolShared {
    /// One entry per worker, populated during create and drained by join.
    pub(crate) handles: Mutex<Vec<JoinHandle<()>>>,
    /// Declared worker count, set once at creation.
    pub(crate) pool_size: Mutex<usize>,
    /// Cooperative stop flag polled by worker bodies.
    pub(crate) stop: Mutex<bool>,
    /// Per-worker liveness slots. 0 = not yet reported; workers write a
    /// nonzero tag of their choosing into their own slot.
    pub(crate) status: Mutex<Vec<i32>>,
}

impl PoolShared {
    pub(crate) fn new(pool_size: usize) -> Self {
        Self {
            handles: Mutex::new(Vec::new()),
            pool_size: Mutex::new(pool_size),
            stop: Mutex::new(false),
            status: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn should_stop(&self) -> bool {
        *lock(&self.stop)
    }

    pub(crate) fn set_stop(&self, stop: bool) {
        *lock(&self.stop) = stop;
    }

    pub(crate) fn pool_size(&self) -> usize {
        *lock(&self.pool_size)
    }

    /// Position of `id` in the handle table, if present.
    pub(crate) fn find_index_of(&self, id: ThreadId) -> Option<usize> {
        lock(&self.handles)
            .iter()
            .position(|handle| handle.thread().id() == id)
    }
}

/// Worker-side handle to the pool's shared state.
///
/// Every worker receives a clone alongside the caller context; the pool
/// owner can mint more through
/// [`ThreadPool::context`](super::ThreadPool::context). Cheap to clone, and
/// all clones refer to the same pool.
#[derive(Clone)]
pub struct PoolContext {
    pub(crate) shared: Arc<PoolShared>,
}

impl PoolContext {
    /// True once a stop has been requested.
    ///
    /// Worker bodies are expected to poll this in their own loop; nothing
    /// interrupts a worker that does not.
    pub fn should_stop(&self) -> bool {
        self.shared.should_stop()
    }

    /// Declared worker count.
    pub fn pool_size(&self) -> usize {
        self.shared.pool_size()
    }

    /// Index of the calling thread in the handle table, which is also its
    /// slot in the status array.
    ///
    /// Lets a worker discover its own slot without being told its index
    /// explicitly. A linear scan under the handle-table lock; fine for the
    /// tens-of-workers pools this layer targets.
    ///
    /// Returns `None` (and logs an error) when the calling thread is not in
    /// the table. A worker that runs before creation finished populating
    /// the table can see this transiently and should retry.
    pub fn find_my_index(&self) -> Option<usize> {
        let index = self.shared.find_index_of(thread::current().id());
        if index.is_none() {
            error!("unable to match the calling thread against the handle table");
        }
        index
    }
}
