//! src/pool/manager.rs
//!
//! Pool creation, cooperative stop signaling, and join/teardown.

use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, error, info, warn};

use super::config::PoolConfig;
use super::shared::{exit_allocation_failure, lock, PoolContext, PoolShared};

/// Owner of a fixed-size pool of worker threads.
///
/// Created with [`ThreadPool::create`], torn down with [`ThreadPool::join`].
/// The shared coordination state (handle table, pool size, stop flag, status
/// array) lives behind this instance and is released with it; workers reach
/// it through the [`PoolContext`] passed to the worker function.
pub struct ThreadPool {
    pub(crate) shared: Arc<PoolShared>,
}

/// Outcome of a join pass.
///
/// Skips and failures are logged as they happen; the report makes them
/// observable to the caller as well.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JoinReport {
    /// Workers joined successfully.
    pub joined: usize,
    /// Workers skipped because the liveness input marked them hung.
    pub skipped: usize,
    /// Workers whose join failed (the worker panicked).
    pub failed: usize,
}

impl ThreadPool {
    /// Creates `num_workers` threads each running `worker_fn`.
    ///
    /// Every worker receives a [`PoolContext`] plus a clone of one shared
    /// `Arc` around `context`: the same value, not a per-worker copy, so the
    /// context must be designed to be shared or to self-partition.
    ///
    /// The stop flag starts cleared. Workers begin running before this
    /// returns; a worker that looks itself up while the handle table is
    /// still being populated sees `None` from
    /// [`PoolContext::find_my_index`] and should retry.
    ///
    /// Fails on `num_workers == 0` and on a thread-spawn error. A spawn
    /// error is fatal to the whole creation: the workers that did start are
    /// stopped and reaped before the error is returned, so no partial pool
    /// is left running. Failing to allocate the handle table itself
    /// terminates the process with
    /// [`ALLOC_FAILURE_EXIT_CODE`](super::ALLOC_FAILURE_EXIT_CODE).
    pub fn create<C, F>(worker_fn: F, context: C, num_workers: usize) -> Result<Self>
    where
        C: Send + Sync + 'static,
        F: Fn(PoolContext, Arc<C>) + Send + Sync + 'static,
    {
        Self::create_with_config(worker_fn, context, num_workers, PoolConfig::default())
    }

    /// Creates a pool with explicit thread configuration. See
    /// [`ThreadPool::create`].
    pub fn create_with_config<C, F>(
        worker_fn: F,
        context: C,
        num_workers: usize,
        config: PoolConfig,
    ) -> Result<Self>
    where
        C: Send + Sync + 'static,
        F: Fn(PoolContext, Arc<C>) + Send + Sync + 'static,
    {
        if num_workers == 0 {
            return Err(anyhow!(
                "Cannot create a pool with 0 workers. Pool size must be > 0."
            ));
        }

        let shared = Arc::new(PoolShared::new(num_workers));

        if lock(&shared.handles).try_reserve_exact(num_workers).is_err() {
            exit_allocation_failure("worker handle table");
        }

        let context = Arc::new(context);
        let worker_fn = Arc::new(worker_fn);

        for worker_id in 0..num_workers {
            let worker_ctx = PoolContext {
                shared: Arc::clone(&shared),
            };
            let context = Arc::clone(&context);
            let worker_fn = Arc::clone(&worker_fn);

            let mut builder = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name_prefix, worker_id));
            if let Some(bytes) = config.stack_size {
                builder = builder.stack_size(bytes);
            }

            let spawned = builder
                .spawn(move || worker_fn(worker_ctx, context))
                .with_context(|| format!("Failed to spawn worker thread {}", worker_id));

            match spawned {
                Ok(handle) => lock(&shared.handles).push(handle),
                Err(e) => {
                    // No partial pool may outlive a failed create: stop and
                    // reap the workers that did start.
                    error!(
                        "worker {} failed to start, unwinding the partial pool",
                        worker_id
                    );
                    shared.set_stop(true);
                    for handle in std::mem::take(&mut *lock(&shared.handles)) {
                        let _ = handle.join();
                    }
                    return Err(e);
                }
            }
        }

        debug!("started {} pool workers", num_workers);

        Ok(Self { shared })
    }

    /// Requests a cooperative stop.
    ///
    /// Non-blocking and idempotent; has no effect on workers that already
    /// exited, and nothing interrupts a worker that never polls
    /// [`PoolContext::should_stop`].
    pub fn stop(&self) {
        self.shared.set_stop(true);
    }

    /// Sets the stop flag to an arbitrary value. `set_stop(false)` lets a
    /// pool resume after a stop request no worker has acted on yet.
    pub fn set_stop(&self, stop: bool) {
        self.shared.set_stop(stop);
    }

    /// True once a stop has been requested.
    pub fn should_stop(&self) -> bool {
        self.shared.should_stop()
    }

    /// Declared worker count.
    pub fn pool_size(&self) -> usize {
        self.shared.pool_size()
    }

    /// The same handle workers receive, for code probing the pool from
    /// outside the worker threads (liveness checkers, tests).
    pub fn context(&self) -> PoolContext {
        PoolContext {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Joins the pool's workers and releases the coordination state.
    ///
    /// With `None`, every worker is joined in table order, unconditionally.
    /// With `Some(liveness)`, only indices marked true are joined; the rest
    /// are presumed hung, logged, and their handles dropped. A skipped
    /// worker's thread is abandoned, not terminated: there is no
    /// cancellation mechanism, and the thread keeps whatever it holds until
    /// it exits on its own or the process ends. Indices past the end of
    /// `liveness` count as hung.
    ///
    /// Stopping is the caller's move: `join(None)` on workers that poll the
    /// stop flag blocks until [`ThreadPool::stop`] has been called.
    ///
    /// An individual join failure (the worker panicked) is logged and
    /// counted, and the pass continues. The handle table is drained in every
    /// case; a later [`ThreadPool::create`] starts from fully fresh state.
    pub fn join(self, liveness: Option<&[bool]>) -> JoinReport {
        // Take the table out under its lock so the blocking joins below run
        // with no lock held.
        let handles = std::mem::take(&mut *lock(&self.shared.handles));

        match liveness {
            None => info!(
                "joining all {} workers regardless of reported state",
                handles.len()
            ),
            Some(alive) if alive.len() != handles.len() => warn!(
                "liveness input has {} entries for {} workers; missing entries count as hung",
                alive.len(),
                handles.len()
            ),
            Some(_) => {}
        }

        let mut report = JoinReport::default();
        for (worker_id, handle) in handles.into_iter().enumerate() {
            let join_this = match liveness {
                None => true,
                Some(alive) => alive.get(worker_id).copied().unwrap_or(false),
            };

            if !join_this {
                warn!("worker {} is presumed hung, not joining", worker_id);
                report.skipped += 1;
                drop(handle);
                continue;
            }

            debug!("joining worker {}", worker_id);
            match handle.join() {
                Ok(()) => report.joined += 1,
                Err(payload) => {
                    report.failed += 1;
                    error!(
                        "worker {} join failed: {}",
                        worker_id,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        info!(
            "join pass complete: {} joined, {} skipped, {} failed",
            report.joined, report.skipped, report.failed
        );

        report
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        // Graceful fallback when the owner never called `join`: request a
        // stop and reap whatever is still in the table. After an explicit
        // join the table is already empty and this is a no-op.
        self.shared.set_stop(true);
        for handle in std::mem::take(&mut *lock(&self.shared.handles)) {
            let _ = handle.join();
        }
    }
}

/// Best-effort rendering of a panic payload for the join-failure log line.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
