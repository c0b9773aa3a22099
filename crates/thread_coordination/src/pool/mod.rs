//! src/pool/mod.rs
//!
//! This module implements the worker pool lifecycle manager.
//!
//! The `ThreadPool` owns a fixed-size set of OS worker threads running a
//! caller-supplied function, a cooperative stop flag the workers poll, and a
//! status array the workers report liveness into. It manages existence,
//! shutdown, and liveness reporting only: work distribution, scheduling, and
//! result collection are the caller's business.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌────────────┐
//!                   │ ThreadPool │ ←───── PoolConfig (thread names, stack size)
//!                   └─────┬──────┘
//!                         │ owns (Arc)
//!                         ↓
//!                  ┌────────────┐   handle table / pool size /
//!                  │ PoolShared │   stop flag / status array
//!                  └─────┬──────┘   (one exclusive lock per field)
//!                        │ cloned into every worker as a PoolContext
//!                        ↓
//!                 [Worker Threads]
//!                        │ poll should_stop(), self-report via
//!                        │ set_status_element(find_my_index(), tag)
//!                        ↓
//!                  caller liveness checks ──→ join(Some(liveness))
//! ```
//!
//! # Module Structure
//!
//! ```text
//! src/pool/
//! ├── mod.rs       # Public API exports + module-level architecture docs
//! ├── config.rs    # PoolConfig, builder
//! ├── manager.rs   # ThreadPool: creation, stop signaling, join/teardown
//! ├── shared.rs    # PoolShared locked fields + worker-facing PoolContext
//! └── status.rs    # Status-array operations
//! ```
//!
//! # Example Usage
//!
//! ```ignore
//! let pool = ThreadPool::create(
//!     |ctx: PoolContext, _cfg: Arc<ScanConfig>| {
//!         let index = loop {
//!             // Creation races the first lookups; retry until the handle
//!             // table contains this thread.
//!             match ctx.find_my_index() {
//!                 Some(index) => break index,
//!                 None => wait_millis(1).ok(),
//!             };
//!         };
//!         while !ctx.should_stop() {
//!             ctx.set_status_element(index, std::process::id() as i32);
//!             // ... one unit of the caller's work ...
//!         }
//!     },
//!     scan_config,
//!     4,
//! )?;
//!
//! pool.create_status_array();
//! // ... later, from a liveness check:
//! let alive: Vec<bool> = pool.status_array().iter().map(|s| *s != 0).collect();
//! pool.stop();
//! pool.join(Some(&alive));
//! ```
//!
//! # Shutdown semantics
//!
//! Stopping is cooperative: `stop()` flips a flag and workers observe it on
//! their next poll. Nothing interrupts a worker that never polls; the
//! sanctioned escape hatch is `join(Some(liveness))`, which skips workers
//! reported hung and abandons their threads rather than blocking forever.

mod config;
mod manager;
mod shared;
mod status;

pub use config::{PoolConfig, PoolConfigBuilder};
pub use manager::{JoinReport, ThreadPool};
pub use shared::PoolContext;

/// Process exit status reserved for out-of-memory conditions.
///
/// Failing to allocate the handle table or the status array leaves the
/// coordination layer unusable; the process terminates with this code rather
/// than running a partial pool.
pub const ALLOC_FAILURE_EXIT_CODE: i32 = 12;
