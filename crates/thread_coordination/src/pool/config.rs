//! src/pool/config.rs
//!
//! Configuration for worker thread creation.
//!
//! Example:
//! ```ignore
//! let config = PoolConfig::builder()
//!     .thread_name_prefix("ingest-worker")
//!     .stack_size(2 * 1024 * 1024)
//!     .build();
//!
//! let pool = ThreadPool::create_with_config(worker_fn, context, 4, config)?;
//! ```

/// Configuration for pool worker threads.
#[derive(Clone)]
pub struct PoolConfig {
    /// Prefix for worker thread names; the worker index is appended, so the
    /// default yields `pool-worker-0`, `pool-worker-1`, ...
    pub thread_name_prefix: String,
    /// Stack size per worker in bytes. `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: "pool-worker".to_string(),
            stack_size: None,
        }
    }
}

impl PoolConfig {
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::default()
    }
}

/// Builder for PoolConfig with method chaining
#[derive(Default)]
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    /// Set the worker thread name prefix (shows up in panic messages,
    /// debuggers, and process listings).
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Set the per-worker stack size in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.config.stack_size = Some(bytes);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> PoolConfig {
        self.config
    }
}
