pub mod pool;
pub mod wait;

pub use pool::{JoinReport, PoolConfig, PoolConfigBuilder, PoolContext, ThreadPool};
pub use wait::{wait_for, wait_millis, wait_seconds, ClockError};
