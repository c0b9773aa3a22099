use std::sync::Arc;
use std::time::{Duration, Instant};

use thread_coordination::{wait_millis, PoolContext};

/// Opt-in log output for debugging test runs: `RUST_LOG=debug cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Polls `cond` until it holds or `timeout` expires. True when it held.
pub fn eventually<F: Fn() -> bool>(timeout: Duration, cond: F) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

/// Worker body that just polls for stop, for tests that only exercise the
/// manager-side API.
#[allow(dead_code)]
pub fn idle_worker(ctx: PoolContext, _context: Arc<()>) {
    while !ctx.should_stop() {
        let _ = wait_millis(1);
    }
}
