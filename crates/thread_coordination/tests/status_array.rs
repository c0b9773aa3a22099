//! Status-array behavior: bounds checking, reinitialization semantics, and
//! snapshot stability.

mod common;
use common::{eventually, idle_worker, init_tracing};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use thread_coordination::{wait_millis, PoolContext, ThreadPool};

#[test]
fn test_set_status_element_is_bounds_checked() -> Result<()> {
    init_tracing();
    let pool = ThreadPool::create(idle_worker, (), 2)?;
    pool.create_status_array();

    assert!(pool.set_status_element(0, 5));
    assert!(pool.set_status_element(1, 7));
    assert!(!pool.set_status_element(2, 9));
    // The out-of-range write left the array unmodified.
    assert_eq!(pool.status_array(), vec![5, 7]);

    pool.stop();
    pool.join(None);
    Ok(())
}

#[test]
fn test_status_ops_before_create_are_safe() -> Result<()> {
    let pool = ThreadPool::create(idle_worker, (), 2)?;

    assert!(pool.status_array().is_empty());
    assert!(!pool.set_status_element(0, 1));

    // init with no array yet takes the reallocation path and produces a
    // zeroed array of the declared pool size.
    pool.init_status_array();
    assert_eq!(pool.status_array(), vec![0, 0]);

    pool.stop();
    pool.join(None);
    Ok(())
}

#[test]
fn test_init_zeroes_in_place_when_size_is_unchanged() -> Result<()> {
    let pool = ThreadPool::create(idle_worker, (), 3)?;
    pool.create_status_array();
    assert!(pool.set_status_element(0, 11));
    assert!(pool.set_status_element(2, 13));

    pool.init_status_array();
    assert_eq!(pool.status_array(), vec![0, 0, 0]);

    pool.stop();
    pool.join(None);
    Ok(())
}

#[test]
fn test_create_discards_previous_contents() -> Result<()> {
    let pool = ThreadPool::create(idle_worker, (), 2)?;
    pool.create_status_array();
    assert!(pool.set_status_element(1, 99));

    pool.create_status_array();
    assert_eq!(pool.status_array(), vec![0, 0]);

    pool.stop();
    pool.join(None);
    Ok(())
}

#[test]
fn test_snapshot_is_unaffected_by_reinitialization() -> Result<()> {
    let pool = ThreadPool::create(idle_worker, (), 2)?;
    pool.create_status_array();
    assert!(pool.set_status_element(0, 21));
    assert!(pool.set_status_element(1, 22));

    let snapshot = pool.status_array();
    pool.init_status_array();

    // The snapshot is a copy; reinitializing the live array cannot resize
    // or clear what the caller already holds.
    assert_eq!(snapshot, vec![21, 22]);
    assert_eq!(pool.status_array(), vec![0, 0]);

    pool.stop();
    pool.join(None);
    Ok(())
}

#[test]
fn test_worker_reports_are_visible_through_a_context() -> Result<()> {
    let pool = ThreadPool::create(
        |ctx: PoolContext, _c: Arc<()>| {
            let index = loop {
                match ctx.find_my_index() {
                    Some(index) => break index,
                    None => {
                        let _ = wait_millis(1);
                    }
                }
            };
            while !ctx.should_stop() {
                ctx.set_status_element(index, (index as i32) + 100);
                let _ = wait_millis(1);
            }
        },
        (),
        2,
    )?;
    pool.create_status_array();

    // A liveness checker holding only a context sees the reports.
    let probe = pool.context();
    assert!(eventually(Duration::from_secs(5), || {
        probe.status_array() == vec![100, 101]
    }));
    assert!(!probe.set_status_element(2, 1));

    pool.stop();
    pool.join(None);
    Ok(())
}
