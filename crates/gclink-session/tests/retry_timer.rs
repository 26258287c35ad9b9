//! Integration tests for the retry timer.
//!
//! Time is paused: sleeping in the test auto-advances the clock to the next
//! timer deadline, so multi-second schedules run instantly and exactly.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use gclink_session::RetryTimer;

fn counter() -> Arc<AtomicU32> {
    Arc::new(AtomicU32::new(0))
}

// =========================================================================
// Periodic
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_arm_fires_first_then_every_period() {
    let fired = counter();
    let mut timer = RetryTimer::new("hello");
    let hits = Arc::clone(&fired);
    timer.arm(Duration::from_secs(1), Duration::from_secs(30), move || {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        }
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    // Deadlines at 1s, 31s, 61s, 91s.
    tokio::time::sleep(Duration::from_secs(95)).await;
    tokio::task::yield_now().await;
    assert_eq!(fired.load(Ordering::SeqCst), 4);
    assert!(timer.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_arm_stops_on_break() {
    let fired = counter();
    let mut timer = RetryTimer::new("limited");
    let hits = Arc::clone(&fired);
    timer.arm(Duration::ZERO, Duration::from_secs(1), move || {
        let hits = Arc::clone(&hits);
        async move {
            let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    });

    tokio::time::sleep(Duration::from_secs(10)).await;
    tokio::task::yield_now().await;
    assert_eq!(fired.load(Ordering::SeqCst), 3);
    assert!(!timer.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_disarm_stops_future_firings() {
    let fired = counter();
    let mut timer = RetryTimer::new("hello");
    let hits = Arc::clone(&fired);
    timer.arm(Duration::from_secs(1), Duration::from_secs(1), move || {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        }
    });

    tokio::time::sleep(Duration::from_millis(2500)).await;
    timer.disarm();
    let seen = fired.load(Ordering::SeqCst);
    assert_eq!(seen, 2);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(fired.load(Ordering::SeqCst), seen);
    assert!(!timer.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_rearm_replaces_previous_schedule() {
    let first = counter();
    let second = counter();
    let mut timer = RetryTimer::new("hello");

    let hits = Arc::clone(&first);
    timer.arm(Duration::from_secs(5), Duration::from_secs(5), move || {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        }
    });
    let hits = Arc::clone(&second);
    timer.arm(Duration::from_secs(1), Duration::from_secs(100), move || {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        }
    });

    tokio::time::sleep(Duration::from_secs(20)).await;
    tokio::task::yield_now().await;
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

// =========================================================================
// One-shot
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_arm_once_fires_once() {
    let fired = counter();
    let mut timer = RetryTimer::new("launch");
    let hits = Arc::clone(&fired);
    timer.arm_once(Duration::from_secs(1), move || async move {
        hits.fetch_add(1, Ordering::SeqCst);
    });
    assert!(timer.is_armed());

    tokio::time::sleep(Duration::from_secs(5)).await;
    tokio::task::yield_now().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!timer.is_armed());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_timer_cancels_pending_action() {
    let fired = counter();
    {
        let mut timer = RetryTimer::new("reconnect");
        let hits = Arc::clone(&fired);
        timer.arm_once(Duration::from_secs(5), move || async move {
            hits.fetch_add(1, Ordering::SeqCst);
        });
    }
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}
