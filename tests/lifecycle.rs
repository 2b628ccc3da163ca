//! Integration tests for the two-phase shutdown sequence.

use std::time::{Duration, Instant};

use command_gateway::lifecycle::{LifecycleController, LifecycleState};
use command_gateway::session::SessionRegistry;

fn controller(drain_deadline: Duration) -> LifecycleController {
    LifecycleController::new(SessionRegistry::new(), drain_deadline)
}

#[tokio::test]
async fn test_drain_then_terminate() {
    let controller = controller(Duration::from_secs(5));
    let guard = controller.sessions().open();
    assert_eq!(controller.sessions().active_count(), 1);

    // The session finishes well within the deadline.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(guard);
    });

    controller.shutdown();
    assert_eq!(controller.state(), LifecycleState::GracefulDraining);

    let start = Instant::now();
    tokio::time::timeout(Duration::from_secs(2), controller.run())
        .await
        .expect("run should return once the drain completes");

    assert_eq!(controller.state(), LifecycleState::Stopped);
    assert!(
        start.elapsed() < Duration::from_secs(2),
        "drain success must not wait out the full deadline"
    );
    assert_eq!(controller.sessions().active_count(), 0);
}

#[tokio::test]
async fn test_drain_timeout_still_terminates() {
    let controller = controller(Duration::from_millis(300));
    // Never dropped: the registry never drains.
    let _guard = controller.sessions().open();

    let start = Instant::now();
    controller.shutdown();
    tokio::time::timeout(Duration::from_secs(2), controller.run())
        .await
        .expect("run should return shortly after the drain deadline");

    let elapsed = start.elapsed();
    assert_eq!(controller.state(), LifecycleState::Stopped);
    assert!(
        elapsed >= Duration::from_millis(300),
        "termination should wait out the deadline, took {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_millis(1500),
        "termination should not overshoot the deadline by much, took {elapsed:?}"
    );
}

#[tokio::test]
async fn test_double_shutdown_skips_the_remaining_deadline() {
    let controller = controller(Duration::from_secs(3600));
    let _guard = controller.sessions().open();

    let start = Instant::now();
    controller.shutdown();
    controller.shutdown();

    tokio::time::timeout(Duration::from_secs(2), controller.run())
        .await
        .expect("a repeated shutdown should force termination immediately");

    assert_eq!(controller.state(), LifecycleState::Stopped);
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_registered_tasks_are_cancelled_once() {
    let controller = controller(Duration::from_millis(50));

    // A task that would run for an hour unless cancelled.
    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
    controller.register_task(tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        let _ = done_tx.send(());
    }));

    controller.shutdown();
    tokio::time::timeout(Duration::from_secs(2), controller.run())
        .await
        .expect("run should cancel the long task instead of awaiting it");

    // The task was aborted, so its completion channel is dropped unsent.
    assert!(done_rx.await.is_err());
    assert_eq!(controller.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn test_cancel_signal_fires_on_termination() {
    let controller = controller(Duration::from_millis(50));
    let mut cancel = controller.subscribe_cancel();

    controller.shutdown();
    controller.run().await;

    // Cooperative loops subscribed before shutdown observe the broadcast.
    assert!(cancel.try_recv().is_ok());
}
