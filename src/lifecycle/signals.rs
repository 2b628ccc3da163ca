//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for interrupt and termination signals
//! - Map both onto the controller's shutdown entry point
//!
//! A second signal while a drain is pending escalates to forced
//! termination via [`LifecycleController::shutdown`]. No other signals
//! are handled.

use tokio::signal::unix::{signal, SignalKind};

use crate::lifecycle::controller::LifecycleController;

/// Install SIGINT and SIGTERM handlers driving `controller`.
///
/// The listener task is registered with the controller so it is cancelled
/// along with the rest of the host's background work.
pub fn install(controller: &LifecycleController) -> std::io::Result<()> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    let driver = controller.clone();
    let listener = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = interrupt.recv() => tracing::info!("Received SIGINT"),
                _ = terminate.recv() => tracing::info!("Received SIGTERM"),
            }
            driver.shutdown();
        }
    });
    controller.register_task(listener);

    Ok(())
}
