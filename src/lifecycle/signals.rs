//! OS signal handling.

use crate::lifecycle::Shutdown;

/// Wait for ctrl-c and trigger shutdown when it arrives.
///
/// If the signal handler cannot be installed the task logs and returns;
/// the process then only stops when the listener errors out.
pub async fn trigger_on_ctrl_c(shutdown: &Shutdown) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("ctrl-c received, shutting down");
            shutdown.trigger();
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to install ctrl-c handler");
        }
    }
}
