use std::time::Duration;

use actix_web::dev::ServerHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::system::wait_for_termination;

/// Wait for a termination signal, then stop the server.
///
/// In-flight requests get `grace` to finish; whatever is still running
/// afterwards is dropped.
pub async fn listen_for_shutdown(handle: ServerHandle, grace: Duration) {
    wait_for_termination().await;
    warn!(
        "Shutdown signal received, draining connections (up to {}s)...",
        grace.as_secs()
    );

    match timeout(grace, handle.stop(true)).await {
        Ok(()) => info!("All connections drained"),
        Err(_) => {
            error!(
                "Graceful shutdown timed out after {} seconds, forcing stop",
                grace.as_secs()
            );
            handle.stop(false).await;
        }
    }
}
