use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ServerSettings;
use crate::error::ApiError;
use crate::routes::router;
use crate::state::AppState;

/// Bind the listener and serve until Ctrl-C
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
/// `Io` if the address cannot be bound or the server fails.
pub async fn serve(settings: &ServerSettings, state: AppState) -> Result<(), ApiError> {
    let listener = TcpListener::bind(settings.addr()).await?;
    info!(addr = %listener.local_addr()?, "Starting HTTP server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => error!(error = %e, "failed to listen for shutdown signal"),
    }
}
