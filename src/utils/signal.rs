use tokio::signal;

/// Resolves on Ctrl+C so axum can finish in-flight requests before exiting.
pub async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        return;
    }

    #[cfg(not(windows))]
    println!();
    tracing::info!("Ctrl+C received. Please wait, this could take a while.");
}
