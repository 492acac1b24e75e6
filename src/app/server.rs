use crate::error::ReporterError;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Bind the HTTP listener on all interfaces.
pub async fn bind(http_port: u16) -> Result<TcpListener, ReporterError> {
    let address = format!("0.0.0.0:{http_port}");
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(source) => return Err(ReporterError::Bind { address, source }),
    };
    info!(
        address = %listener.local_addr()?,
        routes = "/log /register /healthcheck",
        "Reporter listening"
    );
    Ok(listener)
}

/// Serve until SIGINT/SIGTERM or until `shutdown_token` is cancelled.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown_token: CancellationToken,
) -> Result<(), ReporterError> {
    let token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_token.cancelled_owned())
        .await?;

    info!("Reporter stopped");
    Ok(())
}

/// Resolves on the first SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal as unix_signal};
        match unix_signal(SignalKind::terminate()) {
            Ok(mut sigterm) => tokio::select! {
                res = signal::ctrl_c() => log_interrupt(res),
                _ = sigterm.recv() => info!("SIGTERM received, stopping reporter"),
            },
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable, listening for SIGINT only");
                log_interrupt(signal::ctrl_c().await);
            }
        }
    }

    #[cfg(not(unix))]
    log_interrupt(signal::ctrl_c().await);
}

fn log_interrupt(res: std::io::Result<()>) {
    match res {
        Ok(()) => info!("SIGINT received, stopping reporter"),
        Err(e) => warn!(error = %e, "Failed to listen for SIGINT"),
    }
}
