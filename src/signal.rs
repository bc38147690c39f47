//! Termination signal handling.

use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Wait for Ctrl+C or, on unix, SIGTERM, SIGUSR1 or SIGUSR2.
pub async fn exit_requested() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    {
        use signal::unix::SignalKind;

        tokio::select! {
            _ = ctrl_c => {},
            _ = unix_signal(SignalKind::terminate(), "SIGTERM") => {},
            _ = unix_signal(SignalKind::user_defined1(), "SIGUSR1") => {},
            _ = unix_signal(SignalKind::user_defined2(), "SIGUSR2") => {},
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}

#[cfg(unix)]
async fn unix_signal(kind: signal::unix::SignalKind, name: &str) {
    match signal::unix::signal(kind) {
        Ok(mut sig) => {
            sig.recv().await;
        }
        Err(e) => {
            tracing::error!("Failed to install {} handler: {}", name, e);
            std::future::pending::<()>().await;
        }
    }
}

/// Cancel `token` when an exit signal arrives. The task ends quietly if the
/// token is cancelled some other way first.
pub fn cancel_on_signal(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = exit_requested() => {
                tracing::warn!("Exiting program as requested.");
                token.cancel();
            }
            _ = token.cancelled() => {}
        }
    })
}
