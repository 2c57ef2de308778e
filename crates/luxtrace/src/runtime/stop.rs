//! Stop — turn Ctrl+C / SIGTERM into a cancelled token.

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Wait for an interrupt, then cancel `token`.
pub async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, stopping session...");
        },
        _ = terminate => {
            warn!("Received SIGTERM, stopping session...");
        },
        _ = token.cancelled() => return,
    }
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        cancel_on_signal(token.clone()).await;
        assert!(token.is_cancelled());
    }
}
