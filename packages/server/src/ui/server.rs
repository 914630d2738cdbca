//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::net::TcpListener;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::{config::ServerConfig, domain::PeerAddr};

use super::{
    error::ServerError, handler::handle_connection, signal::shutdown_signal, state::AppState,
};

/// Pause after a failed accept (e.g. file descriptor exhaustion) before retrying
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// TCP relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(state, config.shutdown_grace);
/// server.run(&config).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// How long shutdown waits for open connections to close
    shutdown_grace: Duration,
}

impl Server {
    /// Create a new Server instance
    pub fn new(state: Arc<AppState>, shutdown_grace: Duration) -> Self {
        Self {
            state,
            shutdown_grace,
        }
    }

    /// Bind the listening socket
    pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM
    pub async fn run(&self, config: &ServerConfig) -> Result<(), ServerError> {
        let listener = Self::bind(&config.bind_addr()).await?;
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await;
        Ok(())
    }

    /// Accept connections on `listener` until `shutdown` resolves.
    ///
    /// Each accepted connection gets its own task. On shutdown the listener is
    /// dropped, every handler is told to close and the server waits up to the
    /// grace period for them to finish.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        match listener.local_addr() {
            Ok(addr) => tracing::info!("Relay server listening on {}", addr),
            Err(e) => tracing::warn!("Relay server listening on unknown address: {}", e),
        }

        let connections = TaskTracker::new();
        let closing = CancellationToken::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        tracing::debug!("Accepted connection from {}", addr);
                        let (reader, writer) = stream.into_split();
                        let state = self.state.clone();
                        let closing = closing.clone();
                        connections.spawn(async move {
                            let reason =
                                handle_connection(reader, writer, PeerAddr::from(addr), state, closing)
                                    .await;
                            tracing::debug!("Connection from {} finished: {}", addr, reason);
                        });
                    }
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                        if pause_unless_shutdown(&mut shutdown, ACCEPT_ERROR_BACKOFF).await {
                            break;
                        }
                    }
                },
            }
        }

        drop(listener);
        tracing::info!("Stopped accepting connections, closing {} open", connections.len());
        connections.close();
        closing.cancel();

        if tokio::time::timeout(self.shutdown_grace, connections.wait())
            .await
            .is_err()
        {
            tracing::warn!(
                "{} connections still open after {:?}, giving up",
                connections.len(),
                self.shutdown_grace
            );
        }

        tracing::info!("Server shutdown complete");
    }
}

/// Sleep for `pause`, returning early with `true` if `shutdown` resolves first.
async fn pause_unless_shutdown<S>(shutdown: &mut S, pause: Duration) -> bool
where
    S: Future<Output = ()> + Unpin,
{
    tokio::select! {
        _ = shutdown => true,
        _ = tokio::time::sleep(pause) => false,
    }
}
