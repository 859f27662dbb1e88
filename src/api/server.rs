//! API server lifecycle: bind, spawn the axum server in a background
//! task, and return a handle with a shutdown channel.

use std::net::SocketAddr;

use axum::Router;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind API server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Session metadata for a running API server.
#[derive(Debug, Clone)]
pub struct ServerSession {
    pub session_id: String,
    pub server_addr: SocketAddr,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Ask the server to stop accepting connections and drain.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish.
    pub async fn stopped(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {e}");
            }
        }
    }
}

/// Start serving `app` on `addr`. Port 0 picks an ephemeral port; the
/// bound address is reported in the session.
pub async fn start_api_server(app: Router, addr: SocketAddr) -> Result<ApiServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let session = ServerSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: addr,
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}
