//! Start/stop lifecycle for the status endpoint.
//!
//! The server is a diagnostic aid, not a run dependency: a bind failure is
//! logged and returned to the caller, which is expected to carry on
//! without it. `stop` is idempotent and safe to call before `start`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use trainwatch_core::run_state::RunState;

use crate::error::StatusServerError;
use crate::routes;

/// How long `stop` waits for in-flight requests before aborting the task.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

struct Running {
    addr: SocketAddr,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct StatusServer {
    bind_addr: SocketAddr,
    running: Mutex<Option<Running>>,
}

impl StatusServer {
    /// A stopped server that will bind `bind_addr` on [`start`](Self::start).
    /// Port 0 picks an ephemeral port.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            running: Mutex::new(None),
        }
    }

    /// Bind the listener and serve `state` on a background task.
    ///
    /// Returns once the listener is bound, with the actual local address.
    pub async fn start(&self, state: Arc<RunState>) -> Result<SocketAddr, StatusServerError> {
        let mut running = self.running.lock().await;
        if let Some(current) = running.as_ref() {
            return Err(StatusServerError::AlreadyRunning(current.addr));
        }

        let listener = match TcpListener::bind(self.bind_addr).await {
            Ok(listener) => listener,
            Err(source) => {
                let err = StatusServerError::Bind {
                    addr: self.bind_addr,
                    source,
                };
                tracing::error!(error = %err, "Status endpoint failed to start");
                return Err(err);
            }
        };

        let addr = listener.local_addr().unwrap_or(self.bind_addr);
        let cancel = CancellationToken::new();
        let shutdown = cancel.clone();
        let app = routes::router(state);

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "Status endpoint terminated with error");
            }
        });

        tracing::info!(%addr, "Status endpoint listening");
        *running = Some(Running {
            addr,
            cancel,
            handle,
        });
        Ok(addr)
    }

    /// Stop accepting connections, let in-flight requests finish, release
    /// the listener. No-op when not running.
    pub async fn stop(&self) {
        let Some(Running {
            addr,
            cancel,
            mut handle,
        }) = self.running.lock().await.take()
        else {
            tracing::debug!("Status endpoint not running, nothing to stop");
            return;
        };

        cancel.cancel();
        if tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await.is_err() {
            tracing::warn!(%addr, "Status endpoint did not drain in time, aborting");
            handle.abort();
        }
        tracing::info!(%addr, "Status endpoint stopped");
    }

    /// Address the listener is bound to, while running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|r| r.addr)
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }
}
