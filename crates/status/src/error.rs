use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum StatusServerError {
    #[error("Failed to bind status endpoint on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Status endpoint already running on {0}")]
    AlreadyRunning(SocketAddr),
}
