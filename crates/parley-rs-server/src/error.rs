use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised while starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid bind address '{bind}': expected host:port")]
    InvalidBind { bind: String },
    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server exited unexpectedly")]
    Serve(#[source] std::io::Error),
}
