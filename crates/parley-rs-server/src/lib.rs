//! HTTP surface for Parley: `GET /ping` and `POST /invocations`.

mod error;
mod routes;

pub use error::ServerError;
pub use routes::{INVOCATIONS_ENDPOINT, InvocationResponse, PING_ENDPOINT, router};

use log::info;
use parley_rs_core::SessionOrchestrator;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind `bind` and serve until ctrl-c.
pub async fn serve(orchestrator: SessionOrchestrator, bind: &str) -> Result<(), ServerError> {
    let addr: SocketAddr = bind.parse().map_err(|_| ServerError::InvalidBind {
        bind: bind.to_string(),
    })?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local_addr = listener.local_addr().map_err(ServerError::Serve)?;
    info!("agent server listening (addr={local_addr})");

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .map_err(ServerError::Serve)?;
    Ok(())
}
