//! OS signal handling.
//!
//! SIGINT and SIGTERM both request a graceful shutdown. There is no SIGHUP
//! handling: the access document is only read at startup.

use tokio::signal::unix::{signal, SignalKind};

/// Wait for SIGINT or SIGTERM and return its name.
pub async fn wait_for_termination() -> Result<&'static str, std::io::Error> {
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}
