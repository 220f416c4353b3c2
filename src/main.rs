//! Forward-authorization responder.
//!
//! ```text
//!   client ──▶ reverse proxy ──(auth subrequest: REMOTE-USER, X-URI, X-Host)──▶ auth-responder
//!                    ▲                                                               │
//!                    └──────────────── 200 allow / 403 deny / 401 ◀──────────────────┘
//! ```
//!
//! The access document is read once at startup. Listens on a Unix domain
//! socket unless `--bind` asks for TCP.

use clap::Parser;

use auth_responder::config::{ListenerConfig, ObservabilityConfig, ServiceConfig, TimeoutConfig};
use auth_responder::lifecycle::{self, Shutdown};
use auth_responder::observability::logging;

/// Command-line arguments for `auth-responder`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of the Unix domain socket to listen on
    #[arg(long, default_value = ListenerConfig::DEFAULT_SOCKET_PATH)]
    socket: String,

    /// Listen on this TCP address instead of the Unix socket
    #[arg(long)]
    bind: Option<String>,

    /// The access document to read
    #[arg(long, default_value = ServiceConfig::DEFAULT_ACCESS_FILE)]
    config: String,

    /// Run in debug mode (pretty, verbose logs)
    #[arg(long)]
    debug: bool,

    /// Expose Prometheus metrics on this address
    #[arg(long)]
    metrics_address: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = TimeoutConfig::default().request_secs)]
    request_timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            listener: ListenerConfig {
                socket_path: self.socket,
                bind_address: self.bind,
                ..Default::default()
            },
            access_file: self.config,
            timeouts: TimeoutConfig {
                request_secs: self.request_timeout_secs,
            },
            observability: ObservabilityConfig {
                debug: self.debug,
                metrics_address: self.metrics_address,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config();
    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "auth-responder starting");

    let (server, listener) = match lifecycle::prepare(&config).await {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!(error = %e, file = %config.access_file, "Startup failed");
            return Err(e.into());
        }
    };

    // Subscribe before the signal task exists so an early signal is not lost.
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let _signal_task = shutdown.trigger_on_signal();

    tracing::info!(address = %listener.describe(), "Started listening");
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
