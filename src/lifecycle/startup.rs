//! Startup orchestration.
//!
//! Order: access document → lint → compile → metrics → listener.
//! Any error is fatal; the process never serves without a complete policy.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use crate::authz::AccessPolicy;
use crate::config::{lint_document, load_document_file, ConfigError, ServiceConfig};
use crate::http::HttpServer;
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;

/// Fatal startup failure.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not load access configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not open listener: {0}")]
    Listener(#[from] ListenerError),
}

/// Load and compile the access document named in `config`.
pub fn load_access_policy(config: &ServiceConfig) -> Result<AccessPolicy, ConfigError> {
    let path = Path::new(&config.access_file);
    let document = load_document_file(path)?;

    for warning in lint_document(&document) {
        tracing::warn!(file = ?path, "{}", warning);
    }

    let policy = AccessPolicy::from_document(document);
    tracing::info!(
        file = ?path,
        admins = policy.admin_count(),
        hosts = policy.host_count(),
        rules = policy.rule_count(),
        "Access configuration loaded"
    );
    Ok(policy)
}

/// Prepare everything needed to serve: policy, metrics, listener.
pub async fn prepare(config: &ServiceConfig) -> Result<(HttpServer, Listener), StartupError> {
    let policy = Arc::new(load_access_policy(config)?);

    if let Some(address) = &config.observability.metrics_address {
        match address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(metrics_address = %address, error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(metrics_address = %address, "Failed to parse metrics address"),
        }
    }

    let listener = Listener::bind(&config.listener).await?;
    let server = HttpServer::new(config, policy);

    Ok((server, listener))
}
