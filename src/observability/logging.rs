//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Pick output format and default verbosity from `ObservabilityConfig`
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development (`--debug`)
//! - `RUST_LOG` overrides the default filter

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directives for the given mode.
pub fn default_directives(config: &ObservabilityConfig) -> &'static str {
    if config.debug {
        "auth_responder=debug,tower_http=debug"
    } else {
        "auth_responder=info,tower_http=info"
    }
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.debug {
        registry.with(fmt::layer().pretty()).init();
    } else {
        registry.with(fmt::layer().json()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        let mut config = ObservabilityConfig::default();
        assert_eq!(default_directives(&config), "auth_responder=info,tower_http=info");

        config.debug = true;
        assert!(default_directives(&config).contains("auth_responder=debug"));
    }
}
