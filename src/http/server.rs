//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with the single auth handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Translate request headers into an `AccessRequest`
//! - Map the verdict to a status code: 200 allow, 403 deny, 401 incomplete
//! - Serve on a Unix socket or TCP listener until shutdown

use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    routing::any,
    Router,
};
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::authz::{evaluate, AccessPolicy, AccessRequest};
use crate::config::ServiceConfig;
use crate::http::{REMOTE_USER, X_CERT, X_HOST, X_REQUEST_ID, X_URI};
use crate::identity::extract_user;
use crate::net::Listener;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<AccessPolicy>,
}

/// HTTP server answering forward-auth subrequests.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving decisions from `policy`.
    pub fn new(config: &ServiceConfig, policy: Arc<AccessPolicy>) -> Self {
        let state = AppState { policy };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(auth_handler))
            .route("/", any(auth_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!("auth_request", request_id = %request_id, method = %request.method())
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %listener.describe(), "HTTP server starting");

        let signal = async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
        };

        match listener {
            Listener::Tcp(tcp) => {
                axum::serve(tcp, self.router)
                    .with_graceful_shutdown(signal)
                    .await?
            }
            // The guard removes the socket file once serving stops.
            Listener::Unix(unix, _guard) => {
                axum::serve(unix, self.router)
                    .with_graceful_shutdown(signal)
                    .await?
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Value of header `name` as UTF-8, or `""` when absent or not valid UTF-8.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .unwrap_or_default()
}

/// Certificates may arrive URL-escaped (nginx `$ssl_client_escaped_cert`).
fn unescape_cert(raw: &str) -> Cow<'_, str> {
    if raw.contains('%') {
        if let Ok(decoded) = urlencoding::decode(raw) {
            return decoded;
        }
    }
    Cow::Borrowed(raw)
}

/// Forward-auth handler.
async fn auth_handler(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    let start_time = Instant::now();

    let user = header_str(&headers, REMOTE_USER);
    let uri = header_str(&headers, X_URI);
    let host = header_str(&headers, X_HOST);

    tracing::debug!(host = %host, uri = %uri, user = %user, "Handling request");

    let request = AccessRequest::new(user, uri, host);
    if request.is_incomplete() {
        tracing::error!("REMOTE-USER, X-URI or X-Host header not set");
        metrics::record_request(StatusCode::UNAUTHORIZED.as_u16(), start_time);
        return StatusCode::UNAUTHORIZED;
    }

    // Logged only. The decision below always uses REMOTE-USER.
    let cert = header_str(&headers, X_CERT);
    if !cert.is_empty() {
        let cert_user = extract_user(&unescape_cert(cert));
        if !cert_user.is_empty() {
            tracing::info!(user = %cert_user, "Got user out of certificate");
        }
    }

    let decision = evaluate(&state.policy, &request);
    metrics::record_decision(&decision);

    let status = if decision.is_allowed() {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    };
    metrics::record_request(status.as_u16(), start_time);
    status
}
