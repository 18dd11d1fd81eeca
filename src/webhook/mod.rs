//! HTTP dispatcher for the mutating admission webhook
//!
//! The `/mutate` route is registered for every method on purpose: method
//! validation is part of this handler's contract (a wrong method is a 400,
//! not a router-level 405), and liveness probes are answered before any of
//! the admission preconditions are checked. TLS termination and webhook
//! registration with the API server happen outside this process.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use tracing::{debug, info, warn};

use crate::admission::AdmissionReview;
use crate::error::WebhookError;
use crate::mutate::{Mutate, Mutator};

/// Default User-Agent marker identifying liveness/readiness probes
pub const DEFAULT_PROBE_USER_AGENT: &str = "Kubelet";

/// Shared state for webhook handlers
#[derive(Debug, Clone)]
pub struct WebhookState {
    /// The mutation use-case this webhook serves
    mutator: Mutator,
    /// User-Agent prefix that identifies probe traffic
    probe_user_agent: String,
}

impl WebhookState {
    /// Create webhook state around the selected mutator
    pub fn new(mutator: Mutator) -> Self {
        Self {
            mutator,
            probe_user_agent: DEFAULT_PROBE_USER_AGENT.to_string(),
        }
    }

    /// Override the probe User-Agent marker
    pub fn with_probe_user_agent(mut self, marker: impl Into<String>) -> Self {
        self.probe_user_agent = marker.into();
        self
    }
}

/// Create the webhook router with all mutation endpoints
pub fn webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/mutate", any(mutate_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// Bind and serve the webhook router until the server exits
pub async fn start_webhook_server(
    addr: SocketAddr,
    state: Arc<WebhookState>,
) -> std::io::Result<()> {
    let app = webhook_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "toleration webhook listening");
    axum::serve(listener, app).await
}

/// Handle admission traffic on `/mutate`
///
/// Transport preconditions, in order: probe bypass, POST only, exact
/// `application/json` content type (before the body is touched), non-empty
/// parseable envelope with a request field. Failing any of these is a 400
/// with no admission envelope written. Once a request is decoded the answer
/// is always a 200 carrying the admission decision; the only 500 is a
/// response serialization failure.
async fn mutate_handler(
    State(state): State<Arc<WebhookState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !state.probe_user_agent.is_empty() && user_agent.starts_with(&state.probe_user_agent) {
        debug!(user_agent = %user_agent, "answering probe");
        return Ok(StatusCode::OK.into_response());
    }

    if method != Method::POST {
        warn!(method = %method, "rejecting admission request with wrong method");
        return Err(WebhookError::InvalidReview(
            "only POST is accepted".to_string(),
        ));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if content_type != Some("application/json") {
        warn!(content_type = ?content_type, "rejecting admission request with wrong content type");
        return Err(WebhookError::InvalidReview(
            "Content-Type must be application/json".to_string(),
        ));
    }

    if body.is_empty() {
        return Err(WebhookError::InvalidReview("empty request body".to_string()));
    }

    let review: AdmissionReview = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "failed to parse admission review");
        WebhookError::InvalidReview(format!("malformed admission review: {e}"))
    })?;

    let request = review.request.ok_or_else(|| {
        WebhookError::InvalidReview("admission review has no request".to_string())
    })?;

    let response = state.mutator.decide(&request);
    debug!(uid = %response.uid, allowed = response.allowed, "admission decision made");

    // The only path that can produce a 500.
    let bytes = serde_json::to_vec(&response.into_review())?;
    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        bytes,
    )
        .into_response())
}
