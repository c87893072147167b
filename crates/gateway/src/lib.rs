//! Storechain gateway library.
//!
//! An HTTP gateway that persists storefront data (storefronts, products,
//! categories, customers, orders and order items) as transactions against a
//! storefront contract on an EVM chain, and serves reads from the same
//! contract.
//!
//! # Architecture
//!
//! - Axum handlers in [`routes`] translate requests into write intents or reads
//! - [`chain::WritePipeline`] validates, encodes, signs, submits and confirms
//! - [`chain::ReadPath`] decodes contract views into records
//! - [`config`] loads every setting, including the signing key, at startup
//!
//! The binary wires these together; integration tests drive [`app`] directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod chain;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::{Router, middleware::from_fn, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the gateway router with health checks, API routes and the
/// request-scoped middleware stack.
///
/// Sentry layers are added by the binary, outside of this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Asks the node for its chain id and compares it with the configured one.
/// Returns 503 Service Unavailable if the node is unreachable or on another
/// chain.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.reader().chain_id().await {
        Ok(id) if id == state.config().chain.chain_id => StatusCode::OK,
        Ok(id) => {
            tracing::warn!(
                node_chain_id = id,
                configured_chain_id = state.config().chain.chain_id,
                "chain id mismatch"
            );
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
