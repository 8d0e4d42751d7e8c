pub mod config;
pub mod error;
pub mod state;
pub mod gate;
pub mod auth;
pub mod session;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::gate::LoginGate;
use crate::middleware::authenticate::mark_authenticated;
use crate::middleware::login_gate::ensure_logged_in;
use crate::session::{MemorySessionStore, session_layer};
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config) -> (Router, SharedState) {
    let gate = LoginGate::new(config.gate.clone());

    tracing::info!(
        redirect_to = %gate.options().redirect_to,
        set_return_to = gate.options().set_return_to,
        "Login gate configured"
    );

    let state: SharedState = Arc::new(AppState {
        config,
        gate: gate.clone(),
        sessions: MemorySessionStore::new(),
    });

    // Gate layers sit on the inner routers so nested paths see their
    // prefix stripped while `OriginalUri` keeps the full one.
    let protected = Router::new()
        .merge(routes::account_routes().layer(from_fn_with_state(gate.clone(), ensure_logged_in)))
        .nest(
            "/admin",
            routes::admin_routes().layer(from_fn_with_state(gate, ensure_logged_in)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(state.clone(), session_layer))
                .layer(from_fn(mark_authenticated)),
        );

    // Security headers
    let app = Router::new()
        .merge(protected)
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
