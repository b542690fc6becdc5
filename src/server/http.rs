// src/server/http.rs

//! The HTTP transport: turns inbound requests into dispatcher calls and
//! serializes envelopes back to the caller. Thin plumbing by design; all
//! failure handling lives in the dispatcher.

use crate::core::Params;
use crate::core::envelope::Envelope;
use crate::server::context::ServerState;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::{debug, error};

pub fn app(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/_commands", get(list_commands))
        .route("/{command}", get(command))
        .route("/{command}/{method}", get(command_with_method))
        .with_state(state)
}

/// Serves the static landing page from the configured static directory.
async fn index(State(state): State<Arc<ServerState>>) -> Response {
    let path = std::path::Path::new(&state.config.static_dir).join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/html; charset=UTF-8")],
            body,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "index.html not found").into_response(),
    }
}

/// Lists every accepted command name and alias with its canonical name.
async fn list_commands(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<Params>,
) -> Response {
    debug!("Listing all commands");
    let registry = state.registry();
    let body = if params.contains_key("pretty") {
        serde_json::to_string_pretty(registry.list_all())
    } else {
        serde_json::to_string(registry.list_all())
    };
    match body {
        Ok(body) => json_response(body),
        Err(e) => {
            error!("Failed to serialize command listing: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn command(
    State(state): State<Arc<ServerState>>,
    uri: Uri,
    Path(command): Path<String>,
    Query(params): Query<Params>,
) -> Response {
    run_command(state, uri, command, None, params).await
}

async fn command_with_method(
    State(state): State<Arc<ServerState>>,
    uri: Uri,
    Path((command, method)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Response {
    run_command(state, uri, command, Some(method), params).await
}

/// Consults the cache, dispatches on a miss, and caches successful
/// envelopes. The cache key is the full request identity: path plus query
/// string.
async fn run_command(
    state: Arc<ServerState>,
    uri: Uri,
    name: String,
    method: Option<String>,
    params: Params,
) -> Response {
    debug!(
        "Executing command {}/{}",
        name,
        method.as_deref().unwrap_or("-")
    );

    let key = uri.to_string();
    let pretty = params.contains_key("pretty");

    if state.caching_enabled() {
        if let Some(envelope) = state.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return envelope_response(&envelope, pretty);
        }
    }

    let outcome = state
        .dispatcher()
        .run(&name, method.as_deref(), &params)
        .await;

    // Development-only override: surface the captured failure in full once
    // it has been recorded in the envelope.
    if state.config.debug {
        if let Some(err) = &outcome.failure {
            error!("Dispatch failure for <{}>: {:?}", name, err);
        }
    }

    // Erroring responses are never cached.
    if state.caching_enabled() && !outcome.envelope.is_error() {
        state.cache.put(key, outcome.envelope.clone());
    }

    envelope_response(&outcome.envelope, pretty)
}

fn envelope_response(envelope: &Envelope, pretty: bool) -> Response {
    let body = if pretty {
        serde_json::to_string_pretty(envelope)
    } else {
        serde_json::to_string(envelope)
    };
    match body {
        Ok(body) => json_response(body),
        Err(e) => {
            error!("Failed to serialize envelope: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn json_response(body: String) -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/json; charset=UTF-8"),
            ("access-control-allow-origin", "*"),
        ],
        body,
    )
        .into_response()
}
