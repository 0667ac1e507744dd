//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with management, documentation and fallback handlers
//! - Wire up middleware (tracing, request ID, timeout, body limits)
//! - Reconcile stored routes before the listener accepts traffic
//! - Dispatch unmatched requests to dynamically bound routes

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{RegistryConfig, UploadConfig};
use crate::http::{api, docs};
use crate::lifecycle::startup::{reconcile, ReconcileReport};
use crate::observability::metrics;
use crate::registry::{HttpMethod, RouteBinder, RouteStore, RouteTable, StoreError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RouteStore>,
    pub binder: Arc<RouteBinder>,
    pub uploads: Arc<UploadConfig>,
}

impl AppState {
    /// Fresh state with an empty route table and no bindings.
    pub fn new(config: &RegistryConfig) -> Self {
        let table = Arc::new(RouteTable::new());
        Self {
            store: Arc::new(RouteStore::new(&config.storage.routes_dir)),
            binder: Arc::new(RouteBinder::new(table)),
            uploads: Arc::new(config.uploads.clone()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("upload directory unavailable: {0}")]
    Io(#[from] io::Error),
}

/// HTTP server for the route registry.
pub struct HttpServer {
    router: Router,
    state: AppState,
    report: ReconcileReport,
}

impl HttpServer {
    /// Prepare storage, bind every stored route and build the router.
    pub async fn bootstrap(config: RegistryConfig) -> Result<Self, StartupError> {
        let state = AppState::new(&config);
        state.store.ensure_dir().await?;
        tokio::fs::create_dir_all(config.uploads.resolved_temp_dir()).await?;

        let report = reconcile(&state.store, &state.binder).await?;

        let router = build_router(&config, state.clone());
        Ok(Self {
            router,
            state,
            report,
        })
    }

    /// The fully layered router (useful for in-process testing).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Outcome of the startup reconciliation.
    pub fn reconcile_report(&self) -> ReconcileReport {
        self.report
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> io::Result<()> {
        let addr = listener.local_addr()?;
        let routes: Vec<String> = self
            .state
            .binder
            .bound_routes()
            .iter()
            .map(ToString::to_string)
            .collect();
        tracing::info!(
            address = %addr,
            bound_routes = routes.len(),
            "HTTP server starting"
        );
        tracing::debug!(routes = ?routes, "Serving dynamic routes");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Each fixed path falls back to dynamic dispatch for methods it does not
/// handle itself, so only the exact fixed `(method, path)` pairs are shadowed.
#[allow(deprecated)]
pub fn build_router(config: &RegistryConfig, state: AppState) -> Router {
    let upload_limit = config.uploads.max_upload_bytes.max(config.limits.max_body_bytes);

    Router::new()
        .route("/", get(docs::root).fallback(dispatch_dynamic))
        .route(
            "/api/create",
            post(api::create_route)
                .layer(DefaultBodyLimit::max(upload_limit))
                .fallback(dispatch_dynamic),
        )
        .route("/api/update", put(api::update_route).fallback(dispatch_dynamic))
        .route("/openapi.json", get(docs::openapi_json).fallback(dispatch_dynamic))
        .route("/docs", get(docs::docs_page).fallback(dispatch_dynamic))
        .fallback(dispatch_dynamic)
        .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(config.limits.request_timeout_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Serve a request from its bound dynamic route, or 404.
async fn dispatch_dynamic(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let start = Instant::now();
    let path = uri.path();

    let bound = HttpMethod::try_from(&method)
        .ok()
        .and_then(|m| state.binder.handler(m, path).map(|handler| (m, handler)));

    match bound {
        Some((m, handler)) => {
            let body = handler.serve(m, path);
            metrics::record_request(m.as_str(), 200, start);
            (StatusCode::OK, Json(body)).into_response()
        }
        None => {
            tracing::debug!(method = %method, path = %path, "No dynamic route bound");
            metrics::record_request(method.as_str(), 404, start);
            (
                StatusCode::NOT_FOUND,
                Json(json!({"ok": false, "error": format!("no route for {method} {path}")})),
            )
                .into_response()
        }
    }
}
