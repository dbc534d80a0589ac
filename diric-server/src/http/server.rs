//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Panic boundary rendering the error page
//! - Graceful shutdown on SIGTERM/Ctrl+C or a fatal database error

use std::sync::Arc;

use axum::handler::Handler;
use axum::http::{request::Parts, HeaderValue};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::error_page;
use super::routes;
use super::shutdown::{shutdown_signal, FatalSignal};
use crate::config::ServerConfig;
use crate::db::{Database, DbError, EmployeeRepo};
use crate::error::ServerError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    /// Expose error detail on the error page
    pub development: bool,
    /// Trip `fatal` on the first database failure
    pub fail_fast: bool,
    pub fatal: Arc<FatalSignal>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, config: &ServerConfig) -> Self {
        Self {
            db,
            development: config.development,
            fail_fast: config.fail_fast,
            fatal: Arc::new(FatalSignal::new()),
        }
    }

    pub fn repo(&self) -> EmployeeRepo<'_> {
        EmployeeRepo::new(self.db.as_ref())
    }

    /// Per-request boundary for database failures.
    ///
    /// The caller always gets a 500. In fail-fast mode a backend failure
    /// also shuts the server down; a row that cannot be decoded stays a
    /// per-request error.
    pub fn database_failure(&self, err: DbError) -> ApiError {
        if self.fail_fast && !matches!(err, DbError::Decode { .. }) {
            tracing::error!("FATAL ERROR: {}", err);
            self.fatal.trip(err.to_string());
        }
        ApiError::Database(err)
    }
}

/// Build the application router with all routes
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                |origin: &HeaderValue, _parts: &Parts| {
                    origin.to_str().map(is_local_origin).unwrap_or(false)
                },
            ))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::employees::router())
        .merge(routes::docs::router());

    let app = match &config.static_dir {
        Some(dir) => {
            tracing::info!(path = %dir.display(), "Serving static files");
            let not_found = error_page::not_found.with_state(state.clone());
            app.fallback_service(
                ServeDir::new(dir)
                    .call_fallback_on_method_not_allowed(true)
                    .not_found_service(not_found),
            )
        }
        None => app.fallback(error_page::not_found),
    };

    let development = state.development;
    app.layer(CatchPanicLayer::custom(move |payload| {
        error_page::panic_response(payload, development)
    }))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Bind to the configured address and run until shutdown.
///
/// # Example
///
/// ```ignore
/// let db = PgDatabase::connect(&config.database).await?;
/// run_server(Arc::new(db), &config.server).await?;
/// ```
pub async fn run_server(db: Arc<dyn Database>, config: &ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::new(db, config));
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        development = config.development,
        fail_fast = config.fail_fast,
        "Server listening on {}",
        listener.local_addr()?
    );

    serve(listener, state, config).await
}

/// Serve on an already-bound listener.
///
/// Returns `ServerError::Fatal` when shutdown was caused by a database
/// failure in fail-fast mode.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    config: &ServerConfig,
) -> Result<(), ServerError> {
    let fatal = state.fatal.clone();
    let app = build_router(state, config);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(fatal.clone()))
        .await?;

    if let Some(reason) = fatal.reason() {
        return Err(ServerError::Fatal(reason));
    }

    tracing::info!("task is stopped");
    Ok(())
}

/// `http(s)://localhost[:port]`, `127.0.0.1` or `[::1]`
fn is_local_origin(origin: &str) -> bool {
    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };

    let host = match rest.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => rest,
    };

    matches!(host, "localhost" | "127.0.0.1" | "[::1]")
}
