//! Readiness check
//!
//! `GET /health` runs [`PING`] through the configured backend: 200 when
//! it answers, 503 when it does not. A failed ping never trips fail-fast.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::db::{Database, Replacements, PING};
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthReport>) {
    match state.db.execute(&PING, &Replacements::new()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthReport {
                status: "ok",
                database: "reachable",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReport {
                    status: "unavailable",
                    database: "unreachable",
                }),
            )
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::db::MemoryDatabase;

    fn state(db: Arc<MemoryDatabase>, fail_fast: bool) -> Arc<AppState> {
        let config = ServerConfig {
            fail_fast,
            ..ServerConfig::default()
        };
        let db: Arc<dyn Database> = db;
        Arc::new(AppState::new(db, &config))
    }

    #[tokio::test]
    async fn reachable_backend_is_ok() {
        let db = Arc::new(MemoryDatabase::new());
        let (status, Json(report)) = health(State(state(db, false))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report.database, "reachable");
    }

    #[tokio::test]
    async fn failed_ping_is_503_without_tripping() {
        let db = Arc::new(MemoryDatabase::new());
        db.fail_next("connection refused");
        let state = state(db, true);

        let (status, Json(report)) = health(State(state.clone())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(report.status, "unavailable");
        assert!(!state.fatal.is_tripped());
    }
}
