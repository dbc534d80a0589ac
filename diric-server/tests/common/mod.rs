//! Shared helpers for router-level tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use diric_server::{build_router, AppState, Database, MemoryDatabase, ServerConfig};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub db: Arc<MemoryDatabase>,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let db = Arc::new(MemoryDatabase::new());
        let shared: Arc<dyn Database> = db.clone();
        let state = Arc::new(AppState::new(shared, &config));
        let router = build_router(state.clone(), &config);
        Self { router, db, state }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Send `body` as-is with a JSON content type
    pub async fn send_raw(&self, method: Method, uri: &str, body: &'static str) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None).await
    }

    /// POST an employee and return the id from the Location header
    pub async fn hire(&self, body: Value) -> i64 {
        let response = self.send(Method::POST, "/employees", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let location = response
            .headers()
            .get("location")
            .expect("location header")
            .to_str()
            .unwrap()
            .to_string();
        location
            .trim_start_matches("/employees/")
            .parse()
            .expect("numeric id in location")
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
