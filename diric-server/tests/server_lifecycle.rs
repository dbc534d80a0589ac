//! Full server over a real socket

use std::sync::Arc;
use std::time::Duration;

use diric_server::http::serve;
use diric_server::{AppState, Database, MemoryDatabase, ServerConfig, ServerError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

async fn start(config: ServerConfig) -> (
    std::net::SocketAddr,
    Arc<MemoryDatabase>,
    tokio::task::JoinHandle<Result<(), ServerError>>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let db = Arc::new(MemoryDatabase::new());
    let shared: Arc<dyn Database> = db.clone();
    let state = Arc::new(AppState::new(shared, &config));
    let handle = tokio::spawn(async move { serve(listener, state, &config).await });

    (addr, db, handle)
}

#[tokio::test]
async fn serves_requests_over_tcp() {
    let (addr, _db, handle) = start(ServerConfig::default()).await;

    let response = raw_get(addr, "/employees").await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.ends_with("[]"));

    let response = raw_get(addr, "/health").await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");

    handle.abort();
}

#[tokio::test]
async fn fail_fast_stops_the_server_with_fatal_error() {
    let config = ServerConfig {
        fail_fast: true,
        ..ServerConfig::default()
    };
    let (addr, db, handle) = start(config).await;
    db.fail_next("connection refused");

    let response = raw_get(addr, "/employees").await;
    assert!(response.starts_with("HTTP/1.1 500"), "got: {response}");

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after a fatal error")
        .expect("server task panicked");

    match result {
        Err(ServerError::Fatal(reason)) => assert!(reason.contains("connection refused")),
        other => panic!("expected fatal error, got {other:?}"),
    }
}

#[tokio::test]
async fn without_fail_fast_the_server_survives_database_errors() {
    let (addr, db, handle) = start(ServerConfig::default()).await;
    db.fail_next("connection refused");

    let response = raw_get(addr, "/employees").await;
    assert!(response.starts_with("HTTP/1.1 500"), "got: {response}");

    let response = raw_get(addr, "/employees").await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(!handle.is_finished());

    handle.abort();
}
