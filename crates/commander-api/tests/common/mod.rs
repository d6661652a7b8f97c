//! Shared helpers for HTTP tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use commander_api::{router, AppState};
use commander_core::{Change, Command, CommandId, MemoryStore, RecordStore};
use tower::ServiceExt;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Router over a fresh in-memory store
pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn RecordStore> = store.clone();
    TestApp {
        store,
        router: router(AppState::new(shared)),
    }
}

pub fn seed_command(
    store: &dyn RecordStore,
    how_to: &str,
    platform: &str,
    line: &str,
) -> CommandId {
    store
        .commit(&[Change::Insert(Command::new(how_to, platform, line))])
        .unwrap()[0]
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    TestResponse {
        status,
        headers,
        body: body.to_vec(),
    }
}
