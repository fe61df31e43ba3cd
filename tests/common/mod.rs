//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the API router against a fresh in-memory database.
//! Methods are intentionally broad to support the different test files.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use tally::config::Config;
use tally::db::create_in_memory_pool;
use tally::handlers;
use tally::models::{Budget, Envelope, Transaction};
use tally::server::{prepare_state, router, serve};
use tally::state::AppState;
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_path: PathBuf::from(":memory:"),
        migrations_path: PathBuf::from("migrations"),
    }
}

/// A test client that sends sequential requests against one database.
pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// Create a new test client with a fresh in-memory database.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        let state = prepare_state(pool, test_config()).expect("Failed to prepare state");
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    /// Serve the full application on an OS-assigned port and return its base URL.
    pub async fn spawn_server(&self) -> String {
        let (port, _handle) = serve(router(self.state.clone()), "127.0.0.1", 0)
            .await
            .expect("Failed to start server");
        format!("http://127.0.0.1:{}", port)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Send a JSON body with the given method and return status and body.
    pub async fn send_json(&self, method: &str, uri: &str, body: &Value) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, String) {
        self.send_json("POST", uri, body).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> (StatusCode, String) {
        self.send_json("PUT", uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// GET an endpoint and parse the envelope.
    pub async fn get_envelope<T: DeserializeOwned>(&self, uri: &str) -> (StatusCode, Envelope<T>) {
        let (status, body) = self.get(uri).await;
        (status, parse_envelope(&body))
    }

    // =========================================================================
    // Helper methods for creating entities through the API
    // =========================================================================

    /// Create a transaction via POST and return the stored record.
    pub async fn create_transaction(
        &self,
        date: &str,
        amount: f64,
        description: &str,
        category: &str,
    ) -> Transaction {
        let (status, body) = self
            .post_json(
                "/api/transactions",
                &serde_json::json!({
                    "date": date,
                    "amount": amount,
                    "description": description,
                    "category": category,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        parse_envelope::<Transaction>(&body)
            .data
            .expect("created transaction in envelope")
    }

    /// Upsert a budget via POST and return the stored record.
    pub async fn upsert_budget(&self, category: &str, amount: f64, month: &str) -> Budget {
        let (status, body) = self
            .post_json(
                "/api/budgets",
                &serde_json::json!({
                    "category": category,
                    "amount": amount,
                    "month": month,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "upsert failed: {}", body);
        parse_envelope::<Budget>(&body)
            .data
            .expect("budget in envelope")
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Envelope<T> {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("not an envelope ({}): {}", e, body))
}
