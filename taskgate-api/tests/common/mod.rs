//! Common test utilities for API integration tests
//!
//! Builds the full router over a fresh in-memory store. Companies are seeded
//! straight into the store (there is no HTTP endpoint for them); users are
//! registered and logged in through the API.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use taskgate_api::app::{build_router, AppState};
use taskgate_api::config::Config;
use taskgate_shared::models::{Company, CompanyId};
use taskgate_shared::store::{CompanyStore, MemoryStore};
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
}

/// A registered user with a live token
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

impl TestUser {
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some(TEST_SECRET.to_string()),
            _ => None,
        })
        .expect("test config should load");

        let store = Arc::new(MemoryStore::new());
        let app = build_router(AppState::new(store.clone(), config));

        Self { store, app }
    }

    pub async fn company(&self, name: &str) -> Company {
        self.store.create_company(name).await.unwrap()
    }

    /// Sends a request and returns the status and parsed JSON body
    /// (`Value::Null` for an empty body)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };

        (status, json)
    }

    /// Registers `username` in `companies` and logs in
    pub async fn user(&self, username: &str, role: &str, companies: &[CompanyId]) -> TestUser {
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/users",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "password",
                    "role": role,
                    "company_ids": companies,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let (status, body) = self
            .send(
                "POST",
                "/api/v1/login",
                None,
                Some(json!({ "username": username, "password": "password" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_i64().unwrap(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }
}

pub fn task_body(title: &str, assignee_id: Option<i64>) -> Value {
    json!({
        "title": title,
        "description": format!("{} description", title),
        "due_date": "2030-01-01T00:00:00Z",
        "assignee_id": assignee_id,
        "visibility": "company",
        "status": "pending",
    })
}
