/// Common test utilities for router tests
///
/// Builds the full router over an in-memory store so the tests exercise
/// routing, authentication, extraction and error translation without a
/// database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use taskapp_api::app::{build_router, AppState};
use taskapp_api::config::{ApiConfig, Config, DatabaseSettings, JwtConfig};
use taskapp_shared::store::MemoryStore;
use tower::ServiceExt;

pub const SECRET: &str = "router-test-secret-at-least-32-bytes";

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseSettings {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: SECRET.to_string(),
            expiration_hours: 1,
        },
    }
}

/// Router plus helpers for issuing requests against it
pub struct TestContext {
    pub app: Router,
}

/// A signed-up account as seen by the tests
pub struct TestAccount {
    pub id: i64,
    pub email: String,
    pub token: String,
}

impl TestContext {
    pub fn new() -> Self {
        let state = AppState::new(Arc::new(MemoryStore::new()), test_config());
        Self {
            app: build_router(state),
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    /// (`Value::Null` for empty bodies)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), body).await
    }

    /// Signs up `name` as `<name>@example.com` with password `secret1`
    pub async fn signup(&self, name: &str) -> TestAccount {
        let email = format!("{}@example.com", name.to_lowercase());

        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "secret1",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, info) = self.get(&format!("/api/v1/account/{}", email), &token).await;
        assert_eq!(status, StatusCode::OK, "account lookup failed: {}", info);

        TestAccount {
            id: info["id"].as_i64().unwrap(),
            email,
            token,
        }
    }

    /// Creates a task and returns its JSON
    pub async fn create_task(&self, account: &TestAccount, title: &str) -> Value {
        let (status, task) = self
            .post(
                "/api/v1/task",
                &account.token,
                Some(serde_json::json!({ "title": title, "description": "D" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", task);
        task
    }
}
