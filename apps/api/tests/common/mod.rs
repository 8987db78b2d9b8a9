//! Shared harness for the HTTP tests: an in-memory database behind the real
//! router, plus helpers to create signed-in users.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use stockroom_api::config::AppConfig;
use stockroom_api::{build_router, AppState};
use stockroom_core::{NewUser, Role, User};
use stockroom_db::{hash_password, Database, DbConfig};

/// Password every test user gets.
pub const PASSWORD: &str = "secret1";

/// Argon2 is slow in debug builds; hash the shared password once.
fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap())
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Database file to remove on drop, for file-backed apps.
    db_file: Option<PathBuf>,
}

impl TestApp {
    /// App over a private in-memory database (one connection).
    pub async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = AppConfig::from_builder(
            AppConfig::defaults()
                .unwrap()
                .set_override("database_path", ":memory:")
                .unwrap(),
        )
        .unwrap();

        Self::assemble(db, config, None)
    }

    /// App over a fresh database file, so concurrent requests really run
    /// on separate connections.
    pub async fn with_file_database() -> Self {
        let path = std::env::temp_dir().join(format!("stockroom-test-{}.db", uuid::Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let config = AppConfig::from_builder(
            AppConfig::defaults()
                .unwrap()
                .set_override("database_path", path.display().to_string())
                .unwrap()
                .set_override("jwt_secret", "stockroom-test-signing-secret")
                .unwrap(),
        )
        .unwrap();

        Self::assemble(db, config, Some(path))
    }

    fn assemble(db: Database, config: AppConfig, db_file: Option<PathBuf>) -> Self {
        let state = AppState::new(db, config);
        TestApp {
            router: build_router(state.clone()),
            state,
            db_file,
        }
    }

    /// Inserts a user directly and returns it with a session token.
    pub async fn user(&self, email: &str, role: Role) -> (User, String) {
        let user = self
            .state
            .db
            .users()
            .create(&NewUser {
                name: format!("{} user", role.as_str().to_lowercase()),
                email: email.to_string(),
                password_hash: password_hash().to_string(),
                role,
            })
            .await
            .unwrap();
        let token = self.state.jwt.issue(&user).unwrap();
        (user, token)
    }

    /// Token for a fresh OWNER.
    pub async fn owner(&self) -> String {
        self.user("owner@shop.example", Role::Owner).await.1
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Sends a request and parses the JSON answer.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, Some(token), None).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(path) = &self.db_file {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
            }
        }
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
