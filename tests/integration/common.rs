//! Test harness: the real router over an in-memory SQLite database

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use libros_server::{
    api,
    config::{AppConfig, AuditConfig, DatabaseBackend, DatabaseConfig},
    db::{self, Database},
    repository::Repository,
    services::{auth::hash_password, sessions::MemorySessionStore, Services},
    AppState,
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    router: Router,
    pub admin_id: i64,
    /// Same database the router uses, for direct inspection
    pub db: Arc<dyn Database>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_audit(AuditConfig::default()).await
    }

    pub async fn with_audit(audit: AuditConfig) -> Self {
        let mut config = AppConfig::default();
        config.database = DatabaseConfig {
            backend: DatabaseBackend::Sqlite,
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        };
        config.server.cors_origin = None;
        config.audit = audit;

        let database = db::connect(&config.database).await.unwrap();
        database.migrate().await.unwrap();

        let repository = Repository::new(database.clone());
        let hash = hash_password(ADMIN_PASSWORD).unwrap();
        let admin = repository
            .admin_users
            .create(&mut repository.pool(), ADMIN_USERNAME, &hash)
            .await
            .unwrap();

        let sessions = Arc::new(MemorySessionStore::new(config.session.ttl_hours));
        let services = Services::new(repository, sessions, config.audit.clone());

        let state = AppState {
            config: Arc::new(config),
            services: Arc::new(services),
            db: database.clone(),
        };

        Self {
            router: api::create_router(state),
            admin_id: admin.id,
            db: database,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::USER_AGENT, "libros-tests")
            .header("x-forwarded-for", "203.0.113.7");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Log in as the seeded admin and return the `name=value` cookie pair
    pub async fn login(&self) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/login",
                Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);

        session_cookie(&response.headers).expect("login must set the session cookie")
    }

    pub async fn create_book(&self, cookie: &str, body: Value) -> Value {
        let response = self
            .request(Method::POST, "/api/libros", Some(body), Some(cookie))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}

/// `name=value` part of the first Set-Cookie header
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|pair| pair.trim().to_string())
}
