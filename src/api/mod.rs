//! HTTP layer - axum routes over the core operations.
//!
//! Each resource module exposes a `router()` that is merged into one
//! application by [`build_app`]. Handlers hold no logic of their own beyond
//! extracting input and shaping output.

/// Administrator account routes
pub mod admins;
/// Check-in routes
pub mod attendance;
/// Login route
pub mod auth;
/// Coach routes
pub mod coaches;
/// Error to HTTP response mapping
pub mod error;
/// Service banner and health check
pub mod health;
/// Member routes, including export and the import template
pub mod members;
/// Product routes
pub mod products;
/// Spreadsheet upload route
pub mod upload;

use crate::config::{AppConfig, ServerConfig};
use axum::{Router, http::HeaderValue};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Shared data available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Loaded application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Creates the handler state from a connection and configuration.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self { database, config }
    }
}

/// Builds a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(members::router())
        .merge(upload::router())
        .merge(coaches::router())
        .merge(attendance::router())
        .merge(auth::router())
        .merge(admins::router())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{origin}': {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the fully configured application with middleware and state.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);
    build_router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    pub(super) async fn test_app() -> Router {
        let db = setup_test_db().await.unwrap();
        build_app(AppState::new(db, Arc::new(AppConfig::default())))
    }

    pub(super) async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub(super) fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub(super) fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub(super) fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_banner() {
        let app = test_app().await;

        let (status, body) = send(&app, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));

        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_product_and_member_flow() {
        let app = test_app().await;

        let (status, product) = send(
            &app,
            json_request(
                Method::POST,
                "/api/products",
                &json!({"name": "FPT 12개월", "regMonths": 12, "price": 600000}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product["durationUnit"], "months");
        let product_id = product["id"].as_i64().unwrap();

        let member_body = json!({
            "name": "홍길동",
            "gender": "남",
            "phone": "010-1234-5678",
            "productId": product_id,
            "startDate": "2024-01-31",
        });
        let (status, member) =
            send(&app, json_request(Method::POST, "/api/users", &member_body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(member["id"], "1");
        assert_eq!(member["endDate"], "2025-01-31");

        let (status, body) =
            send(&app, json_request(Method::POST, "/api/users", &member_body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["detail"].is_string());

        let (status, list) = send(&app, get(&format!("/api/users?type={product_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list[0]["productName"], "FPT 12개월");
        assert_eq!(list[0]["regMonths"], 12);

        let (status, _) = send(&app, get("/api/users/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Product in use is only deactivated
        let (status, removal) =
            send(&app, delete(&format!("/api/products/{product_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removal["deactivated"], true);

        let (status, removed) = send(&app, delete("/api/users/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["user"]["name"], "홍길동");
    }

    #[tokio::test]
    async fn test_unknown_product_is_bad_request() {
        let app = test_app().await;
        let (status, _) = send(
            &app,
            json_request(
                Method::POST,
                "/api/users",
                &json!({"name": "A", "productId": 42}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_attendance_and_coaches() {
        let app = test_app().await;
        let (_, product) = send(
            &app,
            json_request(
                Method::POST,
                "/api/products",
                &json!({"name": "FPT", "regMonths": 1, "price": 0}),
            ),
        )
        .await;
        let (_, member) = send(
            &app,
            json_request(
                Method::POST,
                "/api/users",
                &json!({"name": "A", "phone": "1", "productId": product["id"]}),
            ),
        )
        .await;

        let visit = json!({"userId": member["id"], "date": "2026-01-02", "time": "09:00"});
        let (status, record) =
            send(&app, json_request(Method::POST, "/api/attendance", &visit)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record["status"], "Present");

        let (status, _) = send(&app, json_request(Method::POST, "/api/attendance", &visit)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let stranger = json!({"userId": "nobody", "date": "2026-01-02", "time": "09:00"});
        let (status, _) =
            send(&app, json_request(Method::POST, "/api/attendance", &stranger)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, stats) = send(
            &app,
            get("/api/attendance/stats?startDate=2026-01-01&endDate=2026-01-31"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            stats,
            json!([{"attendanceDate": "2026-01-02", "totalCount": 1, "uniqueUsers": 1}])
        );

        let (_, records) = send(&app, get("/api/attendance")).await;
        assert_eq!(records[0]["userName"], "A");

        let coach = json!({"id": "C1", "name": "Minho", "specialty": "PT"});
        let (status, _) = send(&app, json_request(Method::POST, "/api/coaches", &coach)).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, found) = send(&app, get("/api/coaches/C1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["name"], "Minho");
        let (status, _) = send(&app, get("/api/coaches/C9")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_and_login() {
        let app = test_app().await;

        let account = json!({"username": "desk", "password": "pw", "name": "Front Desk"});
        let (status, created) =
            send(&app, json_request(Method::POST, "/api/admins", &account)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(created.get("password").is_none());

        let (status, _) = send(&app, json_request(Method::POST, "/api/admins", &account)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, profile) = send(
            &app,
            json_request(
                Method::POST,
                "/api/auth/login",
                &json!({"username": "desk", "password": "pw"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["role"], "admin");

        let (status, _) = send(
            &app,
            json_request(
                Method::POST,
                "/api/auth/login",
                &json!({"username": "desk", "password": "nope"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let id = created["id"].as_i64().unwrap();
        let (status, _) = send(
            &app,
            json_request(Method::PUT, &format!("/api/admins/{id}"), &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, delete(&format!("/api/admins/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, delete(&format!("/api/admins/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_layer_accepts_configured_origins() {
        let server = ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string(), "\n".to_string()],
        };
        // Invalid origins are skipped rather than failing startup
        let _layer = cors_layer(&server);
    }
}
