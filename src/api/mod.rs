//! API module for Campus Portal
//!
//! REST endpoints under `/api`, the shared application state and the
//! success envelope every handler answers with.

pub mod admin;
pub mod auth;
pub mod dashboards;
pub mod extract;
pub mod professor;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::services::{AuthService, ClubService, ProfessorService, ReportingService, TimeProvider};

pub use auth::{AdminUser, AuthUser, ProfessorUser};
pub use extract::{JsonBody, QueryParams};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseManager,
    pub config: Arc<Config>,
    pub clock: Arc<dyn TimeProvider>,
    pub auth: Arc<AuthService>,
    pub reporting: Arc<ReportingService>,
    pub professors: Arc<ProfessorService>,
    pub clubs: Arc<ClubService>,
}

impl AppState {
    pub fn new(db: DatabaseManager, config: Config, clock: Arc<dyn TimeProvider>) -> Self {
        let tz = config.tz();
        let auth = AuthService::new(
            db.clone(),
            clock.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiry_hours,
        );

        Self {
            auth: Arc::new(auth),
            reporting: Arc::new(ReportingService::new(db.clone(), clock.clone(), tz)),
            professors: Arc::new(ProfessorService::new(db.clone(), clock.clone(), tz)),
            clubs: Arc::new(ClubService::new(db.clone(), clock.clone())),
            config: Arc::new(config),
            clock,
            db,
        }
    }
}

/// Success envelope: `{ "success": true, "data": ..., "count"?: n }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            count: None,
            data,
        })
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            count: None,
            data,
        })
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            count: Some(data.len()),
            data,
        })
    }
}

/// A `201 Created` answer wrapping the envelope
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ApiResponse::ok(data))
}

/// Body of a write that returns no record
pub fn acknowledged(message: &str) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "message": message }))
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let api = Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth::routes())
        .nest("/professor", professor::routes())
        .nest("/admin", admin::routes())
        .route("/student/dashboard", get(dashboards::student_dashboard))
        .route("/club/dashboard", get(dashboards::club_dashboard))
        .fallback(api_not_found);

    let mut app = Router::new().nest("/api", api).with_state(state);

    if config.frontend_dir.is_dir() {
        let index = config.frontend_dir.join("index.html");
        app = app.fallback_service(ServeDir::new(&config.frontend_dir).fallback(ServeFile::new(index)));
    }

    if config.enable_request_logging {
        app = app.layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| crate::request_span!(request.method(), request.uri().path())),
        );
    }

    app.layer(
        ServiceBuilder::new()
            .layer(cors_layer(&config))
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    )
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.cors_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Campus Portal API is running",
        "timestamp": state.clock.now_utc(),
    }))
}

async fn api_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
