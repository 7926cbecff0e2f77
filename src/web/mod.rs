use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::services::auth_service;
use crate::web::{
    middleware::auth,
    models::{LoginRequest, RefreshRequest, RefreshResponse},
    routes::*,
};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let login_response =
        auth_service::login_user(&app_state.db_pool, payload, &app_state.config).await?;

    let auth_cookie = Cookie::build(("token", login_response.access.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    Ok((jar.add(auth_cookie), Json(login_response)))
}

async fn refresh_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let refreshed = auth_service::refresh_access_token(&payload.refresh, &app_state.config)?;
    Ok(Json(refreshed))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = match config.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            warn!(error = %e, "Ignoring invalid frontend_url; allowing any origin.");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn create_axum_router(db_pool: DatabaseConnection, config: Arc<ServerConfig>) -> Router {
    let cors = cors_layer(&config);
    let app_state = Arc::new(AppState { db_pool, config });
    let auth_layer = || axum_middleware::from_fn_with_state(app_state.clone(), auth::auth);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/refresh", post(refresh_handler))
        .route("/api/auth/me", get(auth_service::me).route_layer(auth_layer()))
        .nest("/api/users", user_routes::create_user_router(app_state.clone()))
        .nest("/api/trips", trip_routes::trip_routes().route_layer(auth_layer()))
        .nest("/api/logs", daily_log_routes::daily_log_routes().route_layer(auth_layer()))
        .nest("/api/entries", log_entry_routes::log_entry_routes().route_layer(auth_layer()))
        .with_state(app_state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests;
