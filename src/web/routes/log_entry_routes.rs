use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

use crate::db::entities::log_entry;
use crate::db::services::LogEntryService;
use crate::web::models::log_models::{LogEntryFilter, LogEntryPayload};
use crate::web::{AppError, AppState};

pub fn log_entry_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_entry).get(list_entries))
        .route("/{id}", get(get_entry).put(update_entry).delete(delete_entry))
}

async fn create_entry(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<LogEntryPayload>,
) -> Result<(StatusCode, Json<log_entry::Model>), AppError> {
    let entry = LogEntryService::create_entry(&app_state.db_pool, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list_entries(
    State(app_state): State<Arc<AppState>>,
    Query(filter): Query<LogEntryFilter>,
) -> Result<Json<Vec<log_entry::Model>>, AppError> {
    let entries = LogEntryService::list_entries(&app_state.db_pool, filter.daily_log).await?;
    Ok(Json(entries))
}

async fn get_entry(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<log_entry::Model>, AppError> {
    let entry = LogEntryService::get_entry(&app_state.db_pool, id).await?;
    Ok(Json(entry))
}

async fn update_entry(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<LogEntryPayload>,
) -> Result<Json<log_entry::Model>, AppError> {
    let entry = LogEntryService::update_entry(&app_state.db_pool, id, payload).await?;
    Ok(Json(entry))
}

async fn delete_entry(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    LogEntryService::delete_entry(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
