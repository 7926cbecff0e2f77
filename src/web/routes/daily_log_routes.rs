use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::info;

use crate::db::services::DailyLogService;
use crate::report::render_log_sheet;
use crate::web::models::log_models::{DailyLogFilter, DailyLogPayload, DailyLogResponse};
use crate::web::{AppError, AppState};

pub fn daily_log_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_log).get(list_logs))
        .route("/{id}", get(get_log).put(update_log).delete(delete_log))
        .route("/{id}/pdf", get(download_pdf))
}

async fn create_log(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<DailyLogPayload>,
) -> Result<(StatusCode, Json<DailyLogResponse>), AppError> {
    let log = DailyLogService::create_log(&app_state.db_pool, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(DailyLogResponse {
            log,
            entries: Vec::new(),
        }),
    ))
}

async fn list_logs(
    State(app_state): State<Arc<AppState>>,
    Query(filter): Query<DailyLogFilter>,
) -> Result<Json<Vec<DailyLogResponse>>, AppError> {
    let logs = DailyLogService::list_logs_with_entries(&app_state.db_pool, filter.trip).await?;
    Ok(Json(logs.into_iter().map(DailyLogResponse::from).collect()))
}

async fn get_log(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<DailyLogResponse>, AppError> {
    let log = DailyLogService::get_log_with_entries(&app_state.db_pool, id).await?;
    Ok(Json(log.into()))
}

async fn update_log(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<DailyLogPayload>,
) -> Result<Json<DailyLogResponse>, AppError> {
    DailyLogService::update_log(&app_state.db_pool, id, payload).await?;
    let log = DailyLogService::get_log_with_entries(&app_state.db_pool, id).await?;
    Ok(Json(log.into()))
}

async fn delete_log(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    DailyLogService::delete_log(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn download_pdf(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let sheet = DailyLogService::load_log_sheet(&app_state.db_pool, id).await?;
    let bytes = render_log_sheet(&sheet)?;

    info!(log_id = id, bytes = bytes.len(), "Serving log sheet PDF.");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"log_{id}.pdf\""),
            ),
        ],
        bytes,
    ))
}
