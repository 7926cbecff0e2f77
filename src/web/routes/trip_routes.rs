use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

use crate::db::entities::trip;
use crate::db::services::TripService;
use crate::web::models::AuthenticatedUser;
use crate::web::models::trip_models::TripPayload;
use crate::web::{AppError, AppState};

pub fn trip_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_trip).get(list_trips))
        .route("/{id}", get(get_trip).put(update_trip).delete(delete_trip))
        .route("/{id}/complete", post(complete_trip))
}

async fn create_trip(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<TripPayload>,
) -> Result<(StatusCode, Json<trip::Model>), AppError> {
    let trip = TripService::create_trip(&app_state.db_pool, user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn list_trips(State(app_state): State<Arc<AppState>>) -> Result<Json<Vec<trip::Model>>, AppError> {
    let trips = TripService::list_trips(&app_state.db_pool).await?;
    Ok(Json(trips))
}

async fn get_trip(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<trip::Model>, AppError> {
    let trip = TripService::get_trip(&app_state.db_pool, id).await?;
    Ok(Json(trip))
}

async fn update_trip(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<TripPayload>,
) -> Result<Json<trip::Model>, AppError> {
    let trip = TripService::update_trip(&app_state.db_pool, id, payload).await?;
    Ok(Json(trip))
}

async fn complete_trip(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<trip::Model>, AppError> {
    let trip = TripService::complete_trip(&app_state.db_pool, id).await?;
    Ok(Json(trip))
}

async fn delete_trip(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    TripService::delete_trip(&app_state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
