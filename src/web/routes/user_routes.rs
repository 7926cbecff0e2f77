use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::services::user_service;
use crate::services::auth_service;
use crate::web::middleware::auth;
use crate::web::models::{AuthenticatedUser, RegisterRequest, UpdateUserRequest, UserResponse};
use crate::web::{AppError, AppState};

/// Registration is public; everything else needs an access token.
pub fn create_user_router(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(axum_middleware::from_fn_with_state(app_state, auth::auth))
        .route("/", post(register_user))
}

async fn register_user(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = auth_service::register_user(&app_state.db_pool, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_service::list_users(&app_state.db_pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn get_user(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user_service::get_user_by_id(&app_state.db_pool, id).await?;
    Ok(Json(user.into()))
}

fn ensure_self(auth_user: &AuthenticatedUser, id: i32) -> Result<(), AppError> {
    if auth_user.id != id {
        warn!(user_id = auth_user.id, email = %auth_user.email, target_id = id, "Refusing to modify another account.");
        return Err(AppError::Forbidden(
            "You can only modify your own account.".to_string(),
        ));
    }
    Ok(())
}

async fn update_user(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    ensure_self(&auth_user, id)?;

    let email = match payload.email {
        Some(email) => {
            let email = email.trim().to_lowercase();
            if !email.contains('@') {
                return Err(AppError::InvalidInput("A valid email address is required.".to_string()));
            }
            Some(email)
        }
        None => None,
    };
    let password_hash = payload
        .password
        .as_deref()
        .map(auth_service::hash_password)
        .transpose()?;

    let user = user_service::update_user(
        &app_state.db_pool,
        id,
        email,
        payload.first_name,
        payload.last_name,
        password_hash,
    )
    .await?;
    info!(user_id = user.id, "User updated.");
    Ok(Json(user.into()))
}

async fn delete_user(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ensure_self(&auth_user, id)?;
    user_service::delete_user(&app_state.db_pool, id).await?;
    info!(user_id = id, "User deleted.");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 42,
            email: "driver@example.com".to_string(),
        }
    }

    #[test]
    fn test_ensure_self() {
        assert!(ensure_self(&caller(), 42).is_ok());
        assert!(matches!(ensure_self(&caller(), 7), Err(AppError::Forbidden(_))));
    }
}
