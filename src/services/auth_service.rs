use axum::{Extension, Json, extract::State};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::DatabaseConnection;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::db::entities::user;
use crate::db::services::user_service;
use crate::web::AppState;
use crate::web::error::AppError;
use crate::web::models::{
    AuthenticatedUser, Claims, LoginRequest, LoginResponse, RefreshResponse, RegisterRequest,
    TokenType, UserResponse,
};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Checked against when no active account matches the email.
static UNKNOWN_ACCOUNT_HASH: LazyLock<String> =
    LazyLock::new(|| hash("no-such-account", DEFAULT_COST).unwrap_or_default());

pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long."
        )));
    }
    hash(password, DEFAULT_COST).map_err(|e| AppError::PasswordHashingError(e.to_string()))
}

pub async fn register_user(
    pool: &DatabaseConnection,
    req: RegisterRequest,
) -> Result<UserResponse, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidInput("A valid email address is required.".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user_model =
        user_service::create_user(pool, email, password_hash, req.first_name, req.last_name).await?;

    info!(user_id = user_model.id, "User registered.");
    Ok(user_model.into())
}

pub async fn login_user(
    pool: &DatabaseConnection,
    req: LoginRequest,
    config: &ServerConfig,
) -> Result<LoginResponse, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput("Email and password are required".to_string()));
    }

    let email = req.email.trim().to_lowercase();
    // Unknown email, inactive account and wrong password all end in the same error.
    let Some(user) = user_service::get_user_by_email(pool, &email)
        .await?
        .filter(|u| u.is_active)
    else {
        // Same bcrypt cost as a wrong password.
        let _ = verify(&req.password, &UNKNOWN_ACCOUNT_HASH);
        warn!("Login rejected: no active account for email.");
        return Err(AppError::InvalidCredentials);
    };

    let valid_password = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;

    if !valid_password {
        warn!(user_id = user.id, "Login rejected: wrong password.");
        return Err(AppError::InvalidCredentials);
    }

    let refresh = create_token(&user, TokenType::Refresh, config)?;
    let access = create_token(&user, TokenType::Access, config)?;

    info!(user_id = user.id, "User logged in.");
    Ok(LoginResponse {
        refresh,
        access,
        user: user.into(),
    })
}

/// Exchanges a refresh token for a new access token.
pub fn refresh_access_token(refresh: &str, config: &ServerConfig) -> Result<RefreshResponse, AppError> {
    let claims = decode_token(refresh, TokenType::Refresh, &config.jwt_secret)?;

    let exp = (Utc::now() + Duration::minutes(config.access_token_minutes)).timestamp() as usize;
    let access_claims = Claims {
        sub: claims.sub,
        user_id: claims.user_id,
        exp,
        token_type: TokenType::Access,
    };
    let access = encode(
        &Header::default(),
        &access_claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(e.to_string()))?;

    Ok(RefreshResponse { access })
}

pub fn create_token(
    user: &user::Model,
    token_type: TokenType,
    config: &ServerConfig,
) -> Result<String, AppError> {
    let lifetime = match token_type {
        TokenType::Access => Duration::minutes(config.access_token_minutes),
        TokenType::Refresh => Duration::days(config.refresh_token_days),
    };
    let expiration = (Utc::now() + lifetime).timestamp() as usize;

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id,
        exp: expiration,
        token_type,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(config.jwt_secret.as_ref()))
        .map_err(|e| AppError::TokenCreationError(e.to_string()))
}

/// Decodes and checks a token, requiring it to be of `expected` type.
pub fn decode_token(token: &str, expected: TokenType, jwt_secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!(error = ?e, "JWT decoding failed.");
        AppError::Unauthorized("Given token not valid for any token type".to_string())
    })?;

    if token_data.claims.token_type != expected {
        return Err(AppError::Unauthorized(
            "Given token not valid for any token type".to_string(),
        ));
    }
    Ok(token_data.claims)
}

pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<UserResponse>, AppError> {
    let user_model = user_service::get_user_by_id(&app_state.db_pool, user.id).await?;
    Ok(Json(user_model.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn config() -> ServerConfig {
        ServerConfig {
            database_url: "postgres://localhost/triplog_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            listen_addr: "127.0.0.1:0".to_string(),
            log_dir: "logs".to_string(),
            access_token_minutes: 5,
            refresh_token_days: 1,
            frontend_url: None,
        }
    }

    fn driver() -> user::Model {
        user::Model {
            id: 42,
            email: "driver@example.com".to_string(),
            password_hash: String::new(),
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            is_active: true,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = config();
        let token = create_token(&driver(), TokenType::Access, &config).unwrap();
        let claims = decode_token(&token, TokenType::Access, &config.jwt_secret).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "driver@example.com");
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = config();
        let refresh = create_token(&driver(), TokenType::Refresh, &config).unwrap();
        assert!(decode_token(&refresh, TokenType::Access, &config.jwt_secret).is_err());

        let refreshed = refresh_access_token(&refresh, &config).unwrap();
        let claims = decode_token(&refreshed.access, TokenType::Access, &config.jwt_secret).unwrap();
        assert_eq!(claims.user_id, 42);
    }

    #[test]
    fn test_access_token_cannot_refresh() {
        let config = config();
        let access = create_token(&driver(), TokenType::Access, &config).unwrap();
        assert!(matches!(
            refresh_access_token(&access, &config),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = config();
        let token = create_token(&driver(), TokenType::Access, &config).unwrap();
        assert!(decode_token(&token, TokenType::Access, "another-secret").is_err());
    }

    #[test]
    fn test_short_password_is_rejected() {
        assert!(matches!(hash_password("short"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_account_hash_is_a_real_bcrypt_hash() {
        assert!(UNKNOWN_ACCOUNT_HASH.starts_with("$2"));
        assert!(!verify("no-such-account-guess", &UNKNOWN_ACCOUNT_HASH).unwrap());
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_accounts_share_one_error() {
        let unknown = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let inactive = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user::Model {
                is_active: false,
                password_hash: hash("correct-horse", 4).unwrap(),
                ..driver()
            }]])
            .into_connection();
        let request = || LoginRequest {
            email: "driver@example.com".to_string(),
            password: "correct-horse".to_string(),
        };

        for db in [unknown, inactive] {
            let err = login_user(&db, request(), &config()).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials));
        }
    }
}
