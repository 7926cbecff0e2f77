use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{NaiveDate, TimeZone, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

use super::create_axum_router;
use crate::config::ServerConfig;
use crate::db::entities::{daily_log, trip, user};
use crate::db::enums::TripStatus;
use crate::services::auth_service::create_token;
use crate::web::error::INVALID_CREDENTIALS_MESSAGE;
use crate::web::models::TokenType;

fn config() -> Arc<ServerConfig> {
    Arc::new(ServerConfig {
        database_url: "postgres://localhost/triplog_test".to_string(),
        jwt_secret: "router-test-secret".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        log_dir: "logs".to_string(),
        access_token_minutes: 5,
        refresh_token_days: 1,
        frontend_url: None,
    })
}

fn driver(password: &str) -> user::Model {
    user::Model {
        id: 42,
        email: "driver@example.com".to_string(),
        password_hash: bcrypt::hash(password, 4).unwrap(),
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        is_active: true,
        date_joined: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn bearer(token_type: TokenType, config: &ServerConfig) -> String {
    format!("Bearer {}", create_token(&driver("irrelevant-pw"), token_type, config).unwrap())
}

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = create_axum_router(empty_db(), config());
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    for uri in ["/api/trips", "/api/logs", "/api/entries", "/api/users", "/api/auth/me", "/api/logs/1/pdf"] {
        let app = create_axum_router(empty_db(), config());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_refresh_token_cannot_be_used_as_access() {
    let config = config();
    let app = create_axum_router(empty_db(), config.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/trips")
                .header(header::AUTHORIZATION, bearer(TokenType::Refresh, &config))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_pdf_for_unknown_log_is_structured_404() {
    let config = config();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<daily_log::Model>::new()])
        .into_connection();
    let app = create_axum_router(db, config.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/logs/999/pdf")
                .header(header::AUTHORIZATION, bearer(TokenType::Access, &config))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_json(response).await, serde_json::json!({ "error": "Log not found" }));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let unknown_email_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let unknown_email = create_axum_router(unknown_email_db, config())
        .oneshot(login_request("nobody@example.com", "whatever-password"))
        .await
        .unwrap();

    let wrong_password_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![driver("correct-horse")]])
        .into_connection();
    let wrong_password = create_axum_router(wrong_password_db, config())
        .oneshot(login_request("driver@example.com", "battery-staple"))
        .await
        .unwrap();

    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_body = body_bytes(unknown_email).await;
    let wrong_body = body_bytes(wrong_password).await;
    assert_eq!(unknown_body, wrong_body);
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&unknown_body).unwrap(),
        serde_json::json!({ "error": INVALID_CREDENTIALS_MESSAGE })
    );
}

#[tokio::test]
async fn test_login_returns_token_pair() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![driver("correct-horse")]])
        .into_connection();
    let response = create_axum_router(db, config())
        .oneshot(login_request("Driver@Example.com", "correct-horse"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::SET_COOKIE));

    let body = body_json(response).await;
    assert!(body["access"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refresh"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(
        body["user"],
        serde_json::json!({
            "id": 42,
            "email": "driver@example.com",
            "first_name": "Dana",
            "last_name": "Reyes",
        })
    );
}

#[tokio::test]
async fn test_updating_another_user_is_forbidden() {
    let config = config();
    let app = create_axum_router(empty_db(), config.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/users/7")
                .header(header::AUTHORIZATION, bearer(TokenType::Access, &config))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"first_name":"Mallory"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

fn log_model(id: i32) -> daily_log::Model {
    daily_log::Model {
        id,
        trip_id: 3,
        date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        pickup_location: "Dallas, TX".to_string(),
        dropoff_location: "Memphis, TN".to_string(),
        total_miles_driven: 452.0,
        total_mileage_today: 452.0,
        trailer_or_plate: None,
        carrier_name: Some("Reyes Freight".to_string()),
        main_office_address: None,
        home_terminal_address: None,
        manifest_number: None,
        shipper_and_commodity: None,
        remarks: None,
        total_driving_hours: Decimal::from(8),
        total_on_duty_hours: Decimal::ZERO,
        total_off_duty_hours: Decimal::ZERO,
        total_sleeper_hours: Decimal::ZERO,
    }
}

fn trip_model() -> trip::Model {
    trip::Model {
        id: 3,
        user_id: 42,
        pickup_location: "Dallas, TX".to_string(),
        pickup_latitude: None,
        pickup_longitude: None,
        dropoff_location: "Memphis, TN".to_string(),
        dropoff_latitude: None,
        dropoff_longitude: None,
        current_location: None,
        current_cycle_used: Decimal::ZERO,
        start_date: Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap(),
        end_date: None,
        total_miles: 452.0,
        status: TripStatus::Ongoing,
    }
}

#[tokio::test]
async fn test_pdf_download_is_an_attachment() {
    let config = config();
    let entry_row = BTreeMap::from([
        ("activity_type", Value::from("driving")),
        ("start_hour", Value::from(8i16)),
        ("end_hour", Value::from(16i16)),
    ]);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![log_model(11)]])
        .append_query_results([vec![trip_model()]])
        .append_query_results([vec![driver("correct-horse")]])
        .append_query_results([vec![entry_row]])
        .into_connection();
    let app = create_axum_router(db, config.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/logs/11/pdf")
                .header(header::AUTHORIZATION, bearer(TokenType::Access, &config))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"log_11.pdf\""
    );
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_registration_is_public() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([vec![driver("correct-horse")]])
        .into_connection();
    let app = create_axum_router(db, config());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "Driver@Example.com",
                        "password": "correct-horse",
                        "first_name": "Dana",
                        "last_name": "Reyes",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], 42);
    assert_eq!(body["email"], "driver@example.com");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_user_listing_still_needs_a_token() {
    let app = create_axum_router(empty_db(), config());
    let response = app
        .oneshot(Request::builder().uri("/api/users/42").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
