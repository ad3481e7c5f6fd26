// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::{http::StatusCode, response::IntoResponse};
use backend_lib::auth::AuthError;
use backend_lib::error::AppError;
use backend_lib::storage::StoreError;
use backend_lib::validation::ValidationError;
use std::io::{Error as IoError, ErrorKind};

#[test]
fn test_app_error_status_codes() {
    assert_eq!(
        AppError::from(ValidationError::PasswordMismatch).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(AppError::from(StoreError::EmailTaken).status_code(), StatusCode::CONFLICT);
    assert_eq!(
        AppError::from(StoreError::Io(IoError::other("disk"))).status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[test]
fn test_login_error_status_codes() {
    assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(AuthError::MalformedRequest.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AuthError::StoreUnavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn test_auth_errors_do_not_reveal_which_half_failed() {
    let message = AuthError::InvalidCredentials.public_message().to_lowercase();
    assert_eq!(message, "invalid credentials");
    assert!(!message.contains("email"));
    assert!(!message.contains("password"));
}

#[test]
fn test_store_errors_are_sanitized() {
    let err = AppError::from(StoreError::Io(IoError::new(
        ErrorKind::PermissionDenied,
        "/srv/data/users.json",
    )));
    assert_eq!(err.error_code(), "STORE_001");
    assert!(!err.sanitized_message().contains("users.json"));
}

#[test]
fn test_error_response_status() {
    let response = AuthError::InvalidCredentials.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = AppError::from(StoreError::EmailTaken).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
