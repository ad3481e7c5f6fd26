// ============================
// backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use whathefood_common::LoginResponse;

pub mod password;
pub mod session;
mod service;
mod service_impl;
pub mod verifier;

pub use password::{
    hash_password, hash_password_secure, validate_password_strength, verify_password,
    PasswordRequirements, MIN_PASSWORD_LENGTH,
};
pub use service::AuthService;
pub use service_impl::{provision_admin, DefaultAuth};
pub use session::{
    clear_session_cookie, session_cookie, SessionIssuer, SessionKeys, SessionReader, SignedToken,
    SESSION_COOKIE, SESSION_TTL,
};
pub use verifier::CredentialVerifier;

/// Why a login did not produce a session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Empty field, unknown email or wrong password, indistinguishable
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Body is not a login form at all
    #[error("malformed login request")]
    MalformedRequest,

    #[error("account store unavailable")]
    StoreUnavailable,
}

impl AuthError {
    pub fn status_code(self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::MalformedRequest => StatusCode::BAD_REQUEST,
            AuthError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// The only text an end user ever sees for this failure
    pub fn public_message(self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::MalformedRequest => "Malformed login request",
            AuthError::StoreUnavailable => "Something went wrong, please try again",
        }
    }
}

/// Login failures answer in the same shape as a successful login.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = LoginResponse::Failure {
            error: self.public_message().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
