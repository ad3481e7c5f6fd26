// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Login, logout, session and sign-up endpoints.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use metrics::counter;
use tracing::{info, warn};
use whathefood_common::{
    router::on_login_success, Account, ClaimSet, Identity, LoginRequest, LoginResponse,
    RegisterRequest,
};
use zeroize::Zeroizing;

use crate::auth::{clear_session_cookie, session_cookie, AuthError};
use crate::error::AppError;
use crate::metrics::{LOGIN_FAILED, LOGIN_SUCCEEDED};
use crate::AppState;

/// `POST /api/auth/login`
///
/// Success sets the session cookie and names the first screen for the
/// account's role. Every failure answers in the same `LoginResponse` shape.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(LoginRequest { email, password })) = payload else {
        counter!(LOGIN_FAILED).increment(1);
        return AuthError::MalformedRequest.into_response();
    };
    let password = Zeroizing::new(password);

    let account = match state.auth.authenticate(&email, &password).await {
        Ok(account) => account,
        Err(err) => {
            counter!(LOGIN_FAILED).increment(1);
            warn!(%email, reason = %err, "login failed");
            return err.into_response();
        },
    };

    match issue_session(&state, &account) {
        Ok(cookie) => {
            counter!(LOGIN_SUCCEEDED).increment(1);
            info!(%email, role = %account.role, "login succeeded");
            let user = ClaimSet::from(&account);
            let redirect = on_login_success(&user, &state.settings.landing.home).to_string();
            ([(SET_COOKIE, cookie)], Json(LoginResponse::Success { user, redirect })).into_response()
        },
        Err(err) => {
            counter!(LOGIN_FAILED).increment(1);
            tracing::error!(%email, error = %err, "could not issue session");
            AuthError::StoreUnavailable.into_response()
        },
    }
}

fn issue_session(state: &AppState, account: &Account) -> Result<axum::http::HeaderValue, AppError> {
    let token = state.auth.issue(account)?;
    session_cookie(&state.settings.session, &token)
}

/// `POST /api/auth/logout`
///
/// Only clears the cookie; a copied token stays valid until it expires.
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let cookie = clear_session_cookie(&state.settings.session)?;
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response())
}

/// `GET /api/auth/session`
///
/// The route authorizer has already read the session for this request.
pub async fn session(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}

/// `POST /api/auth/register`
///
/// Self-service accounts are always `USER`.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let Json(request) = payload?;
    let account = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// `GET /healthz`
pub async fn health() -> &'static str {
    "ok"
}
