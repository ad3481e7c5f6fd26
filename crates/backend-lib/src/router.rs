// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router: auth API plus the gated page tree.
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers::auth;
use crate::middleware::authorize;
use crate::AppState;

/// Full application: API routes plus the static front-end build.
pub fn create_router(state: Arc<AppState>) -> Router {
    let pages = ServeDir::new(&state.settings.server.static_dir).append_index_html_on_directories(true);
    router_with_pages(state, Router::new().fallback_service(pages))
}

/// Mount `pages` behind the route authorizer.
///
/// The authorizer wraps everything, API included; `/api` is public in the
/// default table so API handlers answer for themselves.
pub fn router_with_pages(state: Arc<AppState>, pages: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/register", post(auth::register))
        .route("/healthz", get(auth::health))
        .merge(pages)
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
