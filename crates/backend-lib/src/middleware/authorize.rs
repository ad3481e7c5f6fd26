use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use metrics::counter;

use crate::metrics::{ROUTE_ALLOWED, ROUTE_REDIRECTED};
use crate::policy::{decide, Decision};
use crate::AppState;

/// Route authorizer.
///
/// Runs before every page is served: classify the path, read the session,
/// then either hand the request on with its `Identity` in the extensions, or
/// redirect. Never answers 403.
pub async fn authorize(State(state): State<Arc<AppState>>, mut request: Request, next: Next) -> Response {
    let class = state.policy.classify(request.uri().path());
    let identity = state.sessions.read(request.headers());

    match decide(class, &identity, &state.settings.landing) {
        Decision::Allow => {
            counter!(ROUTE_ALLOWED).increment(1);
            request.extensions_mut().insert(identity);
            next.run(request).await
        },
        Decision::Redirect(target) => {
            counter!(ROUTE_REDIRECTED).increment(1);
            tracing::debug!(
                path = %request.uri().path(),
                ?class,
                role = ?identity.role(),
                %target,
                "redirecting"
            );
            Redirect::temporary(target).into_response()
        },
    }
}
