//! Login, logout, session and sign-up through the HTTP API
use axum::http::{header, StatusCode};
use backend_lib::storage::UserStore;
use serde_json::json;
use crate::test_utils::*;

#[tokio::test]
async fn test_admin_login_lands_on_console() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let response = send(
        &app,
        json_request("/api/auth/login", json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["redirect"], "/admin/dashboard");
    assert_eq!(body["user"]["role"], "ADMIN");
    assert_eq!(body["user"]["display_name"], "Admin");
}

#[tokio::test]
async fn test_user_login_lands_on_dashboard() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let response = send(
        &app,
        json_request("/api/auth/login", json!({ "email": USER_EMAIL, "password": USER_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["redirect"], "/dashboard");
    assert_eq!(body["user"]["role"], "USER");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let wrong_password = send(
        &app,
        json_request("/api/auth/login", json!({ "email": ADMIN_EMAIL, "password": "nope-nope" })),
    )
    .await;
    let unknown_email = send(
        &app,
        json_request("/api/auth/login", json!({ "email": "ghost@x.com", "password": "nope-nope" })),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());
    assert!(unknown_email.headers().get(header::SET_COOKIE).is_none());

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
    assert_eq!(a["status"], "failure");
}

#[tokio::test]
async fn test_missing_fields_fail_like_a_wrong_password() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let wrong_password = send(
        &app,
        json_request("/api/auth/login", json!({ "email": ADMIN_EMAIL, "password": "nope-nope" })),
    )
    .await;
    let expected_status = wrong_password.status();
    let expected_body = body_json(wrong_password).await;

    for form in [
        json!({ "email": ADMIN_EMAIL }),
        json!({ "password": ADMIN_PASSWORD }),
        json!({ "email": "", "password": "" }),
        json!({}),
    ] {
        let response = send(&app, json_request("/api/auth/login", form.clone())).await;
        assert_eq!(response.status(), expected_status, "{form}");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_json(response).await, expected_body, "{form}");
    }
}

#[tokio::test]
async fn test_unparseable_login_body_is_rejected() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{ not json"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "failure");
}

#[tokio::test]
async fn test_session_endpoint_reflects_cookie() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let anonymous = body_json(send(&app, get_request("/api/auth/session", None)).await).await;
    assert_eq!(anonymous["status"], "anonymous");

    let cookie = login_cookie(&app, USER_EMAIL, USER_PASSWORD).await;
    let identity = body_json(send(&app, get_request("/api/auth/session", Some(&cookie))).await).await;
    assert_eq!(identity["status"], "authenticated");
    assert_eq!(identity["role"], "USER");
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let response = send(
        &app,
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_register_creates_user_and_rejects_duplicates() {
    let (state, store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let form = json!({
        "username": "Nueva",
        "email": "nueva@x.com",
        "password": "secret1",
        "confirm_password": "secret1",
    });
    let response = send(&app, json_request("/api/auth/register", form.clone())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let account = body_json(response).await;
    assert_eq!(account["role"], "USER");
    assert!(account.get("password_hash").is_none());

    let again = send(&app, json_request("/api/auth/register", form)).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let short = send(
        &app,
        json_request(
            "/api/auth/register",
            json!({ "username": "Corto", "email": "corto@x.com", "password": "12345" }),
        ),
    )
    .await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    assert!(store.find_by_email("corto@x.com").await.unwrap().is_none());

    // The new account can log in straight away
    let cookie = login_cookie(&app, "nueva@x.com", "secret1").await;
    assert!(cookie.starts_with("whathefood_session="));
}

#[tokio::test]
async fn test_unparseable_register_body_uses_error_shape() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{ \"email\": "))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "JSON_001");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_health() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);
    let response = send(&app, get_request("/healthz", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
