//! Page navigation through the route authorizer with real logins
use axum::http::StatusCode;
use whathefood_common::{LandingPaths, LoginResponse};
use crate::test_utils::*;

#[tokio::test]
async fn test_anonymous_admin_page_redirects_to_login() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);

    let response = send(&app, get_request("/admin/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_user_on_admin_page_goes_to_dashboard() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);
    let cookie = login_cookie(&app, USER_EMAIL, USER_PASSWORD).await;

    for path in ["/admin/dashboard", "/dishes", "/tasks", "/users"] {
        let response = send(&app, get_request(path, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(location(&response), Some("/dashboard"), "{path}");
    }

    for path in ["/dashboard", "/profile", "/", "/about"] {
        let response = send(&app, get_request(path, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_admin_reaches_every_page_but_login() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);
    let cookie = login_cookie(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    for path in ["/admin/dashboard", "/dishes", "/tasks", "/users", "/dashboard", "/"] {
        let response = send(&app, get_request(path, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }

    let response = send(&app, get_request("/register", Some(&cookie))).await;
    assert_eq!(location(&response), Some("/admin/dashboard"));
}

#[tokio::test]
async fn test_signed_in_user_is_bounced_off_login() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);
    let cookie = login_cookie(&app, USER_EMAIL, USER_PASSWORD).await;

    let response = send(&app, get_request("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/dashboard"));

    // Signed out, the login page is served
    let response = send(&app, get_request("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_response_drives_client_navigation() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);
    let landing = LandingPaths::default();

    let response = send(
        &app,
        json_request(
            "/api/auth/login",
            serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    let cookie = session_cookie_pair(&response).unwrap();
    let reply: LoginResponse = serde_json::from_value(body_json(response).await).unwrap();
    let target = reply.navigation_target(&landing).unwrap().to_string();
    assert_eq!(target, "/admin/dashboard");

    // Following the target with the new cookie is allowed by the gate
    let response = send(&app, get_request(&target, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let failed = send(
        &app,
        json_request(
            "/api/auth/login",
            serde_json::json!({ "email": ADMIN_EMAIL, "password": "wrong-one" }),
        ),
    )
    .await;
    let reply: LoginResponse = serde_json::from_value(body_json(failed).await).unwrap();
    assert_eq!(reply.navigation_target(&landing), None);
}

#[tokio::test]
async fn test_tampered_cookie_reads_as_anonymous() {
    let (state, _store, _dir) = setup_test_env().await;
    let app = test_app(state);
    let cookie = login_cookie(&app, USER_EMAIL, USER_PASSWORD).await;

    // Flip one character of the signature
    let mut tampered = cookie.clone().into_bytes();
    let at = tampered.len() - 5;
    tampered[at] = if tampered[at] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let response = send(&app, get_request("/dashboard", Some(&tampered))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/login"));
}
