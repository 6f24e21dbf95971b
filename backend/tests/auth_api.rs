use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use icetracer_backend::{models::activity_log::ActorRole, routes::app_router, state::AppState};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

mod support;

use support::{
    activity_for_actor, body_json, create_test_token, integration_guard, seed_user,
    seed_user_with_password, test_config, test_pool,
};

fn app(pool: PgPool) -> axum::Router {
    app_router(AppState::new(pool, test_config()))
}

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .header(header::USER_AGENT, "auth-api-test")
        .body(Body::from(
            json!({ "email": email, "password": password }).to_string(),
        ))
        .expect("build login request")
}

#[tokio::test]
async fn admin_login_records_admin_login_with_request_context() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let admin = seed_user_with_password(&pool, ActorRole::Admin, "s3cret-password").await;

    let response = app(pool.clone())
        .oneshot(login_request(&admin.email.to_uppercase(), "s3cret-password"))
        .await
        .expect("call login");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["role"], "ADMIN");

    let (ip, agent, request_id): (Option<String>, Option<String>, Option<String>) =
        sqlx::query_as(
            "SELECT ip_address, user_agent, request_id FROM activity_logs \
             WHERE actor_id = $1 AND action = 'admin_login'",
        )
        .bind(&admin.id)
        .fetch_one(&pool)
        .await
        .expect("admin_login row");
    assert_eq!(ip.as_deref(), Some("203.0.113.9"));
    assert_eq!(agent.as_deref(), Some("auth-api-test"));
    assert!(request_id.is_some());
}

#[tokio::test]
async fn affiliate_login_records_affiliate_login() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let affiliate = seed_user_with_password(&pool, ActorRole::Affiliate, "s3cret-password").await;

    let response = app(pool.clone())
        .oneshot(login_request(&affiliate.email, "s3cret-password"))
        .await
        .expect("call login");
    assert_eq!(response.status(), StatusCode::OK);

    let rows = activity_for_actor(&pool, &affiliate.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "affiliate_login");
    assert_eq!(rows[0].1, "AFFILIATE");
}

#[tokio::test]
async fn wrong_password_is_rejected_and_recorded_as_failed_login() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let admin = seed_user_with_password(&pool, ActorRole::Admin, "s3cret-password").await;

    let response = app(pool.clone())
        .oneshot(login_request(&admin.email, "not-the-password"))
        .await
        .expect("call login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (action, metadata): (String, serde_json::Value) = sqlx::query_as(
        "SELECT action, metadata FROM activity_logs WHERE actor_id = $1",
    )
    .bind(&admin.email)
    .fetch_one(&pool)
    .await
    .expect("failed_login row");
    assert_eq!(action, "failed_login");
    assert_eq!(metadata["data"]["reason"], "invalid_password");
    assert!(activity_for_actor(&pool, &admin.id).await.is_empty());
}

#[tokio::test]
async fn unknown_email_gets_the_same_answer_as_a_wrong_password() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let email = format!("ghost_{}@example.com", uuid::Uuid::new_v4().simple());

    let response = app(pool.clone())
        .oneshot(login_request(&email, "whatever-password"))
        .await
        .expect("call login");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid email or password");

    let rows = activity_for_actor(&pool, &email).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "failed_login");
}

#[tokio::test]
async fn logout_and_me_require_a_token() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let user = seed_user(&pool, ActorRole::User).await;
    let token = create_test_token(&user);

    let response = app(pool.clone())
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call me");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(pool.clone())
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call me");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], user.id.as_str());

    let response = app(pool.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("call logout");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let rows = activity_for_actor(&pool, &user.id).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "logout");
    assert_eq!(rows[0].1, "USER");
}
