use axum::{
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, docs::ApiDoc, handlers, middleware, state::AppState};

pub fn app_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/auth/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth,
        ));

    let affiliate_routes = Router::new()
        .route(
            "/api/affiliate/profile",
            get(handlers::affiliate::get_profile).put(handlers::affiliate::update_profile),
        )
        .route("/api/affiliate/page", put(handlers::affiliate::edit_page))
        .route(
            "/api/affiliate/payouts",
            post(handlers::affiliate::request_payout),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_affiliate,
        ));

    let admin_routes = Router::new()
        .route(
            "/api/admin/activity-logs",
            get(handlers::admin::list_activity_logs),
        )
        .route(
            "/api/admin/activity-logs/stats",
            get(handlers::admin::get_activity_stats),
        )
        .route(
            "/api/admin/activity-logs/{id}",
            get(handlers::admin::get_activity_log),
        )
        .route(
            "/api/admin/affiliate-activity",
            get(handlers::admin::get_affiliate_activity),
        )
        .route(
            "/api/admin/blog-posts",
            get(handlers::admin::list_blog_posts).post(handlers::admin::create_blog_post),
        )
        .route(
            "/api/admin/blog-posts/{id}",
            put(handlers::admin::update_blog_post).delete(handlers::admin::delete_blog_post),
        )
        .route(
            "/api/admin/blog-posts/{id}/publish",
            post(handlers::admin::publish_blog_post),
        )
        .route(
            "/api/admin/blog-posts/{id}/unpublish",
            post(handlers::admin::unpublish_blog_post),
        )
        .route(
            "/api/admin/categories",
            get(handlers::admin::list_categories).post(handlers::admin::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            put(handlers::admin::update_category).delete(handlers::admin::delete_category),
        )
        .route(
            "/api/admin/faqs",
            get(handlers::admin::list_faqs).post(handlers::admin::create_faq),
        )
        .route(
            "/api/admin/faqs/{id}",
            put(handlers::admin::update_faq).delete(handlers::admin::delete_faq),
        )
        .route(
            "/api/admin/settings",
            get(handlers::admin::get_settings).put(handlers::admin::update_settings),
        )
        .route(
            "/api/admin/users",
            get(handlers::admin::list_users).post(handlers::admin::create_user),
        )
        .route("/api/admin/users/{id}", delete(handlers::admin::delete_user))
        .route(
            "/api/admin/users/{id}/role",
            put(handlers::admin::change_user_role),
        )
        .route(
            "/api/admin/affiliates",
            get(handlers::admin::list_affiliates).post(handlers::admin::create_affiliate),
        )
        .route(
            "/api/admin/affiliates/{id}/approve",
            post(handlers::admin::approve_affiliate),
        )
        .route(
            "/api/admin/affiliates/{id}/suspend",
            post(handlers::admin::suspend_affiliate),
        )
        .route(
            "/api/admin/affiliates/{id}/notes",
            get(handlers::admin::list_affiliate_notes).post(handlers::admin::add_affiliate_note),
        )
        .route(
            "/api/admin/affiliates/{id}/payment-account",
            post(handlers::admin::create_payment_account),
        )
        .route("/api/admin/payouts", get(handlers::admin::list_payouts))
        .route(
            "/api/admin/payouts/{id}/process",
            post(handlers::admin::process_payout),
        )
        .route(
            "/api/admin/payouts/{id}/fail",
            post(handlers::admin::fail_payout),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_admin,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(affiliate_routes)
        .merge(admin_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(24 * 60 * 60))
}
