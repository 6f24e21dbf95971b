use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginRequest, LoginResponse, User, UserResponse},
    repositories::user as user_repo,
    services::activity_log::RequestContext,
    state::AppState,
    utils::{jwt::create_access_token, password::verify_password},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn login(
    State(state): State<AppState>,
    context: RequestContext,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;
    let auth_activity = state.activity.auth();

    let Some(user) = user_repo::fetch_user_by_email(&state.pool, &payload.email).await? else {
        auth_activity
            .failed_login(&payload.email, "unknown_email", Some(&context))
            .await;
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        auth_activity
            .failed_login(&payload.email, "invalid_password", Some(&context))
            .await;
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let access_token = create_access_token(
        user.id.clone(),
        user.email.clone(),
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    auth_activity.login(&user.id, user.role, Some(&context)).await;
    tracing::info!(user_id = %user.id, role = %user.role, "user logged in");

    Ok(Json(LoginResponse {
        access_token,
        user: UserResponse::from(user),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
) -> StatusCode {
    state
        .activity
        .auth()
        .logout(&user.id, user.role, Some(&context))
        .await;
    StatusCode::NO_CONTENT
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
