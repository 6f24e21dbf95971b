use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{ChangeRoleRequest, CreateUser, User, UserResponse},
    repositories::user::{self as user_repo, NewUser},
    services::activity_log::RequestContext,
    state::AppState,
    utils::password::hash_password,
};

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_repo::list_users(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    if user_repo::fetch_user_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let id = Uuid::new_v4().to_string();
    let user = user_repo::insert_user(
        &state.pool,
        &NewUser {
            id: &id,
            email: &payload.email,
            name: &payload.name,
            image: payload.image.as_deref(),
            password_hash: &password_hash,
            role: payload.role,
        },
    )
    .await?;

    state
        .activity
        .user()
        .created(&admin.id, &user.id, &user.email, Some(&context))
        .await;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn change_user_role(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Path(user_id): Path<String>,
    Json(payload): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if user_id == admin.id {
        return Err(AppError::BadRequest("You cannot change your own role".into()));
    }

    let existing = user_repo::fetch_user_by_id(&state.pool, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    if existing.role == payload.role {
        return Ok(Json(UserResponse::from(existing)));
    }

    let updated = user_repo::update_user_role(&state.pool, &user_id, payload.role)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    state
        .activity
        .user()
        .role_changed(
            &admin.id,
            &updated.id,
            &updated.email,
            existing.role,
            updated.role,
            Some(&context),
        )
        .await;

    Ok(Json(UserResponse::from(updated)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if user_id == admin.id {
        return Err(AppError::BadRequest("You cannot delete your own account".into()));
    }

    let existing = user_repo::fetch_user_by_id(&state.pool, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    user_repo::delete_user(&state.pool, &user_id).await?;

    state
        .activity
        .user()
        .deleted(&admin.id, &existing.id, &existing.email, Some(&context))
        .await;

    Ok(StatusCode::NO_CONTENT)
}
