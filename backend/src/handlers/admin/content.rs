//! Back-office content management. Every mutation is recorded once it has
//! been committed.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        content::{
            BlogPost, Category, CategoryPayload, CreateBlogPostPayload, Faq, FaqPayload,
            GlobalSettings, UpdateBlogPostPayload, UpdateGlobalSettingsPayload,
        },
        user::User,
    },
    repositories::content as content_repo,
    services::activity_log::RequestContext,
    state::AppState,
};

fn post_not_found() -> AppError {
    AppError::NotFound("Blog post not found".into())
}

pub async fn list_blog_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    Ok(Json(content_repo::list_blog_posts(&state.pool).await?))
}

pub async fn create_blog_post(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Json(payload): Json<CreateBlogPostPayload>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    payload.validate()?;
    let post = content_repo::insert_blog_post(
        &state.pool,
        &Uuid::new_v4().to_string(),
        &user.id,
        &payload,
    )
    .await?;

    state
        .activity
        .blog_post()
        .created(&user.id, &post.id, &post.title, Some(&context))
        .await;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_blog_post(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBlogPostPayload>,
) -> Result<Json<BlogPost>, AppError> {
    payload.validate()?;
    let post = content_repo::update_blog_post(&state.pool, &id, &payload)
        .await?
        .ok_or_else(post_not_found)?;

    state
        .activity
        .blog_post()
        .updated(
            &user.id,
            &post.id,
            &post.title,
            payload.changed_fields(),
            Some(&context),
        )
        .await;

    Ok(Json(post))
}

pub async fn delete_blog_post(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let post = content_repo::delete_blog_post(&state.pool, &id)
        .await?
        .ok_or_else(post_not_found)?;

    state
        .activity
        .blog_post()
        .deleted(&user.id, &post.id, &post.title, Some(&context))
        .await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn publish_blog_post(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    let post = content_repo::set_blog_post_published(&state.pool, &id, true)
        .await?
        .ok_or_else(post_not_found)?;

    state
        .activity
        .blog_post()
        .published(&user.id, &post.id, &post.title, Some(&context))
        .await;

    Ok(Json(post))
}

pub async fn unpublish_blog_post(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    let post = content_repo::set_blog_post_published(&state.pool, &id, false)
        .await?
        .ok_or_else(post_not_found)?;

    state
        .activity
        .blog_post()
        .unpublished(&user.id, &post.id, &post.title, Some(&context))
        .await;

    Ok(Json(post))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(content_repo::list_categories(&state.pool).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    payload.validate()?;
    let category =
        content_repo::insert_category(&state.pool, &Uuid::new_v4().to_string(), &payload).await?;

    state
        .activity
        .category()
        .created(&user.id, &category.id, &category.name, Some(&context))
        .await;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>, AppError> {
    payload.validate()?;
    let category = content_repo::update_category(&state.pool, &id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    state
        .activity
        .category()
        .updated(&user.id, &category.id, &category.name, Some(&context))
        .await;

    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let category = content_repo::delete_category(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    state
        .activity
        .category()
        .deleted(&user.id, &category.id, &category.name, Some(&context))
        .await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_faqs(State(state): State<AppState>) -> Result<Json<Vec<Faq>>, AppError> {
    Ok(Json(content_repo::list_faqs(&state.pool).await?))
}

pub async fn create_faq(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Json(payload): Json<FaqPayload>,
) -> Result<(StatusCode, Json<Faq>), AppError> {
    payload.validate()?;
    let faq = content_repo::insert_faq(&state.pool, &Uuid::new_v4().to_string(), &payload).await?;

    state
        .activity
        .faq()
        .created(&user.id, &faq.id, &faq.question, Some(&context))
        .await;

    Ok((StatusCode::CREATED, Json(faq)))
}

pub async fn update_faq(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<FaqPayload>,
) -> Result<Json<Faq>, AppError> {
    payload.validate()?;
    let faq = content_repo::update_faq(&state.pool, &id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("FAQ not found".into()))?;

    state
        .activity
        .faq()
        .updated(&user.id, &faq.id, &faq.question, Some(&context))
        .await;

    Ok(Json(faq))
}

pub async fn delete_faq(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let faq = content_repo::delete_faq(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("FAQ not found".into()))?;

    state
        .activity
        .faq()
        .deleted(&user.id, &faq.id, &faq.question, Some(&context))
        .await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<GlobalSettings>, AppError> {
    Ok(Json(content_repo::fetch_global_settings(&state.pool).await?))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Json(payload): Json<UpdateGlobalSettingsPayload>,
) -> Result<Json<GlobalSettings>, AppError> {
    payload.validate()?;
    let fields = payload.changed_fields();
    if fields.is_empty() {
        return Err(AppError::BadRequest("No settings to update".into()));
    }
    let settings = content_repo::update_global_settings(&state.pool, &payload).await?;

    state
        .activity
        .settings()
        .updated(&user.id, fields, Some(&context))
        .await;

    Ok(Json(settings))
}
