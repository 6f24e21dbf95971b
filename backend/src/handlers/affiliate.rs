//! Affiliate portal: an affiliate managing their own profile, page and payouts.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        affiliate::{
            AffiliateProfile, AffiliateStatus, EditAffiliatePagePayload, Payout,
            RequestPayoutPayload, UpdateAffiliateProfilePayload,
        },
        user::User,
    },
    repositories::affiliate as affiliate_repo,
    services::activity_log::RequestContext,
    state::AppState,
};

async fn own_profile(state: &AppState, user: &User) -> Result<AffiliateProfile, AppError> {
    affiliate_repo::fetch_affiliate_by_user(&state.pool, &user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Affiliate profile not found".into()))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<AffiliateProfile>, AppError> {
    Ok(Json(own_profile(&state, &user).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Json(payload): Json<UpdateAffiliateProfilePayload>,
) -> Result<Json<AffiliateProfile>, AppError> {
    payload.validate()?;
    let fields = payload.changed_fields();
    if fields.is_empty() {
        return Err(AppError::BadRequest("No profile fields to update".into()));
    }
    let profile = own_profile(&state, &user).await?;

    let updated = affiliate_repo::update_affiliate_profile(&state.pool, &profile.id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Affiliate profile not found".into()))?;

    state
        .activity
        .affiliate()
        .profile_updated(&user.id, &updated.id, fields, Some(&context))
        .await;

    Ok(Json(updated))
}

pub async fn edit_page(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Json(payload): Json<EditAffiliatePagePayload>,
) -> Result<Json<AffiliateProfile>, AppError> {
    payload.validate()?;
    let profile = own_profile(&state, &user).await?;

    let updated =
        affiliate_repo::update_affiliate_page(&state.pool, &profile.id, &payload.page_content)
            .await?
            .ok_or_else(|| AppError::NotFound("Affiliate profile not found".into()))?;

    state
        .activity
        .affiliate()
        .page_edited(&user.id, &updated.id, Some(&context))
        .await;

    Ok(Json(updated))
}

pub async fn request_payout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    context: RequestContext,
    Json(payload): Json<RequestPayoutPayload>,
) -> Result<(StatusCode, Json<Payout>), AppError> {
    payload.validate()?;
    let profile = own_profile(&state, &user).await?;
    if profile.status != AffiliateStatus::Active {
        return Err(AppError::Forbidden(
            "Only active affiliates can request payouts".into(),
        ));
    }

    let payout = affiliate_repo::insert_payout(
        &state.pool,
        &Uuid::new_v4().to_string(),
        &profile.id,
        payload.amount_cents,
        &payload.currency,
    )
    .await?;

    state
        .activity
        .payout()
        .requested(
            &user.id,
            &payout.id,
            &profile.id,
            payout.amount_cents,
            &payout.currency,
            Some(&context),
        )
        .await;

    Ok((StatusCode::CREATED, Json(payout)))
}
