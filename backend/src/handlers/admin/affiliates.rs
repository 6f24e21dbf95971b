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
        activity_log::ActorRole,
        affiliate::{
            AffiliateNote, AffiliateProfile, AffiliateStatus, CreateAffiliateNotePayload,
            CreateAffiliatePayload, SuspendAffiliatePayload,
        },
        user::User,
    },
    repositories::{affiliate as affiliate_repo, user as user_repo},
    services::activity_log::RequestContext,
    state::AppState,
};

async fn load_affiliate(state: &AppState, id: &str) -> Result<AffiliateProfile, AppError> {
    affiliate_repo::fetch_affiliate(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Affiliate not found".into()))
}

pub async fn list_affiliates(
    State(state): State<AppState>,
) -> Result<Json<Vec<AffiliateProfile>>, AppError> {
    Ok(Json(affiliate_repo::list_affiliates(&state.pool).await?))
}

pub async fn create_affiliate(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Json(payload): Json<CreateAffiliatePayload>,
) -> Result<(StatusCode, Json<AffiliateProfile>), AppError> {
    payload.validate()?;

    let owner = user_repo::fetch_user_by_id(&state.pool, &payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    if owner.role != ActorRole::Affiliate {
        return Err(AppError::BadRequest(
            "Affiliate profiles can only belong to AFFILIATE accounts".into(),
        ));
    }

    let profile =
        affiliate_repo::insert_affiliate(&state.pool, &Uuid::new_v4().to_string(), &payload)
            .await?;

    state
        .activity
        .affiliate()
        .created(&admin.id, &profile.id, &profile.company_name, Some(&context))
        .await;

    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn approve_affiliate(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<AffiliateProfile>, AppError> {
    let profile = affiliate_repo::set_affiliate_status(&state.pool, &id, AffiliateStatus::Active)
        .await?
        .ok_or_else(|| AppError::NotFound("Affiliate not found".into()))?;

    state
        .activity
        .affiliate()
        .approved(&admin.id, &profile.id, &profile.company_name, Some(&context))
        .await;

    Ok(Json(profile))
}

pub async fn suspend_affiliate(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<SuspendAffiliatePayload>,
) -> Result<Json<AffiliateProfile>, AppError> {
    payload.validate()?;
    let profile =
        affiliate_repo::set_affiliate_status(&state.pool, &id, AffiliateStatus::Suspended)
            .await?
            .ok_or_else(|| AppError::NotFound("Affiliate not found".into()))?;

    state
        .activity
        .affiliate()
        .suspended(
            &admin.id,
            &profile.id,
            &profile.company_name,
            &payload.reason,
            Some(&context),
        )
        .await;

    Ok(Json(profile))
}

pub async fn list_affiliate_notes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AffiliateNote>>, AppError> {
    let profile = load_affiliate(&state, &id).await?;
    Ok(Json(affiliate_repo::list_notes(&state.pool, &profile.id).await?))
}

pub async fn add_affiliate_note(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<CreateAffiliateNotePayload>,
) -> Result<(StatusCode, Json<AffiliateNote>), AppError> {
    payload.validate()?;
    let profile = load_affiliate(&state, &id).await?;

    let note = affiliate_repo::insert_note(
        &state.pool,
        &Uuid::new_v4().to_string(),
        &profile.id,
        &admin.id,
        &payload.body,
        payload.priority,
    )
    .await?;

    state
        .activity
        .affiliate()
        .note_added(&admin.id, &profile.id, note.priority, Some(&context))
        .await;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Onboards the affiliate with the payment provider. The provider is mocked:
/// the account id is generated locally.
pub async fn create_payment_account(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<AffiliateProfile>), AppError> {
    let profile = load_affiliate(&state, &id).await?;
    let provider = state.activity.payment_provider();

    if profile.payment_account_id.is_some() {
        return Err(AppError::Conflict(
            "Affiliate already has a payment account".into(),
        ));
    }
    if profile.status == AffiliateStatus::Suspended {
        provider
            .onboarding_failed(
                &admin.id,
                &profile.id,
                "affiliate is suspended",
                Some(&context),
            )
            .await;
        return Err(AppError::Conflict(
            "Suspended affiliates cannot be onboarded".into(),
        ));
    }

    let account_id = format!("acct_{}", Uuid::new_v4().simple());
    let updated = affiliate_repo::set_payment_account(&state.pool, &profile.id, &account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Affiliate not found".into()))?;

    provider
        .account_created(&admin.id, &updated.id, &account_id, Some(&context))
        .await;
    provider
        .onboarding_completed(&admin.id, &updated.id, &account_id, Some(&context))
        .await;

    Ok((StatusCode::CREATED, Json(updated)))
}
