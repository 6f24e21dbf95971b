use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::normalize_filter;
use crate::{
    error::AppError,
    models::{
        affiliate::{FailPayoutPayload, Payout, PayoutStatus},
        user::User,
    },
    repositories::affiliate as affiliate_repo,
    services::activity_log::RequestContext,
    state::AppState,
};

#[derive(Debug, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PayoutListQuery {
    /// `PENDING`, `PROCESSED`, `FAILED` or `all`.
    pub status: Option<String>,
}

pub async fn list_payouts(
    State(state): State<AppState>,
    Query(q): Query<PayoutListQuery>,
) -> Result<Json<Vec<Payout>>, AppError> {
    let status = normalize_filter(q.status)
        .map(|value| value.parse::<PayoutStatus>())
        .transpose()?;
    Ok(Json(affiliate_repo::list_payouts(&state.pool, status).await?))
}

/// Settles a pending payout, telling "missing" apart from "already settled".
async fn settle(
    state: &AppState,
    id: &str,
    status: PayoutStatus,
    reason: Option<&str>,
) -> Result<Payout, AppError> {
    let existing = affiliate_repo::fetch_payout(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Payout not found".into()))?;
    if existing.status != PayoutStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Payout is already {}",
            existing.status
        )));
    }
    affiliate_repo::settle_payout(&state.pool, id, status, reason)
        .await?
        .ok_or_else(|| AppError::Conflict("Payout was settled concurrently".into()))
}

pub async fn process_payout(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Payout>, AppError> {
    let payout = settle(&state, &id, PayoutStatus::Processed, None).await?;

    state
        .activity
        .payout()
        .processed(
            &admin.id,
            &payout.id,
            &payout.affiliate_id,
            payout.amount_cents,
            &payout.currency,
            Some(&context),
        )
        .await;

    Ok(Json(payout))
}

pub async fn fail_payout(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    context: RequestContext,
    Path(id): Path<String>,
    Json(payload): Json<FailPayoutPayload>,
) -> Result<Json<Payout>, AppError> {
    payload.validate()?;
    let payout = settle(&state, &id, PayoutStatus::Failed, Some(&payload.reason)).await?;

    state
        .activity
        .payout()
        .failed(
            &admin.id,
            &payout.id,
            &payout.affiliate_id,
            &payload.reason,
            Some(&context),
        )
        .await;

    Ok(Json(payout))
}
