use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common::{normalize_filter, parse_action_filter};
use crate::{
    error::AppError,
    models::activity_log::AffiliateActivityItem,
    read_models::affiliate_activity::{
        distinct_affiliates, ActivityRange, AffiliateActivityResponse, TimelineEntry,
        TimelineFilter, UnknownRange,
    },
    repositories::activity_log::{self, ACTIVITY_PAGE_LIMIT},
    state::AppState,
};

#[derive(Debug, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AffiliateActivityQuery {
    /// `24hours`, `7days` (default), `30days`, `90days` or `all`.
    pub range: Option<String>,
    pub search: Option<String>,
    pub affiliate_id: Option<String>,
    pub action: Option<String>,
}

pub async fn get_affiliate_activity(
    State(state): State<AppState>,
    Query(q): Query<AffiliateActivityQuery>,
) -> Result<Json<AffiliateActivityResponse>, AppError> {
    let range = parse_range(q.range.as_deref())?;
    let timeline_filter = TimelineFilter {
        search: q.search.filter(|value| !value.trim().is_empty()),
        affiliate_id: normalize_filter(q.affiliate_id),
        action: parse_action_filter(q.action)?,
    };

    let now = Utc::now();
    let since = range.since(now);

    let rows = activity_log::list_affiliate_activity(&state.pool, since, ACTIVITY_PAGE_LIMIT)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, range = %range, "failed to list affiliate activity");
            AppError::InternalServerError(err.into())
        })?;
    let stats = activity_log::fetch_affiliate_activity_stats(&state.pool, since)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, range = %range, "failed to compute affiliate stats");
            AppError::InternalServerError(err.into())
        })?;

    let items: Vec<AffiliateActivityItem> =
        rows.into_iter().map(AffiliateActivityItem::from).collect();
    let affiliates = distinct_affiliates(&items);
    let activities = timeline_filter
        .apply(&items)
        .into_iter()
        .map(|item| TimelineEntry::new(item.clone(), now, &state.config.time_zone))
        .collect();

    Ok(Json(AffiliateActivityResponse {
        range,
        activities,
        stats,
        affiliates,
    }))
}

fn parse_range(raw: Option<&str>) -> Result<ActivityRange, AppError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value
            .parse::<ActivityRange>()
            .map_err(|err: UnknownRange| AppError::BadRequest(err.to_string())),
        None => Ok(ActivityRange::default()),
    }
}
