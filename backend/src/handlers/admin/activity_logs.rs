use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common::{parse_action_filter, parse_bound, parse_role_filter};
use crate::{
    error::AppError,
    models::activity_log::ActivityLogItem,
    read_models::global_activity::{
        ActivityDashboardStats, ActivityRowDetail, ActivityTableFilter, ExpandedRows,
    },
    repositories::activity_log::{self, ActivityLogFilters, ACTIVITY_PAGE_LIMIT},
    state::AppState,
    utils::time::local_midnight_utc,
};

#[derive(Debug, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ActivityLogListQuery {
    /// `ADMIN`, `AFFILIATE`, `USER` or `all`.
    pub actor_role: Option<String>,
    /// Action name or `all`.
    pub action: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Case-insensitive match on actor name, email or action.
    pub search: Option<String>,
    /// Comma-separated ids of rows whose detail should be included.
    pub expanded: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogListResponse {
    pub items: Vec<ActivityLogItem>,
    pub limit: i64,
    /// Detail for each expanded row on this page, in page order.
    pub details: Vec<ActivityRowDetail>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogDetailResponse {
    pub log: ActivityLogItem,
    pub detail: ActivityRowDetail,
}

pub async fn list_activity_logs(
    State(state): State<AppState>,
    Query(q): Query<ActivityLogListQuery>,
) -> Result<Json<ActivityLogListResponse>, AppError> {
    let expanded: ExpandedRows = q
        .expanded
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    let (filters, search) = build_filters(q, &state.config.time_zone)?;

    let rows = activity_log::list_activity_logs(&state.pool, &filters, ACTIVITY_PAGE_LIMIT)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to list activity logs");
            AppError::InternalServerError(err.into())
        })?;
    let items: Vec<ActivityLogItem> = rows.into_iter().map(ActivityLogItem::from).collect();

    let table_filter = ActivityTableFilter {
        search,
        ..Default::default()
    };
    let items = if table_filter.is_empty() {
        items
    } else {
        table_filter
            .apply(&items, &state.config.time_zone)
            .into_iter()
            .cloned()
            .collect()
    };

    let details = expanded.details(&items);
    Ok(Json(ActivityLogListResponse {
        items,
        limit: ACTIVITY_PAGE_LIMIT,
        details,
    }))
}

pub async fn get_activity_stats(
    State(state): State<AppState>,
) -> Result<Json<ActivityDashboardStats>, AppError> {
    let midnight = local_midnight_utc(&state.config.time_zone);
    let stats = activity_log::fetch_activity_stats(&state.pool, midnight)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to compute activity stats");
            AppError::InternalServerError(err.into())
        })?;
    Ok(Json(ActivityDashboardStats::from(stats)))
}

pub async fn get_activity_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActivityLogDetailResponse>, AppError> {
    let row = activity_log::fetch_activity_log(&state.pool, id.trim())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, activity_id = %id, "failed to fetch activity log");
            AppError::InternalServerError(err.into())
        })?
        .ok_or_else(|| AppError::NotFound("Activity log not found".into()))?;

    let log = ActivityLogItem::from(row);
    let detail = ActivityRowDetail::from(&log);
    Ok(Json(ActivityLogDetailResponse { log, detail }))
}

fn build_filters(
    q: ActivityLogListQuery,
    tz: &chrono_tz::Tz,
) -> Result<(ActivityLogFilters, Option<String>), AppError> {
    let actor_role = parse_role_filter(q.actor_role)?;
    let action = parse_action_filter(q.action)?;
    let from = parse_bound(q.start_date, true, "startDate", tz)?;
    let to = parse_bound(q.end_date, false, "endDate", tz)?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(AppError::BadRequest(
                "`startDate` must be before or equal to `endDate`".into(),
            ));
        }
    }

    let search = q
        .search
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    Ok((
        ActivityLogFilters {
            actor_role,
            action,
            from,
            to,
        },
        search,
    ))
}
