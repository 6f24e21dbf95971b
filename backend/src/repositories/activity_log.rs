use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};

use crate::models::activity_log::{
    ActivityAction, ActivityLogRow, ActivityStats, ActorRole, AffiliateActivityRow,
    AffiliateActivityStats, NewActivityLog, RoleCount,
};

/// Upper bound on rows returned by any list query.
pub const ACTIVITY_PAGE_LIMIT: i64 = 500;

const ACTIVITY_COLUMNS: &str = "a.id, a.actor_id, a.actor_role, a.action, a.target, a.metadata, \
     a.ip_address, a.user_agent, a.request_id, a.created_at, \
     u.name AS actor_name, u.email AS actor_email, u.image AS actor_image";

#[derive(Debug, Clone, Default)]
pub struct ActivityLogFilters {
    pub actor_role: Option<ActorRole>,
    pub action: Option<ActivityAction>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub async fn insert_activity_log(pool: &PgPool, log: &NewActivityLog) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO activity_logs \
         (id, actor_id, actor_role, action, target, metadata, ip_address, user_agent, request_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(&log.id)
    .bind(&log.actor_id)
    .bind(log.actor_role.as_str())
    .bind(log.action.as_str())
    .bind(log.target.clone().map(Json))
    .bind(log.metadata.clone().map(Json))
    .bind(&log.ip_address)
    .bind(&log.user_agent)
    .bind(&log.request_id)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn fetch_activity_log(
    pool: &PgPool,
    id: &str,
) -> Result<Option<ActivityLogRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activity_logs a \
         LEFT JOIN users u ON u.id = a.actor_id WHERE a.id = $1"
    );
    sqlx::query_as::<_, ActivityLogRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Newest first, at most `limit` rows (clamped to [`ACTIVITY_PAGE_LIMIT`]).
pub async fn list_activity_logs(
    pool: &PgPool,
    filters: &ActivityLogFilters,
    limit: i64,
) -> Result<Vec<ActivityLogRow>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
    builder.push(ACTIVITY_COLUMNS);
    builder.push(" FROM activity_logs a LEFT JOIN users u ON u.id = a.actor_id");
    let mut has_clause = false;
    apply_activity_filters(&mut builder, &mut has_clause, filters);
    builder
        .push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ")
        .push_bind(clamp_limit(limit));

    builder.build_query_as::<ActivityLogRow>().fetch_all(pool).await
}

pub async fn fetch_activity_stats(
    pool: &PgPool,
    local_midnight: DateTime<Utc>,
) -> Result<ActivityStats, sqlx::Error> {
    let (count_since_local_midnight, total_count, count_distinct_actors) =
        sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT \
             COUNT(*) FILTER (WHERE created_at >= $1), \
             COUNT(*), \
             COUNT(DISTINCT actor_id) \
             FROM activity_logs",
        )
        .bind(local_midnight)
        .fetch_one(pool)
        .await?;

    let counts_by_role = sqlx::query_as::<_, RoleCount>(
        "SELECT actor_role AS role, COUNT(*) AS count FROM activity_logs \
         GROUP BY actor_role ORDER BY actor_role",
    )
    .fetch_all(pool)
    .await?;

    Ok(ActivityStats {
        count_since_local_midnight,
        total_count,
        count_distinct_actors,
        counts_by_role,
    })
}

/// Events recorded with the AFFILIATE role, joined with the actor's profile.
/// `since = None` covers the whole table.
pub async fn list_affiliate_activity(
    pool: &PgPool,
    since: Option<DateTime<Utc>>,
    limit: i64,
) -> Result<Vec<AffiliateActivityRow>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
    builder.push(ACTIVITY_COLUMNS);
    builder.push(
        ", p.id AS affiliate_id, p.company_name AS affiliate_company_name, \
         p.slug AS affiliate_slug \
         FROM activity_logs a \
         LEFT JOIN users u ON u.id = a.actor_id \
         LEFT JOIN affiliate_profiles p ON p.user_id = a.actor_id \
         WHERE a.actor_role = ",
    );
    builder.push_bind(ActorRole::Affiliate.as_str());
    if let Some(since) = since {
        builder.push(" AND a.created_at >= ").push_bind(since);
    }
    builder
        .push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ")
        .push_bind(clamp_limit(limit));

    builder
        .build_query_as::<AffiliateActivityRow>()
        .fetch_all(pool)
        .await
}

pub async fn fetch_affiliate_activity_stats(
    pool: &PgPool,
    since: Option<DateTime<Utc>>,
) -> Result<AffiliateActivityStats, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT COUNT(*) AS total_actions, ");
    builder.push("COUNT(DISTINCT actor_id) AS active_affiliates, ");
    push_action_count(
        &mut builder,
        ActivityAction::UpdatedAffiliateProfile,
        "profile_updates",
    );
    builder.push(", ");
    push_action_count(&mut builder, ActivityAction::EditedAffiliatePage, "page_edits");
    builder.push(", ");
    push_action_count(&mut builder, ActivityAction::AffiliateLogin, "logins");
    builder
        .push(" FROM activity_logs WHERE actor_role = ")
        .push_bind(ActorRole::Affiliate.as_str());
    if let Some(since) = since {
        builder.push(" AND created_at >= ").push_bind(since);
    }

    builder
        .build_query_as::<AffiliateActivityStats>()
        .fetch_one(pool)
        .await
}

/// Retention sweep. The only statement that removes activity rows.
pub async fn delete_activity_logs_before(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM activity_logs WHERE created_at < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, ACTIVITY_PAGE_LIMIT)
}

fn push_action_count(
    builder: &mut QueryBuilder<'_, Postgres>,
    action: ActivityAction,
    alias: &str,
) {
    builder
        .push("COUNT(*) FILTER (WHERE action = ANY(")
        .push_bind(action.stored_names())
        .push(")) AS ")
        .push(alias);
}

fn apply_activity_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    has_clause: &mut bool,
    filters: &ActivityLogFilters,
) {
    if let Some(role) = filters.actor_role {
        push_clause(builder, has_clause);
        builder.push("a.actor_role = ").push_bind(role.as_str());
    }
    if let Some(action) = filters.action {
        push_clause(builder, has_clause);
        builder
            .push("a.action = ANY(")
            .push_bind(action.stored_names())
            .push(")");
    }
    if let Some(from) = filters.from {
        push_clause(builder, has_clause);
        builder.push("a.created_at >= ").push_bind(from);
    }
    if let Some(to) = filters.to {
        push_clause(builder, has_clause);
        builder.push("a.created_at <= ").push_bind(to);
    }
}

fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, has_clause: &mut bool) {
    if *has_clause {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_clause = true;
    }
}
