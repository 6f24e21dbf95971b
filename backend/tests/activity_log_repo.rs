use chrono::{Duration, Utc};
use icetracer_backend::{
    models::{
        activity_log::{ActivityAction, ActivityLogItem, ActorRole, NewActivityLog},
        affiliate::AffiliateStatus,
    },
    repositories::activity_log::{
        delete_activity_logs_before, fetch_activity_log, fetch_affiliate_activity_stats,
        insert_activity_log, list_activity_logs, list_affiliate_activity, ActivityLogFilters,
    },
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

mod support;

use support::{integration_guard, seed_affiliate, seed_user, test_pool};

fn new_log(actor_id: &str, role: ActorRole, action: ActivityAction) -> NewActivityLog {
    NewActivityLog {
        id: Uuid::new_v4().to_string(),
        actor_id: actor_id.to_string(),
        actor_role: role,
        action,
        target: None,
        metadata: Some(json!({ "type": "changed_fields", "data": { "fields": ["title"] } })),
        ip_address: None,
        user_agent: None,
        request_id: None,
    }
}

async fn insert_raw_action(pool: &PgPool, actor_id: &str, role: &str, action: &str) -> String {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO activity_logs (id, actor_id, actor_role, action) VALUES ($1, $2, $3, $4)",
    )
    .bind(&id)
    .bind(actor_id)
    .bind(role)
    .bind(action)
    .execute(pool)
    .await
    .expect("insert raw activity row");
    id
}

#[tokio::test]
async fn inserted_row_reads_back_with_actor_join() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let admin = seed_user(&pool, ActorRole::Admin).await;

    let log = new_log(&admin.id, ActorRole::Admin, ActivityAction::UpdatedBlogPost);
    insert_activity_log(&pool, &log).await.expect("insert");

    let row = fetch_activity_log(&pool, &log.id)
        .await
        .expect("fetch")
        .expect("row exists");
    let item = ActivityLogItem::from(row);
    assert_eq!(item.actor_role, ActorRole::Admin);
    assert_eq!(item.action, "updated_blog_post");
    assert_eq!(item.actor_email.as_deref(), Some(admin.email.as_str()));
    assert_eq!(item.metadata, log.metadata);
}

#[tokio::test]
async fn action_filter_matches_legacy_names_and_reads_them_canonically() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let admin = seed_user(&pool, ActorRole::Admin).await;

    let legacy = insert_raw_action(&pool, &admin.id, "ADMIN", "USER_CREATED").await;
    let current = new_log(&admin.id, ActorRole::Admin, ActivityAction::CreatedUser);
    insert_activity_log(&pool, &current).await.expect("insert");

    let filters = ActivityLogFilters {
        action: Some(ActivityAction::CreatedUser),
        ..Default::default()
    };
    let items: Vec<ActivityLogItem> = list_activity_logs(&pool, &filters, 500)
        .await
        .expect("list")
        .into_iter()
        .map(ActivityLogItem::from)
        .collect();

    let legacy_item = items
        .iter()
        .find(|item| item.id == legacy)
        .expect("legacy row matched");
    assert_eq!(legacy_item.action, "created_user");
    assert!(items.iter().any(|item| item.id == current.id));
    assert!(items.iter().all(|item| item.action == "created_user"));
}

#[tokio::test]
async fn time_window_and_limit_bound_the_page() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let admin = seed_user(&pool, ActorRole::Admin).await;

    let old = new_log(&admin.id, ActorRole::Admin, ActivityAction::CreatedFaq);
    insert_activity_log(&pool, &old).await.expect("insert");
    sqlx::query("UPDATE activity_logs SET created_at = NOW() - INTERVAL '3 days' WHERE id = $1")
        .bind(&old.id)
        .execute(&pool)
        .await
        .expect("backdate");
    let fresh = new_log(&admin.id, ActorRole::Admin, ActivityAction::UpdatedFaq);
    insert_activity_log(&pool, &fresh).await.expect("insert");

    let filters = ActivityLogFilters {
        actor_role: Some(ActorRole::Admin),
        from: Some(Utc::now() - Duration::days(1)),
        ..Default::default()
    };
    let ids: Vec<String> = list_activity_logs(&pool, &filters, 500)
        .await
        .expect("list")
        .into_iter()
        .map(|row| row.id)
        .collect();
    assert!(ids.contains(&fresh.id));
    assert!(!ids.contains(&old.id));

    let one = list_activity_logs(&pool, &ActivityLogFilters::default(), 0)
        .await
        .expect("list");
    assert_eq!(one.len(), 1);
}

#[tokio::test]
async fn affiliate_feed_joins_profiles_and_counts_by_action() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let (user, profile) = seed_affiliate(&pool, "Glacier Foods", AffiliateStatus::Active).await;
    let since = Utc::now() - Duration::seconds(5);
    let before = fetch_affiliate_activity_stats(&pool, Some(since))
        .await
        .expect("stats");

    for action in [
        ActivityAction::AffiliateLogin,
        ActivityAction::UpdatedAffiliateProfile,
        ActivityAction::EditedAffiliatePage,
    ] {
        insert_activity_log(&pool, &new_log(&user.id, ActorRole::Affiliate, action))
            .await
            .expect("insert");
    }
    insert_raw_action(&pool, &user.id, "AFFILIATE", "AFFILIATE_LOGIN").await;

    let rows = list_affiliate_activity(&pool, Some(since), 500)
        .await
        .expect("feed");
    let own: Vec<_> = rows
        .iter()
        .filter(|row| row.log.actor_id == user.id)
        .collect();
    assert_eq!(own.len(), 4);
    assert!(own
        .iter()
        .all(|row| row.affiliate_company_name.as_deref() == Some("Glacier Foods")));
    assert!(own
        .iter()
        .all(|row| row.affiliate_id.as_deref() == Some(profile.id.as_str())));

    let after = fetch_affiliate_activity_stats(&pool, Some(since))
        .await
        .expect("stats");
    assert_eq!(after.total_actions - before.total_actions, 4);
    assert_eq!(after.logins - before.logins, 2);
    assert_eq!(after.profile_updates - before.profile_updates, 1);
    assert_eq!(after.page_edits - before.page_edits, 1);
}

#[tokio::test]
async fn retention_deletes_only_rows_before_cutoff() {
    let _guard = integration_guard().await;
    let pool = test_pool().await;
    let admin = seed_user(&pool, ActorRole::Admin).await;

    let stale = new_log(&admin.id, ActorRole::Admin, ActivityAction::DeletedFaq);
    insert_activity_log(&pool, &stale).await.expect("insert");
    sqlx::query("UPDATE activity_logs SET created_at = NOW() - INTERVAL '400 days' WHERE id = $1")
        .bind(&stale.id)
        .execute(&pool)
        .await
        .expect("backdate");
    let kept = new_log(&admin.id, ActorRole::Admin, ActivityAction::DeletedFaq);
    insert_activity_log(&pool, &kept).await.expect("insert");

    let deleted = delete_activity_logs_before(&pool, Utc::now() - Duration::days(365))
        .await
        .expect("delete");
    assert!(deleted >= 1);
    assert!(fetch_activity_log(&pool, &stale.id)
        .await
        .expect("fetch")
        .is_none());
    assert!(fetch_activity_log(&pool, &kept.id)
        .await
        .expect("fetch")
        .is_some());
}
