//! Affiliate profiles, notes and payouts.

use sqlx::PgPool;

use crate::models::affiliate::{
    AffiliateNote, AffiliateProfile, AffiliateStatus, CreateAffiliatePayload, NotePriority, Payout,
    PayoutStatus, UpdateAffiliateProfilePayload,
};

const PROFILE_COLUMNS: &str = "id, user_id, company_name, slug, page_content, status, \
     payment_account_id, created_at, updated_at";

const PAYOUT_COLUMNS: &str =
    "id, affiliate_id, amount_cents, currency, status, failure_reason, created_at, processed_at";

pub async fn list_affiliates(pool: &PgPool) -> Result<Vec<AffiliateProfile>, sqlx::Error> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM affiliate_profiles ORDER BY company_name");
    sqlx::query_as::<_, AffiliateProfile>(&sql)
        .fetch_all(pool)
        .await
}

pub async fn fetch_affiliate(
    pool: &PgPool,
    id: &str,
) -> Result<Option<AffiliateProfile>, sqlx::Error> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM affiliate_profiles WHERE id = $1");
    sqlx::query_as::<_, AffiliateProfile>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_affiliate_by_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<AffiliateProfile>, sqlx::Error> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM affiliate_profiles WHERE user_id = $1");
    sqlx::query_as::<_, AffiliateProfile>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_affiliate(
    pool: &PgPool,
    id: &str,
    payload: &CreateAffiliatePayload,
) -> Result<AffiliateProfile, sqlx::Error> {
    let sql = format!(
        "INSERT INTO affiliate_profiles (id, user_id, company_name, slug) \
         VALUES ($1, $2, $3, $4) RETURNING {PROFILE_COLUMNS}"
    );
    sqlx::query_as::<_, AffiliateProfile>(&sql)
        .bind(id)
        .bind(&payload.user_id)
        .bind(&payload.company_name)
        .bind(&payload.slug)
        .fetch_one(pool)
        .await
}

pub async fn update_affiliate_profile(
    pool: &PgPool,
    id: &str,
    payload: &UpdateAffiliateProfilePayload,
) -> Result<Option<AffiliateProfile>, sqlx::Error> {
    let sql = format!(
        "UPDATE affiliate_profiles SET \
         company_name = COALESCE($2, company_name), \
         slug = COALESCE($3, slug), \
         updated_at = NOW() \
         WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
    );
    sqlx::query_as::<_, AffiliateProfile>(&sql)
        .bind(id)
        .bind(&payload.company_name)
        .bind(&payload.slug)
        .fetch_optional(pool)
        .await
}

pub async fn update_affiliate_page(
    pool: &PgPool,
    id: &str,
    page_content: &str,
) -> Result<Option<AffiliateProfile>, sqlx::Error> {
    let sql = format!(
        "UPDATE affiliate_profiles SET page_content = $2, updated_at = NOW() \
         WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
    );
    sqlx::query_as::<_, AffiliateProfile>(&sql)
        .bind(id)
        .bind(page_content)
        .fetch_optional(pool)
        .await
}

pub async fn set_affiliate_status(
    pool: &PgPool,
    id: &str,
    status: AffiliateStatus,
) -> Result<Option<AffiliateProfile>, sqlx::Error> {
    let sql = format!(
        "UPDATE affiliate_profiles SET status = $2, updated_at = NOW() \
         WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
    );
    sqlx::query_as::<_, AffiliateProfile>(&sql)
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await
}

pub async fn set_payment_account(
    pool: &PgPool,
    id: &str,
    account_id: &str,
) -> Result<Option<AffiliateProfile>, sqlx::Error> {
    let sql = format!(
        "UPDATE affiliate_profiles SET payment_account_id = $2, updated_at = NOW() \
         WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
    );
    sqlx::query_as::<_, AffiliateProfile>(&sql)
        .bind(id)
        .bind(account_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_notes(
    pool: &PgPool,
    affiliate_id: &str,
) -> Result<Vec<AffiliateNote>, sqlx::Error> {
    sqlx::query_as::<_, AffiliateNote>(
        "SELECT id, affiliate_id, author_id, body, priority, created_at \
         FROM affiliate_notes WHERE affiliate_id = $1 ORDER BY created_at DESC",
    )
    .bind(affiliate_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_note(
    pool: &PgPool,
    id: &str,
    affiliate_id: &str,
    author_id: &str,
    body: &str,
    priority: NotePriority,
) -> Result<AffiliateNote, sqlx::Error> {
    sqlx::query_as::<_, AffiliateNote>(
        "INSERT INTO affiliate_notes (id, affiliate_id, author_id, body, priority) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, affiliate_id, author_id, body, priority, created_at",
    )
    .bind(id)
    .bind(affiliate_id)
    .bind(author_id)
    .bind(body)
    .bind(priority.as_str())
    .fetch_one(pool)
    .await
}

pub async fn list_payouts(
    pool: &PgPool,
    status: Option<PayoutStatus>,
) -> Result<Vec<Payout>, sqlx::Error> {
    let sql = format!(
        "SELECT {PAYOUT_COLUMNS} FROM payouts \
         WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC"
    );
    sqlx::query_as::<_, Payout>(&sql)
        .bind(status.map(|status| status.as_str()))
        .fetch_all(pool)
        .await
}

pub async fn fetch_payout(pool: &PgPool, id: &str) -> Result<Option<Payout>, sqlx::Error> {
    let sql = format!("SELECT {PAYOUT_COLUMNS} FROM payouts WHERE id = $1");
    sqlx::query_as::<_, Payout>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_payout(
    pool: &PgPool,
    id: &str,
    affiliate_id: &str,
    amount_cents: i64,
    currency: &str,
) -> Result<Payout, sqlx::Error> {
    let sql = format!(
        "INSERT INTO payouts (id, affiliate_id, amount_cents, currency) \
         VALUES ($1, $2, $3, $4) RETURNING {PAYOUT_COLUMNS}"
    );
    sqlx::query_as::<_, Payout>(&sql)
        .bind(id)
        .bind(affiliate_id)
        .bind(amount_cents)
        .bind(currency.to_ascii_uppercase())
        .fetch_one(pool)
        .await
}

/// Moves a pending payout to a terminal status. `None` when the payout is
/// missing or already settled.
pub async fn settle_payout(
    pool: &PgPool,
    id: &str,
    status: PayoutStatus,
    failure_reason: Option<&str>,
) -> Result<Option<Payout>, sqlx::Error> {
    let sql = format!(
        "UPDATE payouts SET status = $2, failure_reason = $3, processed_at = NOW() \
         WHERE id = $1 AND status = 'PENDING' RETURNING {PAYOUT_COLUMNS}"
    );
    sqlx::query_as::<_, Payout>(&sql)
        .bind(id)
        .bind(status.as_str())
        .bind(failure_reason)
        .fetch_optional(pool)
        .await
}
