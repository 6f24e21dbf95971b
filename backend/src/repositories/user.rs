//! Repository functions for accounts.

use sqlx::PgPool;

use crate::models::{activity_log::ActorRole, user::User};

const USER_COLUMNS: &str = "id, email, name, image, password_hash, role, created_at, updated_at";

pub async fn fetch_user_by_id(pool: &PgPool, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Emails compare case-insensitively.
pub async fn fetch_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
    sqlx::query_as::<_, User>(&sql)
        .bind(email.trim())
        .fetch_optional(pool)
        .await
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
    sqlx::query_as::<_, User>(&sql).fetch_all(pool).await
}

pub struct NewUser<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub password_hash: &'a str,
    pub role: ActorRole,
}

pub async fn insert_user(pool: &PgPool, user: &NewUser<'_>) -> Result<User, sqlx::Error> {
    let sql = format!(
        "INSERT INTO users (id, email, name, image, password_hash, role) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(user.id)
        .bind(user.email.trim())
        .bind(user.name)
        .bind(user.image)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(pool)
        .await
}

pub async fn update_user_role(
    pool: &PgPool,
    user_id: &str,
    role: ActorRole,
) -> Result<Option<User>, sqlx::Error> {
    let sql = format!(
        "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(user_id)
        .bind(role.as_str())
        .fetch_optional(pool)
        .await
}

/// Activity rows keep the deleted id; the dashboard falls back to the raw id.
pub async fn delete_user(pool: &PgPool, user_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
