//! Blog posts, categories, FAQs and global settings.

use sqlx::PgPool;

use crate::models::content::{
    BlogPost, Category, CategoryPayload, CreateBlogPostPayload, Faq, FaqPayload, GlobalSettings,
    UpdateBlogPostPayload, UpdateGlobalSettingsPayload,
};

const BLOG_POST_COLUMNS: &str =
    "id, title, slug, body, category_id, published, published_at, author_id, created_at, updated_at";

pub async fn list_blog_posts(pool: &PgPool) -> Result<Vec<BlogPost>, sqlx::Error> {
    let sql = format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts ORDER BY created_at DESC");
    sqlx::query_as::<_, BlogPost>(&sql).fetch_all(pool).await
}

pub async fn fetch_blog_post(pool: &PgPool, id: &str) -> Result<Option<BlogPost>, sqlx::Error> {
    let sql = format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE id = $1");
    sqlx::query_as::<_, BlogPost>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_blog_post(
    pool: &PgPool,
    id: &str,
    author_id: &str,
    payload: &CreateBlogPostPayload,
) -> Result<BlogPost, sqlx::Error> {
    let sql = format!(
        "INSERT INTO blog_posts (id, title, slug, body, category_id, author_id) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {BLOG_POST_COLUMNS}"
    );
    sqlx::query_as::<_, BlogPost>(&sql)
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.body)
        .bind(&payload.category_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
}

pub async fn update_blog_post(
    pool: &PgPool,
    id: &str,
    payload: &UpdateBlogPostPayload,
) -> Result<Option<BlogPost>, sqlx::Error> {
    let sql = format!(
        "UPDATE blog_posts SET \
         title = COALESCE($2, title), \
         slug = COALESCE($3, slug), \
         body = COALESCE($4, body), \
         category_id = COALESCE($5, category_id), \
         updated_at = NOW() \
         WHERE id = $1 RETURNING {BLOG_POST_COLUMNS}"
    );
    sqlx::query_as::<_, BlogPost>(&sql)
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.body)
        .bind(&payload.category_id)
        .fetch_optional(pool)
        .await
}

/// Publishing stamps `published_at` once; unpublishing keeps it.
pub async fn set_blog_post_published(
    pool: &PgPool,
    id: &str,
    published: bool,
) -> Result<Option<BlogPost>, sqlx::Error> {
    let sql = format!(
        "UPDATE blog_posts SET \
         published = $2, \
         published_at = CASE WHEN $2 THEN COALESCE(published_at, NOW()) ELSE published_at END, \
         updated_at = NOW() \
         WHERE id = $1 RETURNING {BLOG_POST_COLUMNS}"
    );
    sqlx::query_as::<_, BlogPost>(&sql)
        .bind(id)
        .bind(published)
        .fetch_optional(pool)
        .await
}

pub async fn delete_blog_post(pool: &PgPool, id: &str) -> Result<Option<BlogPost>, sqlx::Error> {
    let sql = format!("DELETE FROM blog_posts WHERE id = $1 RETURNING {BLOG_POST_COLUMNS}");
    sqlx::query_as::<_, BlogPost>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, slug, created_at FROM blog_categories ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_category(
    pool: &PgPool,
    id: &str,
    payload: &CategoryPayload,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "INSERT INTO blog_categories (id, name, slug) VALUES ($1, $2, $3) \
         RETURNING id, name, slug, created_at",
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.slug)
    .fetch_one(pool)
    .await
}

pub async fn update_category(
    pool: &PgPool,
    id: &str,
    payload: &CategoryPayload,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "UPDATE blog_categories SET name = $2, slug = $3 WHERE id = $1 \
         RETURNING id, name, slug, created_at",
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.slug)
    .fetch_optional(pool)
    .await
}

pub async fn delete_category(pool: &PgPool, id: &str) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "DELETE FROM blog_categories WHERE id = $1 RETURNING id, name, slug, created_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

const FAQ_COLUMNS: &str = "id, question, answer, position, created_at, updated_at";

pub async fn list_faqs(pool: &PgPool) -> Result<Vec<Faq>, sqlx::Error> {
    let sql = format!("SELECT {FAQ_COLUMNS} FROM faqs ORDER BY position, created_at");
    sqlx::query_as::<_, Faq>(&sql).fetch_all(pool).await
}

pub async fn insert_faq(pool: &PgPool, id: &str, payload: &FaqPayload) -> Result<Faq, sqlx::Error> {
    let sql = format!(
        "INSERT INTO faqs (id, question, answer, position) VALUES ($1, $2, $3, $4) \
         RETURNING {FAQ_COLUMNS}"
    );
    sqlx::query_as::<_, Faq>(&sql)
        .bind(id)
        .bind(&payload.question)
        .bind(&payload.answer)
        .bind(payload.position)
        .fetch_one(pool)
        .await
}

pub async fn update_faq(
    pool: &PgPool,
    id: &str,
    payload: &FaqPayload,
) -> Result<Option<Faq>, sqlx::Error> {
    let sql = format!(
        "UPDATE faqs SET question = $2, answer = $3, position = $4, updated_at = NOW() \
         WHERE id = $1 RETURNING {FAQ_COLUMNS}"
    );
    sqlx::query_as::<_, Faq>(&sql)
        .bind(id)
        .bind(&payload.question)
        .bind(&payload.answer)
        .bind(payload.position)
        .fetch_optional(pool)
        .await
}

pub async fn delete_faq(pool: &PgPool, id: &str) -> Result<Option<Faq>, sqlx::Error> {
    let sql = format!("DELETE FROM faqs WHERE id = $1 RETURNING {FAQ_COLUMNS}");
    sqlx::query_as::<_, Faq>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_global_settings(pool: &PgPool) -> Result<GlobalSettings, sqlx::Error> {
    sqlx::query_as::<_, GlobalSettings>(
        "SELECT site_title, support_email, maintenance_mode, updated_at \
         FROM global_settings WHERE id = 1",
    )
    .fetch_one(pool)
    .await
}

pub async fn update_global_settings(
    pool: &PgPool,
    payload: &UpdateGlobalSettingsPayload,
) -> Result<GlobalSettings, sqlx::Error> {
    sqlx::query_as::<_, GlobalSettings>(
        "UPDATE global_settings SET \
         site_title = COALESCE($1, site_title), \
         support_email = COALESCE($2, support_email), \
         maintenance_mode = COALESCE($3, maintenance_mode), \
         updated_at = NOW() \
         WHERE id = 1 \
         RETURNING site_title, support_email, maintenance_mode, updated_at",
    )
    .bind(&payload.site_title)
    .bind(&payload.support_email)
    .bind(payload.maintenance_mode)
    .fetch_one(pool)
    .await
}
