//! Marketing content managed from the back-office: blog posts, categories,
//! FAQs and the single global settings row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub category_id: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogPostPayload {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub slug: String,
    pub body: String,
    pub category_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogPostPayload {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<String>,
}

impl UpdateBlogPostPayload {
    /// Names of the fields present in the payload, for the activity log.
    pub fn changed_fields(&self) -> Vec<String> {
        [
            ("title", self.title.is_some()),
            ("slug", self.slug.is_some()),
            ("body", self.body.is_some()),
            ("categoryId", self.category_id.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct FaqPayload {
    #[validate(length(min = 1, max = 500))]
    pub question: String,
    #[validate(length(min = 1, max = 5000))]
    pub answer: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    pub site_title: String,
    pub support_email: String,
    pub maintenance_mode: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGlobalSettingsPayload {
    #[validate(length(min = 1, max = 200))]
    pub site_title: Option<String>,
    #[validate(email)]
    pub support_email: Option<String>,
    pub maintenance_mode: Option<bool>,
}

impl UpdateGlobalSettingsPayload {
    pub fn changed_fields(&self) -> Vec<String> {
        [
            ("siteTitle", self.site_title.is_some()),
            ("supportEmail", self.support_email.is_some()),
            ("maintenanceMode", self.maintenance_mode.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blog_post_changed_fields_lists_only_present_values() {
        let payload = UpdateBlogPostPayload {
            title: Some("New".into()),
            body: Some("text".into()),
            ..Default::default()
        };
        assert_eq!(payload.changed_fields(), vec!["title", "body"]);
    }

    #[test]
    fn settings_changed_fields_empty_for_empty_payload() {
        assert!(UpdateGlobalSettingsPayload::default()
            .changed_fields()
            .is_empty());
    }
}
