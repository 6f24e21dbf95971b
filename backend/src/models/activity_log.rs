//! Activity audit log: the closed action vocabulary, typed payloads and the
//! rows read back by the dashboards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::affiliate::NotePriority;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown actor role `{0}`")]
pub struct UnknownRole(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown activity action `{0}`")]
pub struct UnknownAction(pub String);

/// Role held by an actor at the moment an event was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActorRole {
    Admin,
    Affiliate,
    User,
}

impl ActorRole {
    pub const ALL: [ActorRole; 3] = [ActorRole::Admin, ActorRole::Affiliate, ActorRole::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Admin => "ADMIN",
            ActorRole::Affiliate => "AFFILIATE",
            ActorRole::User => "USER",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ActorRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRole(trimmed.to_string()))
    }
}

impl TryFrom<String> for ActorRole {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Domain area an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionFamily {
    BlogPost,
    Category,
    Faq,
    GlobalSettings,
    Auth,
    UserManagement,
    Affiliate,
    Payout,
    PaymentProvider,
}

macro_rules! activity_actions {
    ($($variant:ident => $value:literal, $family:ident;)+) => {
        /// Every loggable action. Stored as lower snake case text.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum ActivityAction {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl ActivityAction {
            pub const ALL: &'static [ActivityAction] = &[$(ActivityAction::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ActivityAction::$variant => $value,)+
                }
            }

            pub fn family(&self) -> ActionFamily {
                match self {
                    $(ActivityAction::$variant => ActionFamily::$family,)+
                }
            }
        }
    };
}

activity_actions! {
    CreatedBlogPost => "created_blog_post", BlogPost;
    UpdatedBlogPost => "updated_blog_post", BlogPost;
    DeletedBlogPost => "deleted_blog_post", BlogPost;
    PublishedBlogPost => "published_blog_post", BlogPost;
    UnpublishedBlogPost => "unpublished_blog_post", BlogPost;
    CreatedCategory => "created_category", Category;
    UpdatedCategory => "updated_category", Category;
    DeletedCategory => "deleted_category", Category;
    CreatedFaq => "created_faq", Faq;
    UpdatedFaq => "updated_faq", Faq;
    DeletedFaq => "deleted_faq", Faq;
    UpdatedGlobalSettings => "updated_global_settings", GlobalSettings;
    AdminLogin => "admin_login", Auth;
    AffiliateLogin => "affiliate_login", Auth;
    UserLogin => "user_login", Auth;
    FailedLogin => "failed_login", Auth;
    Logout => "logout", Auth;
    CreatedUser => "created_user", UserManagement;
    ChangedUserRole => "changed_user_role", UserManagement;
    DeletedUser => "deleted_user", UserManagement;
    CreatedAffiliate => "created_affiliate", Affiliate;
    UpdatedAffiliateProfile => "updated_affiliate_profile", Affiliate;
    EditedAffiliatePage => "edited_affiliate_page", Affiliate;
    ApprovedAffiliate => "approved_affiliate", Affiliate;
    SuspendedAffiliate => "suspended_affiliate", Affiliate;
    AddedAffiliateNote => "added_affiliate_note", Affiliate;
    RequestedPayout => "requested_payout", Payout;
    ProcessedPayout => "processed_payout", Payout;
    FailedPayout => "failed_payout", Payout;
    CreatedPaymentAccount => "created_payment_account", PaymentProvider;
    CompletedPaymentOnboarding => "completed_payment_onboarding", PaymentProvider;
    FailedPaymentOnboarding => "failed_payment_onboarding", PaymentProvider;
}

/// Upper snake names written by earlier releases, mapped to the current vocabulary.
const LEGACY_ACTION_NAMES: &[(&str, ActivityAction)] = &[
    ("USER_CREATED", ActivityAction::CreatedUser),
    ("USER_ROLE_CHANGED", ActivityAction::ChangedUserRole),
    ("USER_DELETED", ActivityAction::DeletedUser),
    ("ADMIN_LOGIN", ActivityAction::AdminLogin),
    ("AFFILIATE_LOGIN", ActivityAction::AffiliateLogin),
    ("PAYOUT_REQUESTED", ActivityAction::RequestedPayout),
    ("PAYOUT_PROCESSED", ActivityAction::ProcessedPayout),
    ("PAYOUT_FAILED", ActivityAction::FailedPayout),
    ("PAYMENT_ACCOUNT_CREATED", ActivityAction::CreatedPaymentAccount),
    (
        "PAYMENT_ONBOARDING_COMPLETED",
        ActivityAction::CompletedPaymentOnboarding,
    ),
];

impl ActivityAction {
    pub fn is_payment_related(&self) -> bool {
        match self.family() {
            ActionFamily::Payout | ActionFamily::PaymentProvider => true,
            ActionFamily::BlogPost
            | ActionFamily::Category
            | ActionFamily::Faq
            | ActionFamily::GlobalSettings
            | ActionFamily::Auth
            | ActionFamily::UserManagement
            | ActionFamily::Affiliate => false,
        }
    }

    /// Parses a value read from storage, accepting legacy upper snake names.
    pub fn from_stored(value: &str) -> Result<Self, UnknownAction> {
        value.parse::<ActivityAction>().or_else(|err| {
            LEGACY_ACTION_NAMES
                .iter()
                .find(|(legacy, _)| *legacy == value.trim())
                .map(|(_, action)| *action)
                .ok_or(err)
        })
    }

    /// Canonical name plus any legacy names, for matching historical rows.
    pub fn stored_names(&self) -> Vec<String> {
        std::iter::once(self.as_str())
            .chain(
                LEGACY_ACTION_NAMES
                    .iter()
                    .filter(|(_, action)| action == self)
                    .map(|(legacy, _)| *legacy),
            )
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ActivityAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == trimmed)
            .ok_or_else(|| UnknownAction(trimmed.to_string()))
    }
}

/// Object an action was performed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ActivityTarget {
    BlogPost {
        post_id: String,
        title: String,
    },
    Category {
        category_id: String,
        name: String,
    },
    Faq {
        faq_id: String,
        question: String,
    },
    GlobalSettings,
    User {
        user_id: String,
        email: String,
    },
    Affiliate {
        affiliate_id: String,
        company_name: Option<String>,
    },
    Payout {
        payout_id: String,
        affiliate_id: String,
    },
    Other(Value),
}

/// Auxiliary context attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ActivityMetadata {
    ChangedFields { fields: Vec<String> },
    RoleChange { from: ActorRole, to: ActorRole },
    Amount { amount_cents: i64, currency: String },
    Failure { reason: String },
    Reason { reason: String },
    Note { priority: NotePriority },
    PaymentAccount { account_id: String },
    Other(Value),
}

/// Row as it is inserted; `created_at` is assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivityLog {
    pub id: String,
    pub actor_id: String,
    pub actor_role: ActorRole,
    pub action: ActivityAction,
    pub target: Option<Value>,
    pub metadata: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
}

/// Activity row joined with the actor's current display fields.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityLogRow {
    pub id: String,
    pub actor_id: String,
    #[sqlx(try_from = "String")]
    pub actor_role: ActorRole,
    pub action: String,
    pub target: Option<Json<Value>>,
    pub metadata: Option<Json<Value>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub actor_name: Option<String>,
    pub actor_email: Option<String>,
    pub actor_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogItem {
    pub id: String,
    pub actor_id: String,
    pub actor_role: ActorRole,
    pub action: String,
    pub target: Option<Value>,
    pub metadata: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub actor_name: Option<String>,
    pub actor_email: Option<String>,
    pub actor_image: Option<String>,
}

/// Legacy action names are rewritten to the current vocabulary on the way out.
pub fn canonical_action_name(stored: String) -> String {
    match ActivityAction::from_stored(&stored) {
        Ok(action) => action.as_str().to_string(),
        Err(_) => stored,
    }
}

impl From<ActivityLogRow> for ActivityLogItem {
    fn from(row: ActivityLogRow) -> Self {
        Self {
            id: row.id,
            actor_id: row.actor_id,
            actor_role: row.actor_role,
            action: canonical_action_name(row.action),
            target: row.target.map(|value| value.0),
            metadata: row.metadata.map(|value| value.0),
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            request_id: row.request_id,
            created_at: row.created_at,
            actor_name: row.actor_name,
            actor_email: row.actor_email,
            actor_image: row.actor_image,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleCount {
    #[sqlx(try_from = "String")]
    pub role: ActorRole,
    pub count: i64,
}

/// Aggregates over the whole table, independent of any list filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub count_since_local_midnight: i64,
    pub total_count: i64,
    pub count_distinct_actors: i64,
    pub counts_by_role: Vec<RoleCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateRef {
    pub id: String,
    pub company_name: String,
    pub slug: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct AffiliateActivityRow {
    #[sqlx(flatten)]
    pub log: ActivityLogRow,
    pub affiliate_id: Option<String>,
    pub affiliate_company_name: Option<String>,
    pub affiliate_slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateActivityItem {
    #[serde(flatten)]
    pub log: ActivityLogItem,
    pub affiliate: Option<AffiliateRef>,
}

impl From<AffiliateActivityRow> for AffiliateActivityItem {
    fn from(row: AffiliateActivityRow) -> Self {
        let affiliate = match (
            row.affiliate_id,
            row.affiliate_company_name,
            row.affiliate_slug,
        ) {
            (Some(id), Some(company_name), Some(slug)) => Some(AffiliateRef {
                id,
                company_name,
                slug,
            }),
            _ => None,
        };
        Self {
            log: ActivityLogItem::from(row.log),
            affiliate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateActivityStats {
    pub total_actions: i64,
    pub active_affiliates: i64,
    pub profile_updates: i64,
    pub page_edits: i64,
    pub logins: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_action_round_trips_through_its_stored_name() {
        for action in ActivityAction::ALL {
            assert_eq!(ActivityAction::from_str(action.as_str()), Ok(*action));
            let json = serde_json::to_value(action).expect("serialize");
            assert_eq!(json, Value::String(action.as_str().to_string()));
        }
    }

    #[test]
    fn action_names_share_one_casing_convention() {
        for action in ActivityAction::ALL {
            let name = action.as_str();
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{name} is not lower snake case"
            );
        }
    }

    #[test]
    fn legacy_names_map_onto_current_vocabulary() {
        assert_eq!(
            ActivityAction::from_stored("USER_ROLE_CHANGED"),
            Ok(ActivityAction::ChangedUserRole)
        );
        assert_eq!(
            ActivityAction::from_stored("created_blog_post"),
            Ok(ActivityAction::CreatedBlogPost)
        );
        assert!(ActivityAction::from_stored("something_else").is_err());
        assert_eq!(
            ActivityAction::ChangedUserRole.stored_names(),
            vec!["changed_user_role".to_string(), "USER_ROLE_CHANGED".to_string()]
        );
        assert_eq!(
            canonical_action_name("PAYOUT_PROCESSED".into()),
            "processed_payout"
        );
    }

    #[test]
    fn payment_related_covers_payout_and_provider_families() {
        assert!(ActivityAction::ProcessedPayout.is_payment_related());
        assert!(ActivityAction::CreatedPaymentAccount.is_payment_related());
        assert!(!ActivityAction::UpdatedBlogPost.is_payment_related());
        assert!(!ActivityAction::AffiliateLogin.is_payment_related());
        assert_eq!(ActivityAction::AddedAffiliateNote.family(), ActionFamily::Affiliate);
    }

    #[test]
    fn actor_role_parses_case_insensitively() {
        assert_eq!("admin".parse::<ActorRole>(), Ok(ActorRole::Admin));
        assert_eq!("AFFILIATE".parse::<ActorRole>(), Ok(ActorRole::Affiliate));
        assert!("owner".parse::<ActorRole>().is_err());
        assert_eq!(
            serde_json::to_value(ActorRole::User).unwrap(),
            json!("USER")
        );
    }

    #[test]
    fn target_serializes_with_family_tag() {
        let target = ActivityTarget::BlogPost {
            post_id: "p-1".into(),
            title: "Hello".into(),
        };
        assert_eq!(
            serde_json::to_value(&target).unwrap(),
            json!({ "type": "blog_post", "data": { "post_id": "p-1", "title": "Hello" } })
        );

        let adhoc = ActivityTarget::Other(json!("affiliate:123"));
        assert_eq!(
            serde_json::to_value(&adhoc).unwrap(),
            json!({ "type": "other", "data": "affiliate:123" })
        );
    }

    #[test]
    fn affiliate_item_requires_complete_profile_join() {
        let row = AffiliateActivityRow {
            log: ActivityLogRow {
                id: "a".into(),
                actor_id: "u".into(),
                actor_role: ActorRole::Affiliate,
                action: "AFFILIATE_LOGIN".into(),
                target: None,
                metadata: None,
                ip_address: None,
                user_agent: None,
                request_id: None,
                created_at: Utc::now(),
                actor_name: Some("Ada".into()),
                actor_email: None,
                actor_image: None,
            },
            affiliate_id: Some("aff-1".into()),
            affiliate_company_name: None,
            affiliate_slug: Some("ada".into()),
        };
        let item = AffiliateActivityItem::from(row);
        assert!(item.affiliate.is_none());
        assert_eq!(item.log.action, "affiliate_login");
    }
}
