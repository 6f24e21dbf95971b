//! Affiliate profiles, internal notes and payouts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value `{0}`")]
pub struct UnknownVariant(pub String);

macro_rules! text_enum {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    other => Err(UnknownVariant(other.to_string())),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

text_enum!(AffiliateStatus {
    Pending => "PENDING",
    Active => "ACTIVE",
    Suspended => "SUSPENDED",
});

// One priority scale for every kind of note.
text_enum!(NotePriority {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
    Urgent => "URGENT",
});

text_enum!(PayoutStatus {
    Pending => "PENDING",
    Processed => "PROCESSED",
    Failed => "FAILED",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateProfile {
    pub id: String,
    pub user_id: String,
    pub company_name: String,
    pub slug: String,
    pub page_content: String,
    #[sqlx(try_from = "String")]
    pub status: AffiliateStatus,
    pub payment_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAffiliatePayload {
    pub user_id: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAffiliateProfilePayload {
    #[validate(length(min = 1, max = 200))]
    pub company_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub slug: Option<String>,
}

impl UpdateAffiliateProfilePayload {
    pub fn changed_fields(&self) -> Vec<String> {
        [
            ("companyName", self.company_name.is_some()),
            ("slug", self.slug.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditAffiliatePagePayload {
    #[validate(length(max = 20000))]
    pub page_content: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SuspendAffiliatePayload {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateNote {
    pub id: String,
    pub affiliate_id: String,
    pub author_id: String,
    pub body: String,
    #[sqlx(try_from = "String")]
    pub priority: NotePriority,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAffiliateNotePayload {
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
    pub priority: NotePriority,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: String,
    pub affiliate_id: String,
    pub amount_cents: i64,
    pub currency: String,
    #[sqlx(try_from = "String")]
    pub status: PayoutStatus,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayoutPayload {
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    #[validate(length(equal = 3))]
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct FailPayoutPayload {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_priority_uses_urgent_as_top_level() {
        assert_eq!("urgent".parse::<NotePriority>(), Ok(NotePriority::Urgent));
        assert!("CRITICAL".parse::<NotePriority>().is_err());
    }

    #[test]
    fn payout_status_round_trips_through_text() {
        for status in [
            PayoutStatus::Pending,
            PayoutStatus::Processed,
            PayoutStatus::Failed,
        ] {
            assert_eq!(PayoutStatus::try_from(status.to_string()), Ok(status));
        }
    }
}
