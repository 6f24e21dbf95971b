//! Views derived from one fetched page of the global activity log.
//!
//! Everything here works on rows already in memory; none of it queries the
//! database again.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::{
    models::activity_log::{
        ActionFamily, ActivityAction, ActivityLogItem, ActivityStats, ActorRole, RoleCount,
    },
    utils::time::local_date,
};

/// Share of `count` in `total` as a percentage with one decimal place.
/// Zero when `total` is zero.
pub fn percentage(count: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    ((count as f64 / total as f64) * 1000.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleShare {
    pub role: ActorRole,
    pub count: i64,
    pub percentage: f64,
}

/// One entry per role, including roles with no rows.
pub fn role_breakdown(counts: &[RoleCount], total: i64) -> Vec<RoleShare> {
    ActorRole::ALL
        .into_iter()
        .map(|role| {
            let count = counts
                .iter()
                .filter(|entry| entry.role == role)
                .map(|entry| entry.count)
                .sum();
            RoleShare {
                role,
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDashboardStats {
    #[serde(flatten)]
    pub stats: ActivityStats,
    pub role_breakdown: Vec<RoleShare>,
}

impl From<ActivityStats> for ActivityDashboardStats {
    fn from(stats: ActivityStats) -> Self {
        let role_breakdown = role_breakdown(&stats.counts_by_role, stats.total_count);
        Self {
            stats,
            role_breakdown,
        }
    }
}

/// Table filters over a fetched page. Every active predicate must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityTableFilter {
    pub search: Option<String>,
    pub role: Option<ActorRole>,
    pub action: Option<ActivityAction>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ActivityTableFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, item: &ActivityLogItem, tz: &Tz) -> bool {
        if let Some(needle) = normalized_search(self.search.as_deref()) {
            let hit = [
                item.actor_name.as_deref(),
                item.actor_email.as_deref(),
                Some(item.action.as_str()),
            ]
            .into_iter()
            .flatten()
            .any(|haystack| haystack.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.role.is_some_and(|role| item.actor_role != role) {
            return false;
        }
        if self.action.is_some_and(|action| item.action != action.as_str()) {
            return false;
        }

        let day = local_date(item.created_at, tz);
        if self.start_date.is_some_and(|start| day < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| day > end) {
            return false;
        }
        true
    }

    /// Matching rows in their original order.
    pub fn apply<'a>(&self, items: &'a [ActivityLogItem], tz: &Tz) -> Vec<&'a ActivityLogItem> {
        items.iter().filter(|item| self.matches(item, tz)).collect()
    }
}

pub(crate) fn normalized_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

/// Expanded view of a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRowDetail {
    pub id: String,
    pub action: String,
    pub family: Option<ActionFamily>,
    pub payment_related: bool,
    pub target: Option<Value>,
    pub metadata: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
}

impl From<&ActivityLogItem> for ActivityRowDetail {
    fn from(item: &ActivityLogItem) -> Self {
        let action = ActivityAction::from_stored(&item.action).ok();
        Self {
            id: item.id.clone(),
            action: item.action.clone(),
            family: action.map(|action| action.family()),
            payment_related: action.is_some_and(|action| action.is_payment_related()),
            target: item.target.clone(),
            metadata: item.metadata.clone(),
            ip_address: item.ip_address.clone(),
            user_agent: item.user_agent.clone(),
            request_id: item.request_id.clone(),
        }
    }
}

/// Ids of rows currently showing their detail.
#[derive(Debug, Clone, Default)]
pub struct ExpandedRows {
    ids: HashSet<String>,
}

impl ExpandedRows {
    /// Flips the row and returns whether it is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Detail for every expanded row on the page, in page order.
    pub fn details(&self, items: &[ActivityLogItem]) -> Vec<ActivityRowDetail> {
        items
            .iter()
            .filter(|item| self.is_expanded(&item.id))
            .map(ActivityRowDetail::from)
            .collect()
    }

}

impl<S: Into<String>> FromIterator<S> for ExpandedRows {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    fn item(
        id: &str,
        role: ActorRole,
        action: ActivityAction,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> ActivityLogItem {
        ActivityLogItem {
            id: id.into(),
            actor_id: format!("actor-{id}"),
            actor_role: role,
            action: action.as_str().into(),
            target: None,
            metadata: None,
            ip_address: None,
            user_agent: None,
            request_id: None,
            created_at,
            actor_name: Some(name.into()),
            actor_email: Some(format!("{}@icetracer.com", name.to_lowercase())),
            actor_image: None,
        }
    }

    fn page() -> Vec<ActivityLogItem> {
        vec![
            item(
                "3",
                ActorRole::Admin,
                ActivityAction::PublishedBlogPost,
                "Grace",
                Utc.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap(),
            ),
            item(
                "2",
                ActorRole::Affiliate,
                ActivityAction::EditedAffiliatePage,
                "Ada",
                Utc.with_ymd_and_hms(2025, 3, 11, 23, 30, 0).unwrap(),
            ),
            item(
                "1",
                ActorRole::Admin,
                ActivityAction::CreatedBlogPost,
                "Grace",
                Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap(),
            ),
        ]
    }

    #[test]
    fn percentage_is_zero_when_total_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(4, 4), 100.0);
    }

    #[test]
    fn role_breakdown_lists_every_role() {
        let counts = vec![
            RoleCount {
                role: ActorRole::Admin,
                count: 3,
            },
            RoleCount {
                role: ActorRole::Affiliate,
                count: 1,
            },
        ];
        let breakdown = role_breakdown(&counts, 4);
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].percentage, 75.0);
        assert_eq!(breakdown[1].percentage, 25.0);
        assert_eq!(breakdown[2].count, 0);
        assert_eq!(breakdown[2].percentage, 0.0);

        let empty = role_breakdown(&[], 0);
        assert!(empty.iter().all(|share| share.percentage == 0.0));
    }

    #[test]
    fn filters_compose_with_and_and_keep_order() {
        let rows = page();
        let tz = chrono_tz::UTC;

        let filter = ActivityTableFilter {
            search: Some("grace".into()),
            role: Some(ActorRole::Admin),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&rows, &tz).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);

        let filter = ActivityTableFilter {
            search: Some("grace".into()),
            action: Some(ActivityAction::CreatedBlogPost),
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&rows, &tz).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        let filter = ActivityTableFilter {
            role: Some(ActorRole::User),
            ..Default::default()
        };
        assert!(filter.apply(&rows, &tz).is_empty());
    }

    #[test]
    fn search_covers_email_and_action() {
        let rows = page();
        let tz = chrono_tz::UTC;
        let by_email = ActivityTableFilter {
            search: Some("ADA@ICE".into()),
            ..Default::default()
        };
        assert_eq!(by_email.apply(&rows, &tz).len(), 1);

        let by_action = ActivityTableFilter {
            search: Some("blog_post".into()),
            ..Default::default()
        };
        assert_eq!(by_action.apply(&rows, &tz).len(), 2);
    }

    #[test]
    fn date_range_is_inclusive_on_local_calendar_dates() {
        let rows = page();
        let day = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        let filter = ActivityTableFilter {
            start_date: Some(day),
            end_date: Some(day),
            ..Default::default()
        };
        let utc_ids: Vec<_> = filter
            .apply(&rows, &chrono_tz::UTC)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(utc_ids, vec!["2"]);

        // 23:30 UTC on the 11th is already the 12th in Tokyo.
        let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
        assert!(filter.apply(&rows, &tokyo).is_empty());
    }

    #[test]
    fn blank_search_is_ignored() {
        let rows = page();
        let filter = ActivityTableFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&rows, &chrono_tz::UTC).len(), 3);
        assert!(ActivityTableFilter::default().is_empty());
    }

    #[test]
    fn expanded_rows_toggle_and_expose_detail() {
        let mut rows = page();
        rows[1].target = Some(json!({ "type": "affiliate", "data": { "affiliate_id": "a-1" } }));
        rows[1].ip_address = Some("1.2.3.4".into());

        let mut expanded = ExpandedRows::default();
        assert!(expanded.toggle("2"));
        assert!(expanded.is_expanded("2"));
        let details = expanded.details(&rows);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].ip_address.as_deref(), Some("1.2.3.4"));
        assert_eq!(details[0].family, Some(ActionFamily::Affiliate));
        assert!(!details[0].payment_related);

        assert!(!expanded.toggle("2"));
        assert!(expanded.details(&rows).is_empty());

        let from_ids: ExpandedRows = ["3", "1", "missing"].into_iter().collect();
        let ids: Vec<_> = from_ids
            .details(&rows)
            .into_iter()
            .map(|detail| detail.id)
            .collect();
        assert_eq!(ids, vec!["3", "1"]);
    }
}
