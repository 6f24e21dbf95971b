//! Affiliate timeline: the time window selector and the views derived from a
//! fetched page of affiliate events.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    models::activity_log::{ActivityAction, AffiliateActivityItem, AffiliateActivityStats},
    read_models::global_activity::normalized_search,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown range `{0}`; expected one of 24hours, 7days, 30days, 90days, all")]
pub struct UnknownRange(pub String);

/// Relative window ending now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ActivityRange {
    #[serde(rename = "24hours")]
    Last24Hours,
    #[default]
    #[serde(rename = "7days")]
    Last7Days,
    #[serde(rename = "30days")]
    Last30Days,
    #[serde(rename = "90days")]
    Last90Days,
    #[serde(rename = "all")]
    All,
}

impl ActivityRange {
    pub const ALL: [ActivityRange; 5] = [
        ActivityRange::Last24Hours,
        ActivityRange::Last7Days,
        ActivityRange::Last30Days,
        ActivityRange::Last90Days,
        ActivityRange::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityRange::Last24Hours => "24hours",
            ActivityRange::Last7Days => "7days",
            ActivityRange::Last30Days => "30days",
            ActivityRange::Last90Days => "90days",
            ActivityRange::All => "all",
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self {
            ActivityRange::Last24Hours => Some(Duration::hours(24)),
            ActivityRange::Last7Days => Some(Duration::days(7)),
            ActivityRange::Last30Days => Some(Duration::days(30)),
            ActivityRange::Last90Days => Some(Duration::days(90)),
            ActivityRange::All => None,
        }
    }

    /// Lower bound of the window; `None` means unbounded.
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.duration().map(|window| now - window)
    }
}

impl fmt::Display for ActivityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityRange {
    type Err = UnknownRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ActivityRange::ALL
            .into_iter()
            .find(|range| range.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRange(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateActivityResponse {
    pub range: ActivityRange,
    pub activities: Vec<TimelineEntry>,
    pub stats: AffiliateActivityStats,
    pub affiliates: Vec<AffiliateSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(flatten)]
    pub item: AffiliateActivityItem,
    pub relative_time: String,
}

impl TimelineEntry {
    pub fn new(item: AffiliateActivityItem, now: DateTime<Utc>, tz: &Tz) -> Self {
        let relative_time = relative_time(item.log.created_at, now, tz);
        Self {
            item,
            relative_time,
        }
    }
}

/// One affiliate seen in a page of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateSummary {
    pub affiliate_id: String,
    pub display_name: String,
    pub image: Option<String>,
}

fn display_name(item: &AffiliateActivityItem) -> String {
    item.affiliate
        .as_ref()
        .map(|affiliate| affiliate.company_name.clone())
        .filter(|name| !name.trim().is_empty())
        .or_else(|| item.log.actor_name.clone())
        .unwrap_or_else(|| item.log.actor_id.clone())
}

/// Distinct affiliates in first-seen order. Name and image come from the
/// last event seen for each affiliate. Events without a profile are skipped.
pub fn distinct_affiliates(items: &[AffiliateActivityItem]) -> Vec<AffiliateSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<AffiliateSummary> = Vec::new();

    for item in items {
        let Some(affiliate) = item.affiliate.as_ref() else {
            continue;
        };
        let summary = AffiliateSummary {
            affiliate_id: affiliate.id.clone(),
            display_name: display_name(item),
            image: item.log.actor_image.clone(),
        };
        match index.get(affiliate.id.as_str()) {
            Some(&position) => summaries[position] = summary,
            None => {
                index.insert(affiliate.id.as_str(), summaries.len());
                summaries.push(summary);
            }
        }
    }
    summaries
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFilter {
    pub search: Option<String>,
    pub affiliate_id: Option<String>,
    pub action: Option<ActivityAction>,
}

impl TimelineFilter {
    pub fn matches(&self, item: &AffiliateActivityItem) -> bool {
        if let Some(needle) = normalized_search(self.search.as_deref()) {
            let company = item.affiliate.as_ref().map(|a| a.company_name.as_str());
            let hit = [
                company,
                item.log.actor_name.as_deref(),
                item.log.actor_email.as_deref(),
                Some(item.log.action.as_str()),
            ]
            .into_iter()
            .flatten()
            .any(|haystack| haystack.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(affiliate_id) = self.affiliate_id.as_deref() {
            let same = item
                .affiliate
                .as_ref()
                .is_some_and(|affiliate| affiliate.id == affiliate_id);
            if !same {
                return false;
            }
        }
        if self
            .action
            .is_some_and(|action| item.log.action != action.as_str())
        {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, items: &'a [AffiliateActivityItem]) -> Vec<&'a AffiliateActivityItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Human label for how long ago `at` was, seen from `now`. Older events fall
/// back to their calendar date in `tz`.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> String {
    let seconds = (now - at).num_seconds();
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        _ => at.with_timezone(tz).format("%b %-d, %Y").to_string(),
    }
}
