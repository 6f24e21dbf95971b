pub mod affiliate_activity;
pub mod global_activity;

pub use affiliate_activity::{
    distinct_affiliates, relative_time, ActivityRange, AffiliateActivityResponse,
    AffiliateSummary, TimelineEntry, TimelineFilter,
};
pub use global_activity::{
    percentage, role_breakdown, ActivityDashboardStats, ActivityRowDetail, ActivityTableFilter,
    ExpandedRows, RoleShare,
};
