pub mod activity_log;
pub mod affiliate;
pub mod content;
pub mod user;

pub use activity_log::{ActivityLogFilters, ACTIVITY_PAGE_LIMIT};
