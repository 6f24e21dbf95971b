pub mod activity_logs;
pub mod affiliate_activity;
pub mod affiliates;
pub mod common;
pub mod content;
pub mod payouts;
pub mod users;

pub use activity_logs::*;
pub use affiliate_activity::*;
pub use affiliates::*;
pub use content::*;
pub use payouts::*;
pub use users::*;
