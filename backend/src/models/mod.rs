//! Data models shared across database access and API handlers.

pub mod activity_log;
pub mod affiliate;
pub mod content;
pub mod user;
