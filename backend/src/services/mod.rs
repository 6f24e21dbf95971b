pub mod activity_facade;
pub mod activity_log;
