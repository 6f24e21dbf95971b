pub mod admin;
pub mod affiliate;
pub mod auth;
