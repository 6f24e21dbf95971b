pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod read_models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
